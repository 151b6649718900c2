//! Namco GunCon (NPC-103) light gun.
//!
//! The gun answers the standard `01h 42h` read with a 6-byte payload after its ID: the
//! active-low button word, then X and Y of the last beam position its photodiode latched.
//! Position is recomputed whenever the pointer moves and frozen for the length of each packet.

mod snapshot;
mod transfer;

use bitflags::bitflags;
use image::RgbaImage;
use psx_io_snapshot::io::state::{IoSnapshot, SnapshotResult};
use psx_settings::{SettingInfo, SettingType, SettingsInterface};

use crate::beam::{BeamGeometry, GunPosition};
use crate::controller::{Controller, ControllerType, SoftwareCursor, TransferReply};
use crate::crosshair;

pub use transfer::GunConTransferPhase;
use transfer::{Report, TransferState};

bitflags! {
    /// Button bits in the GunCon report word. The word is active-low on the wire.
    #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
    pub struct GunConButtons: u16 {
        const A = 1 << 3;
        const TRIGGER = 1 << 13;
        const B = 1 << 14;
    }
}

/// Button codes exposed to input bindings.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum GunConButton {
    Trigger = 0,
    A = 1,
    B = 2,
}

impl GunConButton {
    pub const ALL: [Self; 3] = [Self::Trigger, Self::A, Self::B];

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|b| *b as i32 == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Trigger => "Trigger",
            Self::A => "A",
            Self::B => "B",
        }
    }

    pub fn bits(self) -> GunConButtons {
        match self {
            Self::Trigger => GunConButtons::TRIGGER,
            Self::A => GunConButtons::A,
            Self::B => GunConButtons::B,
        }
    }
}

/// Axis codes exposed to input bindings. Values are normalized to `[0, 1]` across the visible
/// picture; anything outside means the gun points away from the screen.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum GunConAxis {
    X = 0,
    Y = 1,
}

impl GunConAxis {
    pub const ALL: [Self; 2] = [Self::X, Self::Y];

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|a| *a as i32 == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
        }
    }
}

/// Normalized pointer at power-on: aimed at the centre of the picture.
const POWER_ON_POINTER: [f32; 2] = [0.5, 0.5];

pub const SETTING_CROSSHAIR_IMAGE_PATH: &str = "CrosshairImagePath";
pub const SETTING_CROSSHAIR_SCALE: &str = "CrosshairScale";

#[derive(Debug)]
pub struct NamcoGunCon {
    // active low
    button_state: u16,
    position: GunPosition,
    pointer: [f32; 2],
    beam: BeamGeometry,
    transfer_state: TransferState,

    crosshair_image: Option<RgbaImage>,
    crosshair_image_path: String,
    crosshair_image_scale: f32,
}

impl NamcoGunCon {
    pub const AXIS_NAMES: &'static [(&'static str, i32)] = &[
        ("X", GunConAxis::X as i32),
        ("Y", GunConAxis::Y as i32),
    ];

    pub const BUTTON_NAMES: &'static [(&'static str, i32)] = &[
        ("Trigger", GunConButton::Trigger as i32),
        ("A", GunConButton::A as i32),
        ("B", GunConButton::B as i32),
    ];

    pub const SETTINGS: &'static [SettingInfo] = &[
        SettingInfo {
            ty: SettingType::Path,
            key: SETTING_CROSSHAIR_IMAGE_PATH,
            visible_name: "Crosshair Image Path",
            description: "Path to an image to use as a crosshair/cursor.",
            default_value: None,
            min_value: None,
            max_value: None,
            step_value: None,
        },
        SettingInfo {
            ty: SettingType::Float,
            key: SETTING_CROSSHAIR_SCALE,
            visible_name: "Crosshair Image Scale",
            description: "Scale of crosshair image on screen.",
            default_value: Some("1.0"),
            min_value: Some("0.01"),
            max_value: Some("8.0"),
            step_value: Some("0.01"),
        },
    ];

    pub fn new() -> Self {
        let mut gun = Self {
            button_state: 0xFFFF,
            position: GunPosition::default(),
            pointer: POWER_ON_POINTER,
            beam: BeamGeometry::default(),
            transfer_state: TransferState::Idle,
            crosshair_image: None,
            crosshair_image_path: String::new(),
            crosshair_image_scale: 1.0,
        };
        gun.update_position();
        gun
    }

    pub fn axis_code_by_name_static(axis_name: &str) -> Option<i32> {
        GunConAxis::ALL
            .into_iter()
            .find(|a| a.name() == axis_name)
            .map(|a| a as i32)
    }

    pub fn button_code_by_name_static(button_name: &str) -> Option<i32> {
        GunConButton::ALL
            .into_iter()
            .find(|b| b.name() == button_name)
            .map(|b| b as i32)
    }

    /// Raw active-low button word.
    pub fn button_state(&self) -> u16 {
        self.button_state
    }

    pub fn position(&self) -> GunPosition {
        self.position
    }

    pub fn beam_geometry(&self) -> BeamGeometry {
        self.beam
    }

    pub fn transfer_phase(&self) -> GunConTransferPhase {
        self.transfer_state.phase()
    }

    pub fn set_button(&mut self, button: GunConButton, pressed: bool) {
        if button == GunConButton::Trigger && pressed {
            self.update_position();
        }

        let bits = button.bits().bits();
        if pressed {
            self.button_state &= !bits;
        } else {
            self.button_state |= bits;
        }
    }

    pub fn set_axis(&mut self, axis: GunConAxis, value: f32) {
        self.pointer[axis as usize] = value;
        self.update_position();
    }

    /// Switches the scan window (video mode change) and remaps the current pointer.
    pub fn set_beam_geometry(&mut self, beam: BeamGeometry) {
        self.beam = beam;
        self.update_position();
    }

    fn update_position(&mut self) {
        let [x, y] = self.pointer;
        self.position = self.beam.map(x, y);
        if self.position.is_off_screen() {
            tracing::debug!(x, y, "light gun out of range for pointer position");
        } else {
            tracing::debug!(
                x,
                y,
                gun_x = self.position.x,
                gun_y = self.position.y,
                "light gun pointer mapped"
            );
        }
    }

    fn sample(&self) -> Report {
        Report {
            buttons: self.button_state,
            x: self.position.x,
            y: self.position.y,
        }
    }

    pub fn crosshair_image_path(&self) -> &str {
        &self.crosshair_image_path
    }

    pub fn crosshair_image_scale(&self) -> f32 {
        self.crosshair_image_scale
    }
}

impl Default for NamcoGunCon {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for NamcoGunCon {
    fn controller_type(&self) -> ControllerType {
        ControllerType::NamcoGunCon
    }

    fn reset(&mut self) {
        self.transfer_state = TransferState::Idle;
    }

    fn save_snapshot(&self) -> Vec<u8> {
        self.save_state()
    }

    fn load_snapshot(&mut self, bytes: &[u8]) -> SnapshotResult<()> {
        self.load_state(bytes)
    }

    fn load_settings(&mut self, settings: &dyn SettingsInterface, section: &str) {
        let [path_info, scale_info] = [Self::SETTINGS[0], Self::SETTINGS[1]];

        let path = settings.get_string_value(
            section,
            SETTING_CROSSHAIR_IMAGE_PATH,
            path_info.string_default_value(),
        );
        if self.crosshair_image.is_none() || path != self.crosshair_image_path {
            self.crosshair_image = Some(crosshair::resolve_crosshair(&path));
            self.crosshair_image_path = path;
        }

        let scale = settings.get_float_value(
            section,
            SETTING_CROSSHAIR_SCALE,
            scale_info.float_default_value(),
        );
        self.crosshair_image_scale = if scale.is_finite() {
            scale.clamp(scale_info.float_min_value(), scale_info.float_max_value())
        } else {
            scale_info.float_default_value()
        };
    }

    fn software_cursor(&self) -> Option<SoftwareCursor<'_>> {
        self.crosshair_image.as_ref().map(|image| SoftwareCursor {
            image,
            scale: self.crosshair_image_scale,
        })
    }

    fn axis_code_by_name(&self, axis_name: &str) -> Option<i32> {
        Self::axis_code_by_name_static(axis_name)
    }

    fn button_code_by_name(&self, button_name: &str) -> Option<i32> {
        Self::button_code_by_name_static(button_name)
    }

    fn set_axis_state(&mut self, axis_code: i32, value: f32) {
        if let Some(axis) = GunConAxis::from_code(axis_code) {
            self.set_axis(axis, value);
        }
    }

    fn set_button_state(&mut self, button_code: i32, pressed: bool) {
        if let Some(button) = GunConButton::from_code(button_code) {
            self.set_button(button, pressed);
        }
    }

    fn reset_transfer_state(&mut self) {
        if self.transfer_state != TransferState::Idle {
            tracing::debug!(
                phase = ?self.transfer_state.phase(),
                "guncon packet aborted by deselect"
            );
        }
        self.transfer_state = TransferState::Idle;
    }

    fn transfer(&mut self, data_in: u8) -> TransferReply {
        let (reply, next) = self.transfer_state.step(data_in, || self.sample());
        self.transfer_state = next;
        reply
    }
}
