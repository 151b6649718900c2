use std::fmt;

use image::RgbaImage;
use psx_io_snapshot::io::state::SnapshotResult;
use psx_settings::{SettingInfo, SettingsInterface};

use crate::digital::DigitalController;
use crate::guncon::NamcoGunCon;

/// First byte of every exchange: selects the controller (as opposed to a memory card).
pub(crate) const CMD_ADDRESS: u8 = 0x01;
/// Read-buttons command; the only command these peripherals implement.
pub(crate) const CMD_READ: u8 = 0x42;
/// Reply for bytes the device does not drive.
pub(crate) const REPLY_HIGH_Z: u8 = 0xFF;

/// Result of clocking one byte through a peripheral.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TransferReply {
    /// Byte shifted out by the device.
    pub data: u8,
    /// `true` if the device pulsed /ACK, i.e. it has more data and the host should keep
    /// clocking. `false` ends the packet.
    pub ack: bool,
}

impl TransferReply {
    pub const fn more(data: u8) -> Self {
        Self { data, ack: true }
    }

    pub const fn last(data: u8) -> Self {
        Self { data, ack: false }
    }
}

/// Cursor image a frontend should draw in place of the host mouse pointer.
#[derive(Clone, Copy, Debug)]
pub struct SoftwareCursor<'a> {
    pub image: &'a RgbaImage,
    pub scale: f32,
}

/// Contract shared by every peripheral that can be plugged into a controller port.
///
/// Axis and button codes come from a binding layer that may hold stale codes after a
/// configuration change, so unknown codes must be ignored rather than treated as errors.
pub trait Controller {
    fn controller_type(&self) -> ControllerType;

    /// Power-on reset of the protocol state. Held inputs are physical state and survive.
    fn reset(&mut self);

    fn save_snapshot(&self) -> Vec<u8>;
    /// Restores a blob produced by [`Controller::save_snapshot`]. On error the device is left
    /// unchanged.
    fn load_snapshot(&mut self, bytes: &[u8]) -> SnapshotResult<()>;

    fn load_settings(&mut self, _settings: &dyn SettingsInterface, _section: &str) {}

    fn software_cursor(&self) -> Option<SoftwareCursor<'_>> {
        None
    }

    fn axis_code_by_name(&self, axis_name: &str) -> Option<i32> {
        lookup_code(self.controller_type().axis_names(), axis_name)
    }

    fn button_code_by_name(&self, button_name: &str) -> Option<i32> {
        lookup_code(self.controller_type().button_names(), button_name)
    }

    fn vibration_motor_count(&self) -> u32 {
        self.controller_type().vibration_motor_count()
    }

    fn set_axis_state(&mut self, _axis_code: i32, _value: f32) {}
    fn set_button_state(&mut self, button_code: i32, pressed: bool);

    /// Abandons any in-flight exchange. Called when the host releases chip select.
    fn reset_transfer_state(&mut self);
    fn transfer(&mut self, data_in: u8) -> TransferReply;
}

pub(crate) fn lookup_code(table: &[(&'static str, i32)], name: &str) -> Option<i32> {
    table
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, code)| code)
}

/// Peripheral kinds that can be configured on a port.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ControllerType {
    #[default]
    None,
    DigitalController,
    NamcoGunCon,
}

impl ControllerType {
    pub const ALL: [Self; 3] = [Self::None, Self::DigitalController, Self::NamcoGunCon];

    /// Name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::DigitalController => "DigitalController",
            Self::NamcoGunCon => "NamcoGunCon",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::DigitalController => "Digital Controller",
            Self::NamcoGunCon => "Namco GunCon",
        }
    }

    /// Case-insensitive inverse of [`ControllerType::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(name))
    }

    pub fn axis_names(self) -> &'static [(&'static str, i32)] {
        match self {
            Self::None | Self::DigitalController => &[],
            Self::NamcoGunCon => NamcoGunCon::AXIS_NAMES,
        }
    }

    pub fn button_names(self) -> &'static [(&'static str, i32)] {
        match self {
            Self::None => &[],
            Self::DigitalController => DigitalController::BUTTON_NAMES,
            Self::NamcoGunCon => NamcoGunCon::BUTTON_NAMES,
        }
    }

    pub fn settings(self) -> &'static [SettingInfo] {
        match self {
            Self::None | Self::DigitalController => &[],
            Self::NamcoGunCon => NamcoGunCon::SETTINGS,
        }
    }

    pub fn vibration_motor_count(self) -> u32 {
        0
    }
}

impl fmt::Display for ControllerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds a fresh peripheral of the given type; `None` means the port is empty.
pub fn create_controller(ty: ControllerType) -> Option<Box<dyn Controller>> {
    match ty {
        ControllerType::None => None,
        ControllerType::DigitalController => Some(Box::new(DigitalController::new())),
        ControllerType::NamcoGunCon => Some(Box::new(NamcoGunCon::new())),
    }
}
