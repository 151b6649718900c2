//! Standard digital pad (SCPH-1080).

use psx_io_snapshot::io::state::{
    IoSnapshot, SnapshotError, SnapshotReader, SnapshotResult, SnapshotVersion, SnapshotWriter,
};

use crate::controller::{
    Controller, ControllerType, TransferReply, CMD_ADDRESS, CMD_READ, REPLY_HIGH_Z,
};

const ID: u16 = 0x5A41;

/// Button codes double as bit positions in the (active-low) report word.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DigitalButton {
    Select = 0,
    L3 = 1,
    R3 = 2,
    Start = 3,
    Up = 4,
    Right = 5,
    Down = 6,
    Left = 7,
    L2 = 8,
    R2 = 9,
    L1 = 10,
    R1 = 11,
    Triangle = 12,
    Circle = 13,
    Cross = 14,
    Square = 15,
}

impl DigitalButton {
    pub const ALL: [Self; 16] = [
        Self::Select,
        Self::L3,
        Self::R3,
        Self::Start,
        Self::Up,
        Self::Right,
        Self::Down,
        Self::Left,
        Self::L2,
        Self::R2,
        Self::L1,
        Self::R1,
        Self::Triangle,
        Self::Circle,
        Self::Cross,
        Self::Square,
    ];

    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum TransferState {
    #[default]
    Idle,
    IdMsb(u16),
    ButtonsLsb(u16),
    ButtonsMsb(u16),
}

impl TransferState {
    fn index(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::IdMsb(_) => 1,
            Self::ButtonsLsb(_) => 2,
            Self::ButtonsMsb(_) => 3,
        }
    }

    fn latched(self) -> Option<u16> {
        match self {
            Self::Idle => None,
            Self::IdMsb(b) | Self::ButtonsLsb(b) | Self::ButtonsMsb(b) => Some(b),
        }
    }
}

#[derive(Debug)]
pub struct DigitalController {
    // active low
    button_state: u16,
    transfer_state: TransferState,
}

impl DigitalController {
    pub const BUTTON_NAMES: &'static [(&'static str, i32)] = &[
        ("Select", DigitalButton::Select as i32),
        ("L3", DigitalButton::L3 as i32),
        ("R3", DigitalButton::R3 as i32),
        ("Start", DigitalButton::Start as i32),
        ("Up", DigitalButton::Up as i32),
        ("Right", DigitalButton::Right as i32),
        ("Down", DigitalButton::Down as i32),
        ("Left", DigitalButton::Left as i32),
        ("L2", DigitalButton::L2 as i32),
        ("R2", DigitalButton::R2 as i32),
        ("L1", DigitalButton::L1 as i32),
        ("R1", DigitalButton::R1 as i32),
        ("Triangle", DigitalButton::Triangle as i32),
        ("Circle", DigitalButton::Circle as i32),
        ("Cross", DigitalButton::Cross as i32),
        ("Square", DigitalButton::Square as i32),
    ];

    pub fn new() -> Self {
        Self {
            button_state: 0xFFFF,
            transfer_state: TransferState::Idle,
        }
    }

    pub fn button_state(&self) -> u16 {
        self.button_state
    }

    pub fn set_button(&mut self, button: DigitalButton, pressed: bool) {
        let bit = 1u16 << (button as u8);
        if pressed {
            self.button_state &= !bit;
        } else {
            self.button_state |= bit;
        }
    }
}

impl Default for DigitalController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for DigitalController {
    fn controller_type(&self) -> ControllerType {
        ControllerType::DigitalController
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

    fn set_button_state(&mut self, button_code: i32, pressed: bool) {
        if let Some(button) = DigitalButton::from_code(button_code) {
            self.set_button(button, pressed);
        }
    }

    fn reset_transfer_state(&mut self) {
        self.transfer_state = TransferState::Idle;
    }

    fn transfer(&mut self, data_in: u8) -> TransferReply {
        let [id_lo, id_hi] = ID.to_le_bytes();
        let (reply, next) = match self.transfer_state {
            TransferState::Idle => match data_in {
                CMD_READ => (
                    TransferReply::more(id_lo),
                    TransferState::IdMsb(self.button_state),
                ),
                CMD_ADDRESS => (TransferReply::more(REPLY_HIGH_Z), TransferState::Idle),
                _ => (TransferReply::last(REPLY_HIGH_Z), TransferState::Idle),
            },
            TransferState::IdMsb(b) => (TransferReply::more(id_hi), TransferState::ButtonsLsb(b)),
            TransferState::ButtonsLsb(b) => {
                (TransferReply::more(b as u8), TransferState::ButtonsMsb(b))
            }
            TransferState::ButtonsMsb(b) => {
                (TransferReply::last((b >> 8) as u8), TransferState::Idle)
            }
        };
        self.transfer_state = next;
        reply
    }
}

const TAG_TRANSFER_STATE: u16 = 1;
const TAG_BUTTONS: u16 = 2;
const TAG_LATCHED_BUTTONS: u16 = 3;

impl IoSnapshot for DigitalController {
    const DEVICE_ID: [u8; 4] = *b"DPAD";
    const DEVICE_VERSION: SnapshotVersion = SnapshotVersion::new(1, 0);

    fn save_state(&self) -> Vec<u8> {
        let mut w = SnapshotWriter::new(Self::DEVICE_ID, Self::DEVICE_VERSION);
        w.field_u8(TAG_TRANSFER_STATE, self.transfer_state.index());
        w.field_u16(TAG_BUTTONS, self.button_state);
        if let Some(b) = self.transfer_state.latched() {
            w.field_u16(TAG_LATCHED_BUTTONS, b);
        }
        w.finish()
    }

    fn load_state(&mut self, bytes: &[u8]) -> SnapshotResult<()> {
        let r = SnapshotReader::parse(bytes, Self::DEVICE_ID)?;
        r.ensure_device_major(Self::DEVICE_VERSION.major)?;

        let latched = r.u16(TAG_LATCHED_BUTTONS)?;
        let transfer_state = match (r.u8(TAG_TRANSFER_STATE)?.unwrap_or(0), latched) {
            (0, _) => TransferState::Idle,
            (1, Some(b)) => TransferState::IdMsb(b),
            (2, Some(b)) => TransferState::ButtonsLsb(b),
            (3, Some(b)) => TransferState::ButtonsMsb(b),
            (1..=3, None) => {
                return Err(SnapshotError::InvalidFieldEncoding(
                    "pad transfer state without latched buttons",
                ))
            }
            _ => return Err(SnapshotError::InvalidFieldEncoding("pad transfer state")),
        };
        let button_state = r.u16(TAG_BUTTONS)?.unwrap_or(0xFFFF);

        self.transfer_state = transfer_state;
        self.button_state = button_state;
        Ok(())
    }
}
