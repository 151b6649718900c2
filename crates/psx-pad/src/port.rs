use crate::controller::{create_controller, Controller, ControllerType, TransferReply};

/// One controller port and its chip-select line.
///
/// The port forwards clocked bytes to the plugged-in peripheral while selected. Releasing
/// chip select always resets the peripheral's transfer state, so a packet the host abandoned
/// can never leak into the next selection.
pub struct ControllerPort {
    device: Option<Box<dyn Controller>>,
    selected: bool,
}

impl ControllerPort {
    pub fn new() -> Self {
        Self {
            device: None,
            selected: false,
        }
    }

    pub fn with_type(ty: ControllerType) -> Self {
        Self {
            device: create_controller(ty),
            selected: false,
        }
    }

    pub fn device(&self) -> Option<&dyn Controller> {
        self.device.as_deref()
    }

    pub fn device_mut(&mut self) -> Option<&mut (dyn Controller + 'static)> {
        self.device.as_deref_mut()
    }

    /// Replaces the plugged-in peripheral, returning the previous one.
    pub fn plug(&mut self, device: Option<Box<dyn Controller>>) -> Option<Box<dyn Controller>> {
        self.selected = false;
        std::mem::replace(&mut self.device, device)
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn select(&mut self) {
        self.selected = true;
    }

    pub fn deselect(&mut self) {
        self.selected = false;
        if let Some(dev) = self.device.as_deref_mut() {
            dev.reset_transfer_state();
        }
    }

    /// Clocks one byte. An empty or deselected port floats the data line and never acks.
    pub fn exchange(&mut self, data_in: u8) -> TransferReply {
        match self.device.as_deref_mut() {
            Some(dev) if self.selected => dev.transfer(data_in),
            _ => TransferReply::last(0xFF),
        }
    }
}

impl Default for ControllerPort {
    fn default() -> Self {
        Self::new()
    }
}
