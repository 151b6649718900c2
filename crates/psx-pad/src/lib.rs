//! Serial-port peripherals for the PlayStation controller bus.
//!
//! Each peripheral is a byte-clocked state machine: the port clocks one byte in per call to
//! [`Controller::transfer`] and gets one reply byte back, plus whether the device acknowledged
//! and expects the host to keep clocking.
//!
//! - [`guncon`]: Namco GunCon light gun.
//! - [`digital`]: standard digital pad.
//! - [`beam`]: maps a normalized pointer position onto CRT beam coordinates.
//! - [`port`]: chip-select handling for one controller port.

pub mod beam;
pub mod controller;
pub mod crosshair;
pub mod digital;
pub mod guncon;
pub mod port;

pub use beam::{BeamGeometry, GunPosition};
pub use controller::{create_controller, Controller, ControllerType, SoftwareCursor, TransferReply};
pub use digital::{DigitalButton, DigitalController};
pub use guncon::{GunConAxis, GunConButton, GunConTransferPhase, NamcoGunCon};
pub use port::ControllerPort;
