//! PlayStation controller-port peripherals.
//!
//! The implementation lives in the member crates; this crate re-exports them under one roof so
//! hosts only need a single dependency.

pub use psx_io_snapshot as io_snapshot;
pub use psx_pad as pad;
pub use psx_settings as settings;

pub use psx_io_snapshot::io::state::{IoSnapshot, SnapshotError, SnapshotResult};
pub use psx_pad::{create_controller, Controller, ControllerPort, ControllerType, TransferReply};
pub use psx_settings::{JsonSettingsInterface, MemorySettingsInterface, SettingsInterface};
