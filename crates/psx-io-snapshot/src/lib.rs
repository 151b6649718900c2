//! Save-state encoding shared by the emulated PlayStation peripherals.
//!
//! Every device serializes itself into a self-describing blob (see [`io::state`]) so the
//! enclosing save-state container can store it opaquely and hand it back on restore.

pub mod io;
