//! Key/value settings store used to configure emulated peripherals.
//!
//! Settings are addressed by `(section, key)`. Values are kept as strings and parsed on read, so a
//! value that fails to parse reads back as the caller's default instead of failing.

mod error;
mod info;
mod json;
mod memory;

pub use error::SettingsError;
pub use info::{SettingInfo, SettingType};
pub use json::JsonSettingsInterface;
pub use memory::MemorySettingsInterface;

/// Backing store for emulator settings.
pub trait SettingsInterface {
    fn clear(&mut self);

    fn get_int_value(&self, section: &str, key: &str, default_value: i32) -> i32;
    fn get_float_value(&self, section: &str, key: &str, default_value: f32) -> f32;
    fn get_bool_value(&self, section: &str, key: &str, default_value: bool) -> bool;
    fn get_string_value(&self, section: &str, key: &str, default_value: &str) -> String;

    fn set_int_value(&mut self, section: &str, key: &str, value: i32);
    fn set_float_value(&mut self, section: &str, key: &str, value: f32);
    fn set_bool_value(&mut self, section: &str, key: &str, value: bool);
    fn set_string_value(&mut self, section: &str, key: &str, value: &str);

    fn get_string_list(&self, section: &str, key: &str) -> Vec<String>;
    fn set_string_list(&mut self, section: &str, key: &str, items: &[&str]);
    /// Returns `true` if `item` was present and removed.
    fn remove_from_string_list(&mut self, section: &str, key: &str, item: &str) -> bool;
    /// Returns `true` if `item` was appended (it was not already present).
    fn add_to_string_list(&mut self, section: &str, key: &str, item: &str) -> bool;

    fn delete_value(&mut self, section: &str, key: &str);
}

/// Lenient boolean parsing matching what hand-edited config files tend to contain.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
