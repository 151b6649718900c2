use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{MemorySettingsInterface, SettingsError, SettingsInterface};

/// Settings store persisted as a JSON document of `{ section: { key: value } }`.
///
/// A missing or unreadable file is not an error: the store starts empty and the problem is
/// logged. Modifications are written back by [`JsonSettingsInterface::save`], or on drop if the
/// store was changed and not saved since.
#[derive(Debug)]
pub struct JsonSettingsInterface {
    path: PathBuf,
    inner: MemorySettingsInterface,
    dirty: bool,
}

impl JsonSettingsInterface {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let inner = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(inner) => inner,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        "settings file is malformed, defaults will be used: {err}"
                    );
                    MemorySettingsInterface::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "settings file not found, starting empty");
                MemorySettingsInterface::new()
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    "settings could not be loaded, defaults will be used: {err}"
                );
                MemorySettingsInterface::new()
            }
        };

        Self {
            path,
            inner,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn save(&mut self) -> Result<(), SettingsError> {
        let json = serde_json::to_vec_pretty(&self.inner)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, json).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.dirty = false;
        Ok(())
    }

    fn modified(&mut self) -> &mut MemorySettingsInterface {
        self.dirty = true;
        &mut self.inner
    }
}

impl Drop for JsonSettingsInterface {
    fn drop(&mut self) {
        if !self.dirty {
            return;
        }
        if let Err(err) = self.save() {
            tracing::warn!("failed to save settings on drop: {err}");
        }
    }
}

impl SettingsInterface for JsonSettingsInterface {
    fn clear(&mut self) {
        self.modified().clear();
    }

    fn get_int_value(&self, section: &str, key: &str, default_value: i32) -> i32 {
        self.inner.get_int_value(section, key, default_value)
    }

    fn get_float_value(&self, section: &str, key: &str, default_value: f32) -> f32 {
        self.inner.get_float_value(section, key, default_value)
    }

    fn get_bool_value(&self, section: &str, key: &str, default_value: bool) -> bool {
        self.inner.get_bool_value(section, key, default_value)
    }

    fn get_string_value(&self, section: &str, key: &str, default_value: &str) -> String {
        self.inner.get_string_value(section, key, default_value)
    }

    fn set_int_value(&mut self, section: &str, key: &str, value: i32) {
        self.modified().set_int_value(section, key, value);
    }

    fn set_float_value(&mut self, section: &str, key: &str, value: f32) {
        self.modified().set_float_value(section, key, value);
    }

    fn set_bool_value(&mut self, section: &str, key: &str, value: bool) {
        self.modified().set_bool_value(section, key, value);
    }

    fn set_string_value(&mut self, section: &str, key: &str, value: &str) {
        self.modified().set_string_value(section, key, value);
    }

    fn get_string_list(&self, section: &str, key: &str) -> Vec<String> {
        self.inner.get_string_list(section, key)
    }

    fn set_string_list(&mut self, section: &str, key: &str, items: &[&str]) {
        self.modified().set_string_list(section, key, items);
    }

    fn remove_from_string_list(&mut self, section: &str, key: &str, item: &str) -> bool {
        let removed = self.inner.remove_from_string_list(section, key, item);
        self.dirty |= removed;
        removed
    }

    fn add_to_string_list(&mut self, section: &str, key: &str, item: &str) -> bool {
        let added = self.inner.add_to_string_list(section, key, item);
        self.dirty |= added;
        added
    }

    fn delete_value(&mut self, section: &str, key: &str) {
        self.modified().delete_value(section, key);
    }
}
