use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{parse_bool, SettingsInterface};

/// A single stored value. Lists are kept as their own variant so a scalar read of a list key (or
/// a list read of a scalar key) still behaves sensibly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum Entry {
    Value(String),
    List(Vec<String>),
}

/// In-memory settings store with deterministic (sorted) section and key order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemorySettingsInterface {
    sections: BTreeMap<String, BTreeMap<String, Entry>>,
}

impl MemorySettingsInterface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(BTreeMap::is_empty)
    }

    fn raw(&self, section: &str, key: &str) -> Option<&str> {
        match self.sections.get(section)?.get(key)? {
            Entry::Value(v) => Some(v.as_str()),
            Entry::List(items) => items.first().map(String::as_str),
        }
    }

    fn put(&mut self, section: &str, key: &str, entry: Entry) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), entry);
    }
}

impl SettingsInterface for MemorySettingsInterface {
    fn clear(&mut self) {
        self.sections.clear();
    }

    fn get_int_value(&self, section: &str, key: &str, default_value: i32) -> i32 {
        self.raw(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default_value)
    }

    fn get_float_value(&self, section: &str, key: &str, default_value: f32) -> f32 {
        self.raw(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default_value)
    }

    fn get_bool_value(&self, section: &str, key: &str, default_value: bool) -> bool {
        self.raw(section, key)
            .and_then(parse_bool)
            .unwrap_or(default_value)
    }

    fn get_string_value(&self, section: &str, key: &str, default_value: &str) -> String {
        self.raw(section, key).unwrap_or(default_value).to_string()
    }

    fn set_int_value(&mut self, section: &str, key: &str, value: i32) {
        self.put(section, key, Entry::Value(value.to_string()));
    }

    fn set_float_value(&mut self, section: &str, key: &str, value: f32) {
        self.put(section, key, Entry::Value(value.to_string()));
    }

    fn set_bool_value(&mut self, section: &str, key: &str, value: bool) {
        self.put(section, key, Entry::Value(value.to_string()));
    }

    fn set_string_value(&mut self, section: &str, key: &str, value: &str) {
        self.put(section, key, Entry::Value(value.to_string()));
    }

    fn get_string_list(&self, section: &str, key: &str) -> Vec<String> {
        match self.sections.get(section).and_then(|s| s.get(key)) {
            Some(Entry::Value(v)) => vec![v.clone()],
            Some(Entry::List(items)) => items.clone(),
            None => Vec::new(),
        }
    }

    fn set_string_list(&mut self, section: &str, key: &str, items: &[&str]) {
        let items = items.iter().map(|s| s.to_string()).collect();
        self.put(section, key, Entry::List(items));
    }

    fn remove_from_string_list(&mut self, section: &str, key: &str, item: &str) -> bool {
        let mut items = self.get_string_list(section, key);
        let before = items.len();
        items.retain(|s| s != item);
        if items.len() == before {
            return false;
        }
        self.put(section, key, Entry::List(items));
        true
    }

    fn add_to_string_list(&mut self, section: &str, key: &str, item: &str) -> bool {
        let mut items = self.get_string_list(section, key);
        if items.iter().any(|s| s == item) {
            return false;
        }
        items.push(item.to_string());
        self.put(section, key, Entry::List(items));
        true
    }

    fn delete_value(&mut self, section: &str, key: &str) {
        if let Some(keys) = self.sections.get_mut(section) {
            keys.remove(key);
            if keys.is_empty() {
                self.sections.remove(section);
            }
        }
    }
}
