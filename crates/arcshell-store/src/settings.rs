//! Two-level settings mapping: `section -> key -> value`.
//!
//! There is no schema. Lookups take a caller-supplied default and never
//! fail; writes are last-write-wins.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A primitive setting value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for SettingValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for SettingValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for SettingValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Sorted mapping so serialized snapshots are byte-stable.
pub type SettingsMap = BTreeMap<String, BTreeMap<String, SettingValue>>;

pub const DEFAULT_BACKGROUND_COLOR: &str = "#1a1a2e";
pub const DEFAULT_BACKGROUND_GRADIENT: &str =
    "linear-gradient(135deg, #1a1a2e 0%, #16213e 100%)";
pub const DEFAULT_PRESET_BG: i64 = 9;

/// Built-in settings every fresh profile starts with.
pub fn default_settings() -> SettingsMap {
    let mut appearance = BTreeMap::new();
    appearance.insert("theme".to_string(), SettingValue::from("dark"));
    appearance.insert("background_type".to_string(), SettingValue::from("preset"));
    appearance.insert("preset_bg".to_string(), SettingValue::from(DEFAULT_PRESET_BG));
    appearance.insert(
        "background_color".to_string(),
        SettingValue::from(DEFAULT_BACKGROUND_COLOR),
    );
    appearance.insert(
        "background_gradient".to_string(),
        SettingValue::from(DEFAULT_BACKGROUND_GRADIENT),
    );
    let mut map = SettingsMap::new();
    map.insert("appearance".to_string(), appearance);
    map
}

/// Settings store.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    settings: SettingsMap,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore {
    /// A store holding the built-in defaults.
    pub fn new() -> Self {
        Self {
            settings: default_settings(),
        }
    }

    /// A store holding exactly `settings`, with no defaults merged in.
    pub fn from_map(settings: SettingsMap) -> Self {
        Self { settings }
    }

    /// Look up a value, returning `default` when the section or key is
    /// missing.
    pub fn get(&self, section: &str, key: &str, default: impl Into<SettingValue>) -> SettingValue {
        self.lookup(section, key)
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    /// String view of a setting. Non-text values are rendered with
    /// `Display`.
    pub fn get_str(&self, section: &str, key: &str, default: &str) -> String {
        match self.lookup(section, key) {
            Some(SettingValue::Text(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => default.to_string(),
        }
    }

    /// Integer view of a setting. Numeric text (as written by page forms)
    /// is parsed; anything else yields `default`.
    pub fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match self.lookup(section, key) {
            Some(SettingValue::Integer(n)) => *n,
            Some(SettingValue::Float(x)) => *x as i64,
            Some(SettingValue::Text(s)) => s.trim().parse().unwrap_or(default),
            Some(SettingValue::Bool(_)) | None => default,
        }
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<SettingValue>) {
        self.settings
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Write every `section.key` in `changes` over the current values.
    pub fn merge(&mut self, changes: &SettingsMap) {
        for (section, keys) in changes {
            for (key, value) in keys {
                self.set(section, key, value.clone());
            }
        }
    }

    /// Restore the built-in defaults, discarding everything else.
    pub fn reset(&mut self) {
        self.settings = default_settings();
    }

    pub fn snapshot(&self) -> &SettingsMap {
        &self.settings
    }

    fn lookup(&self, section: &str, key: &str) -> Option<&SettingValue> {
        self.settings.get(section).and_then(|keys| keys.get(key))
    }
}
