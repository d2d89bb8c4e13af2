//! Override configuration: reading it from the settings store and publishing
//! it to draw calls without locks.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};

use crate::color::ColorSetting;

// ============================================================================
// SETTINGS KEYS
// ============================================================================

pub const KEY_FACE_NAME: &str = "font.name";
pub const KEY_CUSTOM_COLOR: &str = "font.customColor";
pub const KEY_TEXT_R: &str = "font.textR";
pub const KEY_TEXT_G: &str = "font.textG";
pub const KEY_TEXT_B: &str = "font.textB";

/// Face-name value meaning "keep whatever font the host picked".
pub const NO_OVERRIDE: &str = "None";

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Whether and how to replace the face name of every drawn font.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FaceNameOverride {
    #[default]
    Keep,
    Replace(String),
}

impl FaceNameOverride {
    /// Parse the raw setting. [`NO_OVERRIDE`] and the empty string both mean
    /// [`FaceNameOverride::Keep`].
    pub fn from_setting(value: &str) -> Self {
        if value.is_empty() || value == NO_OVERRIDE {
            FaceNameOverride::Keep
        } else {
            FaceNameOverride::Replace(value.to_string())
        }
    }
}

/// Everything a draw call needs to know about the user's settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorOverrideConfig {
    pub enabled: bool,
    pub color: ColorSetting,
    pub face_name: FaceNameOverride,
}

impl Default for ColorOverrideConfig {
    fn default() -> Self {
        ColorOverrideConfig {
            enabled: true,
            color: ColorSetting::default(),
            face_name: FaceNameOverride::Keep,
        }
    }
}

impl ColorOverrideConfig {
    /// Read a full snapshot. Missing keys fall back to the defaults.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let defaults = ColorOverrideConfig::default();

        let face_name = match store.string_setting(KEY_FACE_NAME) {
            Some(value) => FaceNameOverride::from_setting(&value),
            None => {
                log::debug!("Setting {} missing, keeping face name", KEY_FACE_NAME);
                defaults.face_name
            }
        };

        let int = |key: &str, default: i32| {
            store.int_setting(key).unwrap_or_else(|| {
                log::debug!("Setting {} missing, using {}", key, default);
                default
            })
        };

        ColorOverrideConfig {
            enabled: int(KEY_CUSTOM_COLOR, defaults.enabled as i32) == 1,
            color: ColorSetting::new(
                int(KEY_TEXT_R, defaults.color.red),
                int(KEY_TEXT_G, defaults.color.green),
                int(KEY_TEXT_B, defaults.color.blue),
            ),
            face_name,
        }
    }
}

// ============================================================================
// SETTINGS STORE
// ============================================================================

/// Key-value settings owned by the mod loader.
pub trait SettingsStore {
    fn string_setting(&self, key: &str) -> Option<String>;
    fn int_setting(&self, key: &str) -> Option<i32>;
}

/// In-memory [`SettingsStore`], for hosts that push settings in themselves.
#[derive(Clone, Debug, Default)]
pub struct MemorySettings {
    strings: HashMap<String, String>,
    ints: HashMap<String, i32>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_string(mut self, key: &str, value: &str) -> Self {
        self.set_string(key, value);
        self
    }

    pub fn with_int(mut self, key: &str, value: i32) -> Self {
        self.set_int(key, value);
        self
    }

    pub fn set_string(&mut self, key: &str, value: &str) {
        self.strings.insert(key.to_string(), value.to_string());
    }

    pub fn set_int(&mut self, key: &str, value: i32) {
        self.ints.insert(key.to_string(), value);
    }
}

impl SettingsStore for MemorySettings {
    fn string_setting(&self, key: &str) -> Option<String> {
        self.strings.get(key).cloned()
    }

    fn int_setting(&self, key: &str) -> Option<i32> {
        self.ints.get(key).copied()
    }
}

// ============================================================================
// PUBLISHED SNAPSHOT
// ============================================================================

/// Single-writer, many-reader holder of the current configuration.
///
/// Draw calls take a snapshot and keep it for the whole call; the settings
/// callback replaces it in one atomic swap, so a reader never sees half an
/// update.
#[derive(Debug)]
pub struct ConfigHandle {
    current: ArcSwap<ColorOverrideConfig>,
}

impl Default for ConfigHandle {
    fn default() -> Self {
        Self::new(ColorOverrideConfig::default())
    }
}

impl ConfigHandle {
    pub fn new(config: ColorOverrideConfig) -> Self {
        ConfigHandle { current: ArcSwap::from_pointee(config) }
    }

    /// Lock-free view of the current configuration.
    pub fn snapshot(&self) -> Guard<Arc<ColorOverrideConfig>> {
        self.current.load()
    }

    pub fn publish(&self, config: ColorOverrideConfig) {
        self.current.store(Arc::new(config));
    }

    /// Re-read every setting and publish the result.
    pub fn reload(&self, store: &dyn SettingsStore) -> Arc<ColorOverrideConfig> {
        let config = Arc::new(ColorOverrideConfig::load(store));
        self.current.store(Arc::clone(&config));
        config
    }
}
