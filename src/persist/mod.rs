//! RON-backed console settings.
//!
//! `devcon.ron` configures the console without recompiling: the history
//! file location and the severity colors used by the overlay. A missing
//! file means defaults; a malformed file is reported and ignored.

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Default settings file name.
pub const DEFAULT_SETTINGS_FILE: &str = "devcon.ron";

/// Console settings loaded at plugin build time.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Path of the history backing file.
    #[serde(default = "default_history_file")]
    pub history_file: String,
    /// Severity display colors.
    #[serde(default)]
    pub colors: SeverityColors,
}

fn default_history_file() -> String {
    crate::core::DEFAULT_HISTORY_FILE.to_string()
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            history_file: default_history_file(),
            colors: SeverityColors::default(),
        }
    }
}

/// RGB triples for each severity, in file-friendly form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityColors {
    pub info: [u8; 3],
    pub warning: [u8; 3],
    pub error: [u8; 3],
    pub success: [u8; 3],
    pub system: [u8; 3],
}

impl Default for SeverityColors {
    fn default() -> Self {
        Self {
            info: [255, 255, 255],
            warning: [255, 255, 0],
            error: [255, 64, 64],
            success: [64, 255, 64],
            system: [0, 255, 255],
        }
    }
}

/// Errors from loading or saving settings.
#[derive(Debug, Clone)]
pub enum SettingsError {
    /// IO error (path, message).
    Io(String, String),
    /// Parse error (path, message).
    Parse(String, String),
    /// Serialization error.
    Serialize(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(path, msg) => write!(f, "IO error for '{}': {}", path, msg),
            SettingsError::Parse(path, msg) => write!(f, "Parse error for '{}': {}", path, msg),
            SettingsError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}

impl ConsoleSettings {
    /// Load settings from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| SettingsError::Io(path.display().to_string(), e.to_string()))?;

        ron::from_str(&contents)
            .map_err(|e| SettingsError::Parse(path.display().to_string(), e.to_string()))
    }

    /// Save settings to a RON file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| SettingsError::Io(parent.display().to_string(), e.to_string()))?;
            }
        }

        let pretty = ron::ser::PrettyConfig::new().depth_limit(2);
        let contents = ron::ser::to_string_pretty(self, pretty)
            .map_err(|e| SettingsError::Serialize(e.to_string()))?;

        fs::write(path, contents)
            .map_err(|e| SettingsError::Io(path.display().to_string(), e.to_string()))
    }

    /// Load settings, falling back to defaults. A missing file is silent;
    /// a malformed one is reported to the process log.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("console: {e}; using default settings");
                Self::default()
            }
        }
    }
}
