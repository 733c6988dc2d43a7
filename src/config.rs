//! Configuration file support for the region editor.
//!
//! Editor preferences, keybindings and the stroke palette are stored as a
//! versioned JSON document in the platform config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LABEL, DEFAULT_MARGIN};
use crate::keybindings::KeyBindings;
use crate::render::Palette;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Editing preferences
    #[serde(default)]
    pub preferences: EditorPreferences,

    /// Mode modifier bindings
    #[serde(default)]
    pub keybindings: KeyBindings,

    /// Region stroke colors
    #[serde(default)]
    pub palette: Palette,
}

/// Preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorPreferences {
    /// Minimum margin around the image, in surface pixels
    #[serde(default = "default_min_margin")]
    pub min_margin_px: f64,

    /// Label given to newly drawn regions
    #[serde(default = "default_label")]
    pub default_label: u32,

    /// Maximum number of undo snapshots; unlimited when absent
    #[serde(default)]
    pub history_limit: Option<usize>,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_min_margin() -> f64 {
    DEFAULT_MARGIN
}

fn default_label() -> u32 {
    DEFAULT_LABEL
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            min_margin_px: default_min_margin(),
            default_label: default_label(),
            history_limit: None,
            log_level: LogLevel::default(),
        }
    }
}

impl EditorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: EditorPreferences::default(),
            keybindings: KeyBindings::default(),
            palette: Palette::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }
        if !config.keybindings.is_valid() {
            return Err(ConfigError::ConflictingModifiers);
        }
        if config.preferences.history_limit == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "preferences.history_limit".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "region-editor.json"
    }

    /// Get the default config file path for auto-load/save.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Some(
                config_dir
                    .join("region-editor")
                    .join(Self::default_filename()),
            )
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("region-editor")
                    .join(Self::default_filename())
            })
        }
    }

    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Write the config, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save(&path)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// Shrink and expand bound to the same modifier
    #[error("Shrink and expand modifiers must differ")]
    ConflictingModifiers,

    /// A field holds a value outside its allowed range
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
