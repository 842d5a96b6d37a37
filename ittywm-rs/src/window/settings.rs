use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("Invalid settings in {path}: {source}")]
    Parse { path: String, source: toml::de::Error },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Background pixel of the blank window shown while resizing
    pub surrogate_pixel: u32,
    /// Also grab the modifier gestures with CapsLock/NumLock held
    pub ignore_lock_modifiers: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            surrogate_pixel: 0,
            ignore_lock_modifiers: true,
        }
    }
}

impl Settings {
    /// `$XDG_CONFIG_HOME/ittywm-rs/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ittywm-rs").join("config.toml"))
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
