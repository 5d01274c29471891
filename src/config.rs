//! Configuration file handling for geosnap.
//!
//! Loads configuration from `~/.config/geosnap/config.toml` or a custom path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::types::{CameraSelector, Facing};

/// Configuration file structure for geosnap.
/// Loaded from ~/.config/geosnap/config.toml (or a custom path).
#[derive(Debug, Deserialize, Default)]
pub struct SessionConfig {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub location: LocationConfig,
}

#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    /// Explicit device id; overrides the facing preference when set
    #[serde(default)]
    pub device_id: Option<String>,
    /// Preferred facing for the initial camera
    #[serde(default = "default_facing")]
    pub facing: Facing,
}

impl CameraConfig {
    /// The selector the session starts with.
    pub fn selector(&self) -> CameraSelector {
        match &self.device_id {
            Some(id) => CameraSelector::DeviceId(id.clone()),
            None => CameraSelector::Facing(self.facing),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_id: None,
            facing: default_facing(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LocationConfig {
    /// Whether the session fetches a location fix at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Upper bound on the one-shot fetch, in milliseconds
    #[serde(default = "default_location_timeout_ms")]
    pub timeout_ms: u64,
}

impl LocationConfig {
    /// The fetch timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: default_location_timeout_ms(),
        }
    }
}

fn default_facing() -> Facing {
    Facing::Front
}

fn default_true() -> bool {
    true
}

fn default_location_timeout_ms() -> u64 {
    10_000
}

impl SessionConfig {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: SessionConfig =
                toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                    path: path.clone(),
                    source: e,
                })?;
            Ok(config)
        } else {
            Ok(SessionConfig::default())
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("geosnap/config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/geosnap/config.toml")
        })
}
