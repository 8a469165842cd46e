//! Configuration file parsing for the status server.
//!
//! Loads the bind address, the artifact location and the staleness window
//! from TOML.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Status server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),
}

/// Status server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct StatusConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (default: 5000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Status document written by the reaper
    #[serde(default = "default_artifact_path")]
    pub artifact_path: PathBuf,

    /// Age in seconds after which `/health` reports the artifact as stale
    /// (default: 5400 = three poll intervals)
    #[serde(default = "default_stale_after")]
    pub stale_after_secs: u64,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    5000
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from("data/status.json")
}

fn default_stale_after() -> u64 {
    5400
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            artifact_path: default_artifact_path(),
            stale_after_secs: default_stale_after(),
        }
    }
}

impl StatusConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: StatusConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the fields that have no usable fallback
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.is_empty() {
            return Err(ConfigError::MissingField("bind_address".to_string()));
        }
        if self.artifact_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("artifact_path".to_string()));
        }
        Ok(())
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        StatusConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 5000,
            artifact_path: PathBuf::from("data/status.json"),
            stale_after_secs: 5400,
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
