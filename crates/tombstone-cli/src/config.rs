//! Configuration management for the CLI.
//!
//! One TOML file carries a section per component:
//!
//! ```toml
//! [site]
//! base_url = "http://localhost:7300"
//!
//! [reaper]
//! staff = ["mod-a"]
//!
//! [status]
//! bind_port = 5000
//!
//! [settings]
//! color = false
//! ```
//!
//! Every section is optional and falls back to its defaults.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tombstone_reaper::ReaperConfig;
use tombstone_site::HttpSiteConfig;
use tombstone_status::config::StatusConfig;

/// CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Site bridge connection
    #[serde(default)]
    pub site: HttpSiteConfig,

    /// Reconciler settings
    #[serde(default)]
    pub reaper: ReaperConfig,

    /// Status server settings
    #[serde(default)]
    pub status: StatusConfig,

    /// Output settings
    #[serde(default)]
    pub settings: Settings,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".tombstone").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// present and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    tracing::debug!("No config at {}, using defaults", path.display());
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        if self.site.base_url.is_empty() {
            return Err(CliError::Config("site.base_url must not be empty".into()));
        }
        self.reaper.validate()?;
        self.status
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
