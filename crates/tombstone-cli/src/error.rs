//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reaper error
    #[error("Reaper error: {0}")]
    Reaper(#[from] tombstone_reaper::ReaperError),

    /// Site bridge error
    #[error("Site error: {0}")]
    Site(#[from] tombstone_domain::SiteError),

    /// Record store error
    #[error("Store error: {0}")]
    Store(#[from] tombstone_store::StoreError),

    /// Status server error
    #[error("Status server error: {0}")]
    Status(#[from] tombstone_status::StatusError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A blocking task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
