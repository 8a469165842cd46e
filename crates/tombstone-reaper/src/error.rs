//! Error types for Reaper operations

use thiserror::Error;
use tombstone_domain::SiteError;

/// Errors that can occur during Reaper operations
#[derive(Error, Debug)]
pub enum ReaperError {
    /// Content site call failed and could not be absorbed as a deviation
    #[error("Site error: {0}")]
    Site(#[from] SiteError),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(String),

    /// Filesystem error writing the status artifact
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Status artifact could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),

    /// Too many consecutive cycles failed
    #[error("Failure budget exhausted after {0} consecutive failed cycles")]
    FailureBudgetExhausted(u32),
}

impl ReaperError {
    /// Connectivity loss, which the driver waits out without spending budget
    pub fn is_transient(&self) -> bool {
        matches!(self, ReaperError::Site(e) if e.is_connectivity())
    }

    /// Whether a pass that failed with this error is worth running again
    pub fn is_retryable(&self) -> bool {
        matches!(self, ReaperError::Site(e) if e.is_retryable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let lost = ReaperError::from(SiteError::Connectivity("reset".into()));
        assert!(lost.is_transient());
        assert!(lost.is_retryable());

        let denied = ReaperError::from(SiteError::PermissionDenied("nope".into()));
        assert!(!denied.is_transient());
        assert!(!denied.is_retryable());

        assert!(!ReaperError::Store("disk full".into()).is_transient());
    }
}
