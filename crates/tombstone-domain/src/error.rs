//! Failure taxonomy for calls across the content-site boundary

use std::fmt;

/// Errors reported by a [`ContentSite`](crate::traits::ContentSite)
///
/// The variants encode how the engine must react, not where the failure came
/// from: permission problems are final, transient and unexpected statuses may
/// be retried, and connectivity loss aborts the whole cycle without counting
/// against the failure budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    /// The account lacks rights for this operation
    PermissionDenied(String),

    /// The site answered with a temporary failure
    Transient(String),

    /// The site could not be reached at all
    Connectivity(String),

    /// The addressed resource does not exist
    NotFound(String),

    /// The site answered with a status the client does not recognize
    Unexpected(String),
}

impl SiteError {
    /// Whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SiteError::Transient(_) | SiteError::Connectivity(_) | SiteError::Unexpected(_)
        )
    }

    /// Whether the failure is a loss of connectivity
    pub fn is_connectivity(&self) -> bool {
        matches!(self, SiteError::Connectivity(_))
    }
}

impl fmt::Display for SiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            SiteError::Transient(msg) => write!(f, "Transient site failure: {}", msg),
            SiteError::Connectivity(msg) => write!(f, "Site unreachable: {}", msg),
            SiteError::NotFound(msg) => write!(f, "Not found: {}", msg),
            SiteError::Unexpected(msg) => write!(f, "Unexpected site response: {}", msg),
        }
    }
}

impl std::error::Error for SiteError {}
