//! Bounded retry for flaky external calls

use crate::ReaperError;
use std::fmt::Display;
use std::time::Duration;
use tombstone_domain::SiteError;

/// Errors that can tell whether another attempt might succeed
pub trait Retryable {
    /// True when the failure is not final
    fn is_retryable(&self) -> bool;
}

impl Retryable for SiteError {
    fn is_retryable(&self) -> bool {
        SiteError::is_retryable(self)
    }
}

impl Retryable for ReaperError {
    fn is_retryable(&self) -> bool {
        ReaperError::is_retryable(self)
    }
}

/// Fixed attempt count with a fixed pause between attempts
///
/// # Examples
///
/// ```
/// use tombstone_reaper::RetryPolicy;
/// use tombstone_domain::SiteError;
///
/// let policy = RetryPolicy::immediate(3);
/// let mut calls = 0;
/// let result: Result<(), SiteError> = policy.run("flaky", || {
///     calls += 1;
///     if calls < 3 {
///         Err(SiteError::Transient("busy".into()))
///     } else {
///         Ok(())
///     }
/// });
/// assert!(result.is_ok());
/// assert_eq!(calls, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub attempts: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Policy with `attempts` tries separated by `delay`
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Policy that retries without pausing
    pub fn immediate(attempts: u32) -> Self {
        Self::new(attempts, Duration::ZERO)
    }

    /// Run `op` until it succeeds, fails for good, or attempts run out
    ///
    /// Non-retryable errors are returned on first sight. The last error is
    /// returned when every attempt failed.
    pub fn run<T, E, F>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        E: Retryable + Display,
        F: FnMut() -> Result<T, E>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() || attempt >= attempts => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        operation = label,
                        attempt,
                        attempts,
                        "Retrying after error: {}",
                        e
                    );
                    if !self.delay.is_zero() {
                        std::thread::sleep(self.delay);
                    }
                    attempt += 1;
                }
            }
        }
    }
}
