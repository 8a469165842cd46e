//! Configuration for Reaper operations
//!
//! Defines the tags the engine reads and writes, who may author an
//! announcement, retry bounds and the driver's timing.

use crate::{ReaperError, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the Reaper service
///
/// Every field has a default, so a TOML `[reaper]` table only needs the keys
/// it wants to change.
///
/// # Examples
///
/// ```
/// use tombstone_reaper::ReaperConfig;
///
/// let config = ReaperConfig::default();
/// assert_eq!(config.pending_tag, "待删除");
/// assert_eq!(config.poll_interval_secs, 1800);
///
/// // No sleeps and no files, for tests
/// let config = ReaperConfig::for_tests();
/// assert!(config.store_path.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaperConfig {
    /// Tag marking an item as authored on this site
    pub original_tag: String,

    /// Tag marking an item as under a deletion countdown
    pub pending_tag: String,

    /// Items carrying any of these tags are never flagged or reconciled
    pub exempt_tags: Vec<String>,

    /// Category of items already moved to the deleted bucket
    pub deleted_category: String,

    /// Other sites a derivative item may originate from
    pub origin_sites: Vec<String>,

    /// Accounts allowed to author the announcement; empty accepts anyone
    pub staff: Vec<String>,

    /// Title used for new announcement posts
    pub announcement_title: String,

    /// Host of the countdown widget
    pub timer_base_url: String,

    /// Where deletion records are persisted
    /// Default: `data/records.json`
    pub store_path: Option<PathBuf>,

    /// Where the status artifact is written after each cycle
    /// Default: `data/status.json`
    pub output_path: Option<PathBuf>,

    /// Pause after a successful cycle (seconds)
    /// Default: 1800
    pub poll_interval_secs: u64,

    /// Consecutive failed cycles tolerated before the driver halts
    /// Default: 5
    pub failure_budget: u32,

    /// Pause after a connectivity failure (seconds)
    /// Default: 10
    pub transient_backoff_secs: u64,

    /// Pause after any other failure (seconds)
    /// Default: 3
    pub failure_backoff_secs: u64,

    /// Attempts per external write
    pub write_attempts: u32,

    /// Pause between write attempts (milliseconds)
    pub write_delay_ms: u64,

    /// Attempts per reconciler pass
    pub pass_attempts: u32,

    /// Pause between pass attempts (milliseconds)
    pub pass_delay_ms: u64,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            original_tag: "原创".to_string(),
            pending_tag: "待删除".to_string(),
            exempt_tags: Vec::new(),
            deleted_category: "deleted".to_string(),
            origin_sites: Vec::new(),
            staff: Vec::new(),
            announcement_title: crate::notice::ANNOUNCEMENT_TITLE.to_string(),
            timer_base_url: crate::timer::DEFAULT_TIMER_BASE_URL.to_string(),
            store_path: Some(PathBuf::from("data/records.json")),
            output_path: Some(PathBuf::from("data/status.json")),
            poll_interval_secs: 1800,
            failure_budget: 5,
            transient_backoff_secs: 10,
            failure_backoff_secs: 3,
            write_attempts: 5,
            write_delay_ms: 1000,
            pass_attempts: 3,
            pass_delay_ms: 0,
        }
    }
}

impl ReaperConfig {
    /// Configuration for tests: no pauses, no files
    pub fn for_tests() -> Self {
        Self {
            store_path: None,
            output_path: None,
            poll_interval_secs: 0,
            transient_backoff_secs: 0,
            failure_backoff_secs: 0,
            write_delay_ms: 0,
            pass_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), ReaperError> {
        let tags = [
            ("original_tag", &self.original_tag),
            ("pending_tag", &self.pending_tag),
            ("deleted_category", &self.deleted_category),
            ("announcement_title", &self.announcement_title),
        ];
        for (name, value) in tags {
            if value.trim().is_empty() {
                return Err(ReaperError::Config(format!("{} must not be empty", name)));
            }
        }
        if self.original_tag == self.pending_tag {
            return Err(ReaperError::Config(
                "original_tag and pending_tag must differ".to_string(),
            ));
        }
        if self.write_attempts == 0 || self.pass_attempts == 0 {
            return Err(ReaperError::Config(
                "attempt counts must be at least 1".to_string(),
            ));
        }
        if self.failure_budget == 0 {
            return Err(ReaperError::Config(
                "failure_budget must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Get connectivity backoff as Duration
    pub fn transient_backoff(&self) -> Duration {
        Duration::from_secs(self.transient_backoff_secs)
    }

    /// Get failure backoff as Duration
    pub fn failure_backoff(&self) -> Duration {
        Duration::from_secs(self.failure_backoff_secs)
    }

    /// Retry policy around single external writes
    pub fn write_retry(&self) -> RetryPolicy {
        RetryPolicy::new(self.write_attempts, Duration::from_millis(self.write_delay_ms))
    }

    /// Retry policy around whole passes
    pub fn pass_retry(&self) -> RetryPolicy {
        RetryPolicy::new(self.pass_attempts, Duration::from_millis(self.pass_delay_ms))
    }
}
