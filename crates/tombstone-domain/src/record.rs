//! Deletion record - cached state of an open countdown

use crate::{policy, Timestamp};

/// Last-known lifecycle state of a flagged item
///
/// `release_score` is the score that fixed the current countdown length, not
/// the live score. The hysteresis rules compare the live score against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionRecord {
    /// Score in effect when the countdown length was last fixed
    pub release_score: i64,

    /// Authoritative expiry instant
    pub deadline: Timestamp,

    /// Page name of the item
    pub item_ref: String,
}

impl DeletionRecord {
    /// Create a record
    pub fn new(release_score: i64, deadline: Timestamp, item_ref: impl Into<String>) -> Self {
        Self {
            release_score,
            deadline,
            item_ref: item_ref.into(),
        }
    }

    /// Countdown label in hours (24 or 72) for the release score
    pub fn interval_hours(&self) -> u32 {
        policy::interval_hours(self.release_score)
    }

    /// Whether the countdown has run out at `now`
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.deadline
    }
}
