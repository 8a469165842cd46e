//! Millisecond-precision instants

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// An instant expressed as milliseconds since the Unix epoch (UTC)
///
/// Countdown deadlines travel through timer links as epoch milliseconds, so
/// this is the native resolution. Seconds-based helpers exist for the age and
/// interval rules, which are all whole-second quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Current wall-clock time
    pub fn now() -> Self {
        let millis = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_millis() as i64,
            // Clock set before 1970
            Err(e) => -(e.duration().as_millis() as i64),
        };
        Self(millis)
    }

    /// Build from epoch milliseconds
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Build from epoch seconds
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    /// Build from fractional epoch seconds, rounded to the nearest millisecond
    pub fn from_secs_f64(secs: f64) -> Self {
        Self((secs * 1000.0).round() as i64)
    }

    /// Epoch milliseconds
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Whole epoch seconds (truncated toward negative infinity)
    pub const fn as_secs(&self) -> i64 {
        self.0.div_euclid(1000)
    }

    /// Fractional epoch seconds
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// This instant shifted by `secs` seconds (negative moves backward)
    ///
    /// Saturates at the ends of the representable range.
    pub const fn plus_secs(&self, secs: i64) -> Self {
        Self(self.0.saturating_add(secs.saturating_mul(1000)))
    }

    /// Seconds elapsed from `earlier` to `self` (negative if `earlier` is later)
    pub const fn secs_since(&self, earlier: Timestamp) -> i64 {
        self.0.saturating_sub(earlier.0).div_euclid(1000)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.as_secs(), self.0.rem_euclid(1000))
    }
}
