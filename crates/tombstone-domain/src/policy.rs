//! Deletion policy - thresholds and the pure decision rules built on them
//!
//! | Rule | Condition | Outcome |
//! |------|-----------|---------|
//! | Flag original | age >= 30 days | 72h countdown |
//! | Flag original | score <= -2 and score > -10 | 72h countdown |
//! | Flag original | score <= -10 | 24h countdown |
//! | Flag derivative | score < 0 and age >= 24h | 24h countdown |
//! | Rescind | original, score > -2, age < 30 days | stop countdown |
//! | Rescind | score >= 5, or derivative with score >= 0 | stop countdown |
//! | Widen (24h → 72h) | release <= -10, live > -10, original | keep deadline, new score |
//! | Tighten (72h → 24h) | live <= -10, release > -10, original, > 24h left | deadline = now + 24h |
//! | Floor | live <= -30 | reported regardless of countdown |
//!
//! The thresholds are fixed; they are part of the community's deletion policy
//! rather than deployment configuration.

use crate::Timestamp;

/// One day in seconds
pub const DAY_SECS: i64 = 86_400;

/// Short countdown (24 hours)
pub const SHORT_INTERVAL_SECS: i64 = DAY_SECS;

/// Long countdown (72 hours)
pub const LONG_INTERVAL_SECS: i64 = 3 * DAY_SECS;

/// Extension applied to a severe-score deadline without stored continuity
pub const BASELINE_EXTENSION_SECS: i64 = 2 * DAY_SECS;

/// Age after which an original page no longer enjoys the grace period
pub const MATURITY_SECS: i64 = 30 * DAY_SECS;

/// Minimum age before a derivative page is considered
pub const DERIVATIVE_MIN_AGE_SECS: i64 = DAY_SECS;

/// Originals are candidates while rated strictly below this
pub const ORIGINAL_RATING_CEILING: i64 = 5;

/// Derivatives are candidates while rated strictly below this
pub const DERIVATIVE_RATING_CEILING: i64 = 0;

/// Score at or below which a young original is flagged
pub const LOW_SCORE: i64 = -2;

/// Score at or below which the countdown is short
pub const SEVERE_SCORE: i64 = -10;

/// Score at or below which an item is reported immediately
pub const FLOOR_SCORE: i64 = -30;

/// Score at or above which any countdown is rescinded
pub const RECOVERY_SCORE: i64 = 5;

/// Countdown length for an original page, or `None` if it is not eligible
pub fn original_interval_secs(score: i64, age_secs: i64) -> Option<i64> {
    if age_secs >= MATURITY_SECS {
        Some(LONG_INTERVAL_SECS)
    } else if score <= LOW_SCORE {
        Some(if score > SEVERE_SCORE {
            LONG_INTERVAL_SECS
        } else {
            SHORT_INTERVAL_SECS
        })
    } else {
        None
    }
}

/// Display label (hours) for a release score
pub fn interval_hours(release_score: i64) -> u32 {
    if release_score > SEVERE_SCORE {
        72
    } else {
        24
    }
}

/// Whether a flagged item has recovered enough to stop its countdown
pub fn should_rescind(original: bool, score: i64, age_secs: i64) -> bool {
    (original && score > LOW_SCORE && age_secs < MATURITY_SECS)
        || score >= RECOVERY_SCORE
        || (!original && score >= DERIVATIVE_RATING_CEILING)
}

/// Pick the deadline to keep for this cycle
///
/// A severe score whose decoded deadline still falls inside the next 72 hours
/// keeps the stored deadline when one exists, and otherwise gets the decoded
/// deadline plus 48 hours. Every other case takes the decoded deadline as-is.
pub fn resolve_deadline(
    page_score: i64,
    decoded: Timestamp,
    stored: Option<Timestamp>,
    now: Timestamp,
) -> Timestamp {
    if page_score <= SEVERE_SCORE && decoded < now.plus_secs(LONG_INTERVAL_SECS) {
        stored.unwrap_or_else(|| decoded.plus_secs(BASELINE_EXTENSION_SECS))
    } else {
        decoded
    }
}

/// 24h → 72h: a severe release score has recovered above the severe line
pub fn should_widen(release_score: i64, live_score: i64, original: bool) -> bool {
    release_score <= SEVERE_SCORE && live_score > SEVERE_SCORE && original
}

/// 72h → 24h: the score dropped to severe while more than a day remains
pub fn should_tighten(
    release_score: i64,
    deadline: Timestamp,
    live_score: i64,
    original: bool,
    now: Timestamp,
) -> bool {
    live_score <= SEVERE_SCORE
        && release_score > SEVERE_SCORE
        && original
        && deadline.secs_since(now) > SHORT_INTERVAL_SECS
}

/// Whether the live score is at or below the reporting floor
pub fn below_floor(score: i64) -> bool {
    score <= FLOOR_SCORE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_interval() {
        assert_eq!(original_interval_secs(3, MATURITY_SECS), Some(LONG_INTERVAL_SECS));
        assert_eq!(original_interval_secs(-2, 0), Some(LONG_INTERVAL_SECS));
        assert_eq!(original_interval_secs(-9, 0), Some(LONG_INTERVAL_SECS));
        assert_eq!(original_interval_secs(-10, 0), Some(SHORT_INTERVAL_SECS));
        assert_eq!(original_interval_secs(-1, MATURITY_SECS - 1), None);
    }

    #[test]
    fn test_rescind_rules() {
        // Young original recovering above -2
        assert!(should_rescind(true, -1, DAY_SECS));
        // Old original needs to reach +5
        assert!(!should_rescind(true, -1, MATURITY_SECS));
        assert!(should_rescind(true, 5, MATURITY_SECS));
        // Derivatives recover at zero
        assert!(should_rescind(false, 0, MATURITY_SECS));
        assert!(!should_rescind(false, -1, DAY_SECS));
    }

    #[test]
    fn test_resolve_deadline_baseline() {
        let now = Timestamp::from_secs(1_000_000);
        let decoded = now.plus_secs(100_000);

        assert_eq!(
            resolve_deadline(-12, decoded, None, now),
            decoded.plus_secs(BASELINE_EXTENSION_SECS)
        );
        let stored = now.plus_secs(5);
        assert_eq!(resolve_deadline(-12, decoded, Some(stored), now), stored);
        assert_eq!(resolve_deadline(-9, decoded, Some(stored), now), decoded);

        // Outside the 72h window the decoded deadline wins
        let far = now.plus_secs(LONG_INTERVAL_SECS);
        assert_eq!(resolve_deadline(-12, far, Some(stored), now), far);
    }

    #[test]
    fn test_widen_and_tighten() {
        let now = Timestamp::from_secs(0);
        assert!(should_widen(-12, -9, true));
        assert!(!should_widen(-12, -9, false));
        assert!(!should_widen(-9, -8, true));

        assert!(should_tighten(-5, now.plus_secs(DAY_SECS + 1), -10, true, now));
        assert!(!should_tighten(-5, now.plus_secs(DAY_SECS), -10, true, now));
        assert!(!should_tighten(-10, now.plus_secs(LONG_INTERVAL_SECS), -12, true, now));
    }

    #[test]
    fn test_out_of_range_deadlines() {
        let now = Timestamp::from_secs(1_700_000_000);
        let early = Timestamp::from_millis(i64::MIN);
        let far = Timestamp::from_millis(i64::MAX);

        assert_eq!(resolve_deadline(-12, early, None, now), early.plus_secs(BASELINE_EXTENSION_SECS));
        assert_eq!(resolve_deadline(-12, far, None, now), far);
        assert!(should_tighten(-5, far, -10, true, now));
        assert!(!should_tighten(-5, early, -10, true, now));
    }
}
