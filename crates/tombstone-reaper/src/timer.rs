//! Countdown timer links
//!
//! Announcement posts embed a countdown widget whose URL carries the deadline.
//! Three generations of link are in circulation and all of them must decode:
//!
//! | Format | Shape |
//! |--------|-------|
//! | Epoch millis (current) | `{base}/timer/time=1700000000000/type=delete` |
//! | ISO-8601 UTC | `{base}/timer/time=2023-11-14T22:13:20.000Z/type=delete` |
//! | Legacy service | `https://arandintday.github.io/timer/?timestamp=1700000000000&type=0` |
//!
//! Decoding tries the formats in that order. New links are always written in
//! the current format.

use chrono::{DateTime, NaiveDateTime};
use thiserror::Error;
use tombstone_domain::Timestamp;

/// Default host of the countdown widget
pub const DEFAULT_TIMER_BASE_URL: &str = "https://timer.backroomswiki.cn";

const TIME_SEGMENT: &str = "/timer/time=";
const TYPE_SUFFIX: &str = "/type=";
const ISO_SUFFIX: &str = ".000Z";
const ISO_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S";
const LEGACY_BASE_URL: &str = "https://arandintday.github.io/timer/";
const LEGACY_PARAM: &str = "?timestamp=";
const LEGACY_SUFFIX: &str = "&type=0";
const WIDGET_STYLE: &str = "width: 400px; height: 65px;";
const WIDGET_OPEN: &str = "[[iframe ";

/// Timer link generations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerFormat {
    /// Millisecond epoch in the path
    EpochMillis,
    /// ISO-8601 UTC timestamp in the path
    IsoUtc,
    /// Third-party service with a millisecond query parameter
    Legacy,
}

/// A timer link matched none of the known formats
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized timer link: {0}")]
pub struct TimerParseError(pub String);

/// Encoder/decoder for countdown links
#[derive(Debug, Clone)]
pub struct TimerCodec {
    base_url: String,
}

impl Default for TimerCodec {
    fn default() -> Self {
        Self::new(DEFAULT_TIMER_BASE_URL)
    }
}

impl TimerCodec {
    /// Codec writing links against `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Link for `deadline` in the current format
    pub fn encode(&self, deadline: Timestamp) -> String {
        self.encode_as(TimerFormat::EpochMillis, deadline)
    }

    /// Link for `deadline` in a specific format
    pub fn encode_as(&self, format: TimerFormat, deadline: Timestamp) -> String {
        match format {
            TimerFormat::EpochMillis => format!(
                "{}{}{}{}delete",
                self.base_url,
                TIME_SEGMENT,
                deadline.as_millis(),
                TYPE_SUFFIX
            ),
            TimerFormat::IsoUtc => {
                let instant = DateTime::from_timestamp(deadline.as_secs(), 0).unwrap_or_default();
                format!(
                    "{}{}{}{}{}delete",
                    self.base_url,
                    TIME_SEGMENT,
                    instant.format(ISO_LAYOUT),
                    ISO_SUFFIX,
                    TYPE_SUFFIX
                )
            }
            TimerFormat::Legacy => format!(
                "{}{}{}{}",
                LEGACY_BASE_URL,
                LEGACY_PARAM,
                deadline.as_millis(),
                LEGACY_SUFFIX
            ),
        }
    }

    /// Widget markup embedding a countdown to `deadline`
    pub fn embed(&self, deadline: Timestamp) -> String {
        format!("{}{} style=\"{}\"]]", WIDGET_OPEN, self.encode(deadline), WIDGET_STYLE)
    }

    /// Deadline carried by a timer link
    pub fn decode(link: &str) -> Result<Timestamp, TimerParseError> {
        Self::decode_with_format(link).map(|(_, deadline)| deadline)
    }

    /// Deadline and detected format of a timer link
    pub fn decode_with_format(link: &str) -> Result<(TimerFormat, Timestamp), TimerParseError> {
        if let Some(deadline) = decode_epoch_millis(link) {
            return Ok((TimerFormat::EpochMillis, deadline));
        }
        if let Some(deadline) = decode_iso(link) {
            return Ok((TimerFormat::IsoUtc, deadline));
        }
        if let Some(deadline) = decode_legacy(link) {
            return Ok((TimerFormat::Legacy, deadline));
        }
        Err(TimerParseError(link.to_string()))
    }

    /// Link of the first timer widget in a post body
    ///
    /// Only the token right after `[[iframe ` counts. Timer URLs quoted
    /// elsewhere in the text are ignored.
    pub fn find_link(body: &str) -> Option<&str> {
        let from = body.find(WIDGET_OPEN)? + WIDGET_OPEN.len();
        body[from..]
            .split_whitespace()
            .next()
            .map(|token| token.trim_end_matches(']'))
            .filter(|link| !link.is_empty())
    }

    /// Deadline embedded in a post body
    pub fn decode_body(body: &str) -> Result<Timestamp, TimerParseError> {
        let link = Self::find_link(body)
            .ok_or_else(|| TimerParseError("no timer link in post".to_string()))?;
        Self::decode(link)
    }
}

/// Text strictly between `start` and the next `end` after it
fn between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = text.find(start)? + start.len();
    let rest = &text[from..];
    let to = rest.find(end)?;
    Some(&rest[..to])
}

fn millis_from_str(raw: &str) -> Option<Timestamp> {
    let millis: f64 = raw.trim().parse().ok()?;
    if !millis.is_finite() {
        return None;
    }
    Some(Timestamp::from_millis(millis.round() as i64))
}

fn decode_epoch_millis(link: &str) -> Option<Timestamp> {
    millis_from_str(between(link, TIME_SEGMENT, TYPE_SUFFIX)?)
}

fn decode_iso(link: &str) -> Option<Timestamp> {
    let raw = between(link, TIME_SEGMENT, ISO_SUFFIX)?;
    let parsed = NaiveDateTime::parse_from_str(raw, ISO_LAYOUT).ok()?;
    Some(Timestamp::from_millis(parsed.and_utc().timestamp_millis()))
}

fn decode_legacy(link: &str) -> Option<Timestamp> {
    let from = link.find(LEGACY_PARAM)? + LEGACY_PARAM.len();
    let rest = &link[from..];
    let raw = rest.split('&').next()?;
    millis_from_str(raw)
}
