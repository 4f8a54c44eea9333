//! Timestamp utilities and show timing classification
//!
//! Stored timestamps are UTC with millisecond precision. A request captures
//! `now()` once and passes that instant to every query it runs, so all shows
//! in one response are classified against the same clock reading.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

/// Current UTC timestamp, truncated to whole milliseconds
pub fn now() -> DateTime<Utc> {
    from_millis(Utc::now().timestamp_millis())
}

/// Storage encoding: Unix epoch milliseconds
pub fn to_millis(ts: &DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

/// Decode a stored millisecond timestamp
///
/// Out-of-range values clamp to the Unix epoch rather than panicking.
pub fn from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).single().unwrap_or_default()
}

/// Whether a show has happened yet, relative to one captured instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowTiming {
    Past,
    Upcoming,
}

impl ShowTiming {
    /// Upcoming iff `start_time` is strictly after `now`; a show starting
    /// exactly at `now` is past.
    pub fn classify(start_time: &DateTime<Utc>, now: &DateTime<Utc>) -> Self {
        if start_time > now {
            ShowTiming::Upcoming
        } else {
            ShowTiming::Past
        }
    }

    pub fn is_upcoming(&self) -> bool {
        matches!(self, ShowTiming::Upcoming)
    }
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a submitted start time
///
/// RFC 3339 values keep their offset (normalised to UTC); naive values are
/// read as UTC. Sub-millisecond precision is dropped.
pub fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(from_millis(ts.with_timezone(&Utc).timestamp_millis()));
    }
    NAIVE_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(raw, fmt)
            .ok()
            .map(|naive| from_millis(naive.and_utc().timestamp_millis()))
    })
}
