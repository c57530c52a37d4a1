//! Timestamp value object for tracker-reported points in time.
//!
//! The tracker emits timestamps like `2024-01-15T10:30:00.000+0000`. The
//! parsed offset is preserved; no normalisation to UTC is performed, and
//! comparisons use the absolute instant.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ParseError;

/// Offset-aware formats tried in order before the RFC 3339 and naive fallbacks.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"];

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Immutable point in time, carrying the offset it was reported with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    /// Creates a timestamp for the current moment (UTC offset).
    pub fn now() -> Self {
        Self(Utc::now().fixed_offset())
    }

    /// Creates a timestamp from an offset-aware DateTime.
    pub fn from_datetime(dt: DateTime<FixedOffset>) -> Self {
        Self(dt)
    }

    /// Parses a tracker timestamp.
    ///
    /// Accepts `%Y-%m-%dT%H:%M:%S%.f%z`, `%Y-%m-%dT%H:%M:%S%z` and RFC 3339.
    /// As a last resort the zone suffix is stripped and the remainder is
    /// read as a UTC wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidTimestamp` when no format matches.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let trimmed = text.trim();

        for format in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
                return Ok(Self(dt));
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(dt));
        }

        NaiveDateTime::parse_from_str(strip_zone_suffix(trimmed), NAIVE_FORMAT)
            .map(|naive| Self(naive.and_utc().fixed_offset()))
            .map_err(|_| ParseError::invalid_timestamp(text))
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Returns the whole-second duration from another timestamp to this one.
    ///
    /// Negative if `other` is after `self`.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        Duration::seconds(self.0.signed_duration_since(other.0).num_seconds())
    }

    /// Creates a new timestamp by adding the specified number of seconds.
    pub fn plus_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Formats as RFC 3339, keeping the original offset.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_rfc3339())
    }
}

/// Drops a trailing `Z` or `+hh:mm`/`-hhmm` zone designator from the time part.
fn strip_zone_suffix(text: &str) -> &str {
    if let Some(stripped) = text.strip_suffix('Z') {
        return stripped;
    }
    match text.find('T') {
        Some(t_idx) => match text[t_idx..].find(['+', '-']) {
            Some(zone_idx) => &text[..t_idx + zone_idx],
            None => text,
        },
        None => text,
    }
}
