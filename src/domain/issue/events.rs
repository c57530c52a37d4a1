//! Status transitions, periods, and replay results.

use chrono::Duration;
use serde::Serialize;

use crate::domain::foundation::Timestamp;

/// A single status transition extracted from an issue's changelog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChangeEvent {
    pub timestamp: Timestamp,
    pub from_status: Option<String>,
    pub to_status: Option<String>,
}

impl StatusChangeEvent {
    pub fn new(timestamp: Timestamp, from_status: Option<String>, to_status: Option<String>) -> Self {
        Self {
            timestamp,
            from_status,
            to_status,
        }
    }
}

/// One contiguous interval spent in a single cycle-time status.
///
/// Invariant: `end >= start` and `duration == end - start` in whole seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPeriod {
    pub status: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub duration: Duration,
}

impl StatusPeriod {
    /// Creates a period; an `end` earlier than `start` collapses to zero width.
    pub fn new(status: impl Into<String>, start: Timestamp, end: Timestamp) -> Self {
        let end = if end.is_before(&start) { start } else { end };
        Self {
            status: status.into(),
            start,
            end,
            duration: end.duration_since(&start),
        }
    }

    pub fn duration_hours(&self) -> f64 {
        seconds_to_hours(self.duration)
    }
}

/// Total cycle time and the periods that make it up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleTimeResult {
    pub total_duration: Duration,
    /// Periods in chronological order.
    pub periods: Vec<StatusPeriod>,
}

impl CycleTimeResult {
    /// Result for an issue with no cycle time.
    pub fn empty() -> Self {
        Self {
            total_duration: Duration::zero(),
            periods: Vec::new(),
        }
    }

    pub fn total_hours(&self) -> f64 {
        seconds_to_hours(self.total_duration)
    }

    pub fn total_days(&self) -> f64 {
        self.total_hours() / 24.0
    }
}

/// Serializable view of a period for detailed exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub status: String,
    pub start: String,
    pub end: String,
    pub duration_hours: f64,
}

impl From<&StatusPeriod> for PeriodSummary {
    fn from(period: &StatusPeriod) -> Self {
        Self {
            status: period.status.clone(),
            start: period.start.to_rfc3339(),
            end: period.end.to_rfc3339(),
            duration_hours: period.duration_hours(),
        }
    }
}

fn seconds_to_hours(duration: Duration) -> f64 {
    duration.num_seconds() as f64 / 3600.0
}
