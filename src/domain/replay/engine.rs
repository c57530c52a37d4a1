//! Changelog replay - converts status transitions into cycle time.
//!
//! The engine walks an issue's status changes in time order with a single
//! piece of state, the currently open cycle period (or none). Each event
//! is checked against two independent guards:
//!
//! ```text
//! from_status in cycle set && open  -> close period at event time
//! to_status   in cycle set          -> open period at event time
//! ```
//!
//! Both guards may fire on one event, which is how a move between two
//! cycle statuses produces adjacent periods sharing a boundary instant.

use chrono::Duration;
use thiserror::Error;

use crate::domain::foundation::{ParseError, Timestamp};
use crate::domain::issue::{
    CycleStatusSet, CycleTimeResult, IssueSnapshot, StatusChangeEvent, StatusPeriod,
};

/// Errors raised while replaying an issue's changelog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("issue {key}: {source}")]
    Parse {
        key: String,
        #[source]
        source: ParseError,
    },
}

impl ReplayError {
    fn parse(issue: &IssueSnapshot, source: ParseError) -> Self {
        ReplayError::Parse {
            key: issue.key.to_string(),
            source,
        }
    }
}

/// The period currently being accumulated.
#[derive(Debug, Clone)]
struct OpenPeriod {
    status: String,
    start: Timestamp,
}

/// Replays changelogs against a fixed set of cycle-time statuses.
///
/// Stateless between calls; safe to share across threads.
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    cycle_statuses: CycleStatusSet,
}

impl ReplayEngine {
    pub fn new(cycle_statuses: CycleStatusSet) -> Self {
        Self { cycle_statuses }
    }

    pub fn cycle_statuses(&self) -> &CycleStatusSet {
        &self.cycle_statuses
    }

    /// Replays an issue, closing a still-open period at the current time
    /// unless the issue has a resolution timestamp.
    pub fn replay(&self, issue: &IssueSnapshot) -> Result<CycleTimeResult, ReplayError> {
        self.replay_at(issue, Timestamp::now())
    }

    /// Replays an issue with an explicit evaluation instant.
    pub fn replay_at(
        &self,
        issue: &IssueSnapshot,
        now: Timestamp,
    ) -> Result<CycleTimeResult, ReplayError> {
        let events = extract_status_events(issue).map_err(|e| ReplayError::parse(issue, e))?;

        let Some(first) = events.first() else {
            return Ok(CycleTimeResult::empty());
        };

        let mut open: Option<OpenPeriod> = None;
        if self.cycle_statuses.contains(first.to_status.as_deref()) {
            let created_at =
                Timestamp::parse(&issue.created_at).map_err(|e| ReplayError::parse(issue, e))?;
            open = Some(OpenPeriod {
                status: first.to_status.clone().unwrap_or_default(),
                start: created_at,
            });
        }

        let mut periods = Vec::new();

        for event in &events {
            if self.cycle_statuses.contains(event.from_status.as_deref()) {
                if let Some(period) = open.take() {
                    let status = event.from_status.clone().unwrap_or(period.status);
                    periods.push(StatusPeriod::new(status, period.start, event.timestamp));
                }
            }

            if self.cycle_statuses.contains(event.to_status.as_deref()) {
                open = Some(OpenPeriod {
                    status: event.to_status.clone().unwrap_or_default(),
                    start: event.timestamp,
                });
            }
        }

        if let Some(period) = open {
            let end = match issue.resolved_at.as_deref() {
                Some(resolved) => {
                    Timestamp::parse(resolved).map_err(|e| ReplayError::parse(issue, e))?
                }
                None => now,
            };
            periods.push(StatusPeriod::new(period.status, period.start, end));
        }

        let total_duration = periods
            .iter()
            .fold(Duration::zero(), |acc, p| acc + p.duration);

        Ok(CycleTimeResult {
            total_duration,
            periods,
        })
    }
}

/// Flattens an issue's changelog into status transitions sorted by time.
///
/// The sort is stable, so transitions sharing a timestamp keep the order
/// the tracker emitted them in.
pub fn extract_status_events(issue: &IssueSnapshot) -> Result<Vec<StatusChangeEvent>, ParseError> {
    let mut events = Vec::new();

    for entry in &issue.changelog {
        let mut entry_time = None;
        for item in entry.items.iter().filter(|item| item.is_status_change()) {
            let timestamp = match entry_time {
                Some(ts) => ts,
                None => {
                    let ts = Timestamp::parse(&entry.created)?;
                    entry_time = Some(ts);
                    ts
                }
            };
            events.push(StatusChangeEvent::new(
                timestamp,
                item.from_value.clone(),
                item.to_value.clone(),
            ));
        }
    }

    events.sort_by_key(|event| event.timestamp);
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::issue::{ChangelogEntry, FieldChange};

    const CREATED: &str = "2024-01-01T09:00:00.000+0000";
    const T0: &str = "2024-01-02T09:00:00.000+0000";
    const T1: &str = "2024-01-03T09:00:00.000+0000";
    const T2: &str = "2024-01-05T09:00:00.000+0000";
    const T3: &str = "2024-01-06T09:00:00.000+0000";

    fn ts(text: &str) -> Timestamp {
        Timestamp::parse(text).unwrap()
    }

    fn engine(statuses: &[&str]) -> ReplayEngine {
        ReplayEngine::new(CycleStatusSet::new(statuses).unwrap())
    }

    fn eval_time() -> Timestamp {
        ts("2024-02-01T09:00:00.000+0000")
    }

    #[test]
    fn empty_changelog_yields_zero() {
        let issue = IssueSnapshot::new("1", "TAS-1", "Doing", CREATED);
        let result = engine(&["Doing"]).replay_at(&issue, eval_time()).unwrap();

        assert_eq!(result, CycleTimeResult::empty());
    }

    #[test]
    fn changelog_without_status_items_yields_zero() {
        let issue = IssueSnapshot::new("1", "TAS-1", "Doing", CREATED).with_changelog_entry(
            ChangelogEntry::new(T0, vec![FieldChange::new("assignee", None, Some("Ada"))]),
        );
        let result = engine(&["Doing"]).replay_at(&issue, eval_time()).unwrap();

        assert_eq!(result, CycleTimeResult::empty());
    }

    #[test]
    fn walkthrough_doing_then_review_then_done() {
        let issue = IssueSnapshot::new("1", "TAS-1", "Done", CREATED)
            .with_transition(T0, Some("Backlog"), Some("Doing"))
            .with_transition(T1, Some("Doing"), Some("Review"))
            .with_transition(T2, Some("Review"), Some("Done"));

        let result = engine(&["Doing", "Review"])
            .replay_at(&issue, eval_time())
            .unwrap();

        assert_eq!(result.periods.len(), 2);
        assert_eq!(result.periods[0].status, "Doing");
        assert_eq!(result.periods[0].start, ts(T0));
        assert_eq!(result.periods[0].end, ts(T1));
        assert_eq!(result.periods[1].status, "Review");
        assert_eq!(result.periods[1].start, ts(T1));
        assert_eq!(result.periods[1].end, ts(T2));
        assert_eq!(
            result.total_duration,
            ts(T1).duration_since(&ts(T0)) + ts(T2).duration_since(&ts(T1))
        );
    }

    #[test]
    fn adjacent_cycle_statuses_share_boundary() {
        let issue = IssueSnapshot::new("1", "TAS-1", "Done", CREATED)
            .with_transition(T0, Some("To Do"), Some("In Progress"))
            .with_transition(T1, Some("In Progress"), Some("In Review"))
            .with_transition(T2, Some("In Review"), Some("Done"));

        let result = engine(&["In Progress", "In Review"])
            .replay_at(&issue, eval_time())
            .unwrap();

        assert_eq!(result.periods[0].end, result.periods[1].start);
        assert_eq!(result.total_duration, ts(T2).duration_since(&ts(T0)));
    }

    #[test]
    fn first_transition_out_of_cycle_status_starts_at_creation() {
        let issue = IssueSnapshot::new("1", "TAS-1", "Done", CREATED)
            .with_transition(T0, Some("Doing"), Some("Review"))
            .with_transition(T1, Some("Review"), Some("Done"));

        let result = engine(&["Doing", "Review"])
            .replay_at(&issue, eval_time())
            .unwrap();

        assert_eq!(result.periods[0].status, "Doing");
        assert_eq!(result.periods[0].start, ts(CREATED));
        assert_eq!(result.periods[0].end, ts(T0));
        assert_eq!(result.total_duration, ts(T1).duration_since(&ts(CREATED)));
    }

    #[test]
    fn first_entry_from_non_cycle_status_uses_event_time() {
        let issue = IssueSnapshot::new("1", "TAS-1", "Done", CREATED)
            .with_transition(T0, Some("Backlog"), Some("Doing"))
            .with_transition(T1, Some("Doing"), Some("Done"));

        let result = engine(&["Doing"]).replay_at(&issue, eval_time()).unwrap();

        assert_eq!(result.periods[0].start, ts(T0));
    }

    #[test]
    fn never_entering_cycle_yields_zero() {
        let issue = IssueSnapshot::new("1", "TAS-1", "Done", CREATED)
            .with_transition(T0, Some("Backlog"), Some("To Do"))
            .with_transition(T1, Some("To Do"), Some("Done"));

        let result = engine(&["Doing"]).replay_at(&issue, eval_time()).unwrap();

        assert_eq!(result, CycleTimeResult::empty());
    }

    #[test]
    fn multiple_cycles_are_summed() {
        let issue = IssueSnapshot::new("1", "TAS-1", "Done", CREATED)
            .with_transition(T0, Some("To Do"), Some("Doing"))
            .with_transition(T1, Some("Doing"), Some("To Do"))
            .with_transition(T2, Some("To Do"), Some("Doing"))
            .with_transition(T3, Some("Doing"), Some("Done"));

        let result = engine(&["Doing"]).replay_at(&issue, eval_time()).unwrap();

        assert_eq!(result.periods.len(), 2);
        assert_eq!(
            result.total_duration,
            ts(T1).duration_since(&ts(T0)) + ts(T3).duration_since(&ts(T2))
        );
    }

    #[test]
    fn open_period_closes_at_resolution() {
        let resolved = "2024-01-04T09:00:00.000+0000";
        let issue = IssueSnapshot::new("1", "TAS-1", "Review", CREATED)
            .with_resolved_at(resolved)
            .with_transition(T0, Some("To Do"), Some("Review"));

        let result = engine(&["Review"]).replay_at(&issue, eval_time()).unwrap();

        assert_eq!(result.periods.len(), 1);
        assert_eq!(result.periods[0].end, ts(resolved));
        assert_eq!(result.total_duration, Duration::days(2));
    }

    #[test]
    fn open_period_closes_at_evaluation_time_when_unresolved() {
        let issue = IssueSnapshot::new("1", "TAS-1", "Doing", CREATED)
            .with_transition(T0, Some("To Do"), Some("Doing"));
        let now = ts("2024-01-02T21:00:00.000+0000");

        let result = engine(&["Doing"]).replay_at(&issue, now).unwrap();

        assert_eq!(result.periods[0].status, "Doing");
        assert_eq!(result.periods[0].end, now);
        assert_eq!(result.total_duration, Duration::hours(12));
    }

    #[test]
    fn out_of_order_changelog_is_sorted() {
        let issue = IssueSnapshot::new("1", "TAS-1", "Done", CREATED)
            .with_transition(T1, Some("Doing"), Some("Done"))
            .with_transition(T0, Some("To Do"), Some("Doing"));

        let result = engine(&["Doing"]).replay_at(&issue, eval_time()).unwrap();

        assert_eq!(result.periods.len(), 1);
        assert_eq!(result.periods[0].start, ts(T0));
        assert_eq!(result.periods[0].end, ts(T1));
    }

    #[test]
    fn equal_timestamps_keep_emission_order() {
        let issue = IssueSnapshot::new("1", "TAS-1", "Review", CREATED).with_changelog_entry(
            ChangelogEntry::new(
                T0,
                vec![
                    FieldChange::status(Some("To Do"), Some("Doing")),
                    FieldChange::status(Some("Doing"), Some("Review")),
                ],
            ),
        );

        let events = extract_status_events(&issue).unwrap();
        assert_eq!(events[0].to_status.as_deref(), Some("Doing"));
        assert_eq!(events[1].to_status.as_deref(), Some("Review"));

        let result = engine(&["Doing", "Review"])
            .replay_at(&issue, ts(T1))
            .unwrap();
        assert_eq!(result.periods[0].status, "Doing");
        assert_eq!(result.periods[0].duration, Duration::zero());
        assert_eq!(result.periods[1].status, "Review");
        assert_eq!(result.total_duration, Duration::days(1));
    }

    #[test]
    fn offsets_are_respected_when_measuring() {
        let issue = IssueSnapshot::new("1", "TAS-1", "Done", CREATED)
            .with_transition("2024-01-02T10:00:00.000+0100", Some("To Do"), Some("Doing"))
            .with_transition("2024-01-02T10:00:00.000+0000", Some("Doing"), Some("Done"));

        let result = engine(&["Doing"]).replay_at(&issue, eval_time()).unwrap();

        assert_eq!(result.total_duration, Duration::hours(1));
    }

    #[test]
    fn malformed_changelog_timestamp_is_a_parse_error() {
        let issue = IssueSnapshot::new("1", "TAS-9", "Done", CREATED)
            .with_transition("not-a-date", Some("To Do"), Some("Doing"));

        let err = engine(&["Doing"]).replay_at(&issue, eval_time()).unwrap_err();

        let ReplayError::Parse { key, source } = err;
        assert_eq!(key, "TAS-9");
        assert_eq!(source, ParseError::invalid_timestamp("not-a-date"));
    }

    #[test]
    fn malformed_resolution_is_a_parse_error() {
        let issue = IssueSnapshot::new("1", "TAS-1", "Doing", CREATED)
            .with_resolved_at("soon")
            .with_transition(T0, Some("To Do"), Some("Doing"));

        assert!(engine(&["Doing"]).replay_at(&issue, eval_time()).is_err());
    }

    #[test]
    fn malformed_created_at_only_matters_when_used() {
        let issue = IssueSnapshot::new("1", "TAS-1", "Done", "garbage")
            .with_transition(T0, Some("To Do"), Some("Doing"))
            .with_transition(T1, Some("Doing"), Some("Done"));
        assert!(engine(&["Doing"]).replay_at(&issue, eval_time()).is_err());

        let unaffected = IssueSnapshot::new("1", "TAS-1", "Done", "garbage")
            .with_transition(T0, Some("To Do"), Some("Backlog"));
        assert!(engine(&["Doing"]).replay_at(&unaffected, eval_time()).is_ok());
    }
}
