//! Issue module - tracker issues and their status history.

mod cycle_statuses;
mod events;
mod snapshot;

pub use cycle_statuses::CycleStatusSet;
pub use events::{CycleTimeResult, PeriodSummary, StatusChangeEvent, StatusPeriod};
pub use snapshot::{ChangelogEntry, FieldChange, IssueSnapshot, STATUS_FIELD};
