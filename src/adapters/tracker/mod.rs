//! Tracker adapters - fetching issues over the tracker's REST API.
//!
//! - `ResilientExecutor` - pacing and retries shared by every request
//! - `TokenCursorSource` - token-paginated search plus per-issue detail
//! - `OffsetSource` - offset-paginated search
//! - `FailoverIssueSource` - tries the strategies in order

pub mod events;
mod executor;
mod failover;
mod offset;
mod token_cursor;
mod wire;

pub use events::{
    FetchEventCallback, IssueSkipped, NoOpEventCallback, RecordingEventCallback, RetryReason,
    RetryScheduled, StrategyFallback,
};
pub use executor::{ExecutorConfig, ResilientExecutor, DEFAULT_RETRY_AFTER_SECS};
pub use failover::FailoverIssueSource;
pub use offset::OffsetSource;
pub use token_cursor::{TokenCursorSource, DEFAULT_PAGE_SIZE};
pub use wire::{TrackerEndpoints, CHANGELOG_EXPAND, ISSUE_FIELDS};
