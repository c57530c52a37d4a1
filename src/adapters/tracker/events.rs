//! Fetch events for retry, fallback, and skip monitoring.
//!
//! Every event is also logged through `tracing`; the callback exists for
//! callers (and tests) that want the structured form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use uuid::Uuid;

/// Why a request is being retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RetryReason {
    /// HTTP 429; the delay follows the server's Retry-After hint.
    RateLimited { retry_after_secs: u64 },
    /// HTTP 5xx; exponential backoff.
    ServerError { status: u16 },
    /// Connection failure or timeout; exponential backoff.
    Network { message: String },
}

/// Emitted before the executor sleeps ahead of another attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryScheduled {
    pub event_id: Uuid,
    pub url: String,
    /// The attempt that just failed (1-based).
    pub attempt: u32,
    pub max_attempts: u32,
    pub reason: RetryReason,
    pub delay_ms: u64,
    pub occurred_at: DateTime<Utc>,
}

impl RetryScheduled {
    pub fn new(
        url: impl Into<String>,
        attempt: u32,
        max_attempts: u32,
        reason: RetryReason,
        delay_ms: u64,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            url: url.into(),
            attempt,
            max_attempts,
            reason,
            delay_ms,
            occurred_at: Utc::now(),
        }
    }
}

/// Emitted when a fetch strategy fails and the next one is tried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyFallback {
    pub event_id: Uuid,
    pub failed_strategy: String,
    pub next_strategy: String,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

impl StrategyFallback {
    pub fn new(
        failed: impl Into<String>,
        next: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            failed_strategy: failed.into(),
            next_strategy: next.into(),
            reason: reason.into(),
            occurred_at: Utc::now(),
        }
    }
}

/// Emitted when a single issue's detail fetch fails and the issue is dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueSkipped {
    pub event_id: Uuid,
    pub issue_id: String,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

impl IssueSkipped {
    pub fn new(issue_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            issue_id: issue_id.into(),
            reason: reason.into(),
            occurred_at: Utc::now(),
        }
    }
}

/// Callback for receiving fetch events.
pub trait FetchEventCallback: Send + Sync {
    /// Called before sleeping ahead of a retry.
    fn on_retry(&self, event: RetryScheduled);

    /// Called when falling back to the next fetch strategy.
    fn on_fallback(&self, event: StrategyFallback);

    /// Called when an issue is skipped after a failed detail fetch.
    fn on_issue_skipped(&self, event: IssueSkipped);
}

/// No-op event callback for when event tracking isn't needed.
#[derive(Debug, Clone, Copy)]
pub struct NoOpEventCallback;

impl FetchEventCallback for NoOpEventCallback {
    fn on_retry(&self, _event: RetryScheduled) {}
    fn on_fallback(&self, _event: StrategyFallback) {}
    fn on_issue_skipped(&self, _event: IssueSkipped) {}
}

/// Callback that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingEventCallback {
    retries: Mutex<Vec<RetryScheduled>>,
    fallbacks: Mutex<Vec<StrategyFallback>>,
    skipped: Mutex<Vec<IssueSkipped>>,
}

impl RecordingEventCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retries(&self) -> Vec<RetryScheduled> {
        self.retries.lock().unwrap().clone()
    }

    pub fn fallbacks(&self) -> Vec<StrategyFallback> {
        self.fallbacks.lock().unwrap().clone()
    }

    pub fn skipped(&self) -> Vec<IssueSkipped> {
        self.skipped.lock().unwrap().clone()
    }
}

impl FetchEventCallback for RecordingEventCallback {
    fn on_retry(&self, event: RetryScheduled) {
        self.retries.lock().unwrap().push(event);
    }

    fn on_fallback(&self, event: StrategyFallback) {
        self.fallbacks.lock().unwrap().push(event);
    }

    fn on_issue_skipped(&self, event: IssueSkipped) {
        self.skipped.lock().unwrap().push(event);
    }
}
