//! Issue Source Port - one strategy for fetching issues from the tracker.
//!
//! The tracker exposes incompatible search APIs; each is an `IssueSource`
//! implementation. A failover source tries them in a fixed order.
//!
//! # Example
//!
//! ```ignore
//! let query = IssueQuery::new("project = TAS AND resolved >= -30d", 200);
//! let issues = source.fetch(&query).await?;
//! ```

use async_trait::async_trait;

use crate::domain::issue::IssueSnapshot;

/// Port for fetching issue snapshots (with changelogs).
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Fetches up to `query.max_results` issues in the tracker's order.
    async fn fetch(&self, query: &IssueQuery) -> Result<Vec<IssueSnapshot>, FetchError>;

    /// Short strategy name for logs and events.
    fn name(&self) -> &'static str;
}

/// A search query and a hard cap on returned issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueQuery {
    /// Tracker query language expression.
    pub jql: String,
    pub max_results: usize,
}

impl IssueQuery {
    pub fn new(jql: impl Into<String>, max_results: usize) -> Self {
        Self {
            jql: jql.into(),
            max_results,
        }
    }
}

/// Fetch errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Server asked us to slow down (HTTP 429).
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u64,
    },

    /// HTTP 5xx.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// HTTP 4xx other than 429: bad query or credentials.
    #[error("client error {status}: {message}")]
    Client { status: u16, message: String },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Response body did not match the expected schema.
    #[error("parse error: {0}")]
    Parse(String),

    /// Retries used up; carries the last observed failure.
    #[error("giving up after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<FetchError>,
    },

    /// A failover source was built without any strategies.
    #[error("no fetch strategies configured")]
    NoStrategies,
}

impl FetchError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn client(status: u16, message: impl Into<String>) -> Self {
        Self::Client {
            status,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn exhausted(attempts: u32, last: FetchError) -> Self {
        Self::Exhausted {
            attempts,
            last: Box::new(last),
        }
    }

    /// Returns true if a later attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchError::RateLimited { .. }
                | FetchError::Server { .. }
                | FetchError::Network(_)
                | FetchError::Timeout { .. }
        )
    }

    /// HTTP status behind this error, looking through `Exhausted`.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::RateLimited { .. } => Some(429),
            FetchError::Server { status, .. } | FetchError::Client { status, .. } => Some(*status),
            FetchError::Exhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(FetchError::RateLimited { retry_after_secs: 30 }.is_retryable());
        assert!(FetchError::server(503, "down").is_retryable());
        assert!(FetchError::network("reset").is_retryable());
        assert!(FetchError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!FetchError::client(401, "unauthorized").is_retryable());
        assert!(!FetchError::parse("bad json").is_retryable());
        assert!(!FetchError::exhausted(5, FetchError::server(500, "x")).is_retryable());
        assert!(!FetchError::NoStrategies.is_retryable());
    }

    #[test]
    fn status_looks_through_exhausted() {
        let err = FetchError::exhausted(5, FetchError::server(502, "bad gateway"));
        assert_eq!(err.status(), Some(502));
        assert_eq!(FetchError::network("x").status(), None);
    }

    #[test]
    fn exhausted_display_includes_cause() {
        let err = FetchError::exhausted(5, FetchError::server(500, "boom"));
        assert_eq!(
            err.to_string(),
            "giving up after 5 attempts: server error 500: boom"
        );
    }

    #[test]
    fn query_holds_cap() {
        let query = IssueQuery::new("project = TAS", 250);
        assert_eq!(query.max_results, 250);
    }
}
