//! Fetch pacing and retry configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Largest page the tracker's search endpoints accept
pub const MAX_PAGE_SIZE: usize = 100;

/// Request pacing, retries, and result limits
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FetchConfig {
    /// Requests allowed per minute
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,

    /// Attempts per request, including the first
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff before the second attempt, in milliseconds
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Default cap on issues per extraction
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Issues requested per search page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl FetchConfig {
    pub fn base_backoff(&self) -> Duration {
        Duration::from_millis(self.base_backoff_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate fetch configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.requests_per_minute == 0 {
            return Err(ValidationError::InvalidRateLimit);
        }
        if self.max_retries == 0 {
            return Err(ValidationError::InvalidMaxRetries);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ValidationError::InvalidPageSize { max: MAX_PAGE_SIZE });
        }
        Ok(())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
            max_retries: default_max_retries(),
            base_backoff_ms: default_base_backoff_ms(),
            timeout_secs: default_timeout_secs(),
            max_results: default_max_results(),
            page_size: default_page_size(),
        }
    }
}

fn default_requests_per_minute() -> u32 {
    60
}

fn default_max_retries() -> u32 {
    5
}

fn default_base_backoff_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_results() -> usize {
    1000
}

fn default_page_size() -> usize {
    MAX_PAGE_SIZE
}
