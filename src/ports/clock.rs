//! Clock Port - time source and suspension for pacing and backoff.
//!
//! Injected into the executor so tests can run retry and rate-limit
//! scenarios on virtual time.

use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Port for reading monotonic time and sleeping.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current monotonic instant.
    fn now(&self) -> Instant;

    /// Suspends the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}
