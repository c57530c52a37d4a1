//! System clock backed by tokio's timer.

use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::ports::Clock;

/// Real wall time; sleeps yield to the tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
