//! Virtual clock for tests.
//!
//! Time only moves when something sleeps or the test calls `advance`, and
//! each sleep is recorded so tests can assert on pacing and backoff.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::ports::Clock;

#[derive(Debug, Default)]
struct MockClockState {
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

/// Deterministic clock. Clones share the same virtual time.
#[derive(Debug, Clone)]
pub struct MockClock {
    origin: Instant,
    state: Arc<Mutex<MockClockState>>,
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Arc::new(Mutex::new(MockClockState::default())),
        }
    }

    /// Moves virtual time forward without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        self.state.lock().unwrap().elapsed += duration;
    }

    /// Virtual time since construction.
    pub fn elapsed(&self) -> Duration {
        self.state.lock().unwrap().elapsed
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.lock().unwrap().sleeps.clone()
    }

    pub fn sleep_count(&self) -> usize {
        self.state.lock().unwrap().sleeps.len()
    }
}

#[async_trait]
impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.origin + self.state.lock().unwrap().elapsed
    }

    async fn sleep(&self, duration: Duration) {
        let mut state = self.state.lock().unwrap();
        state.elapsed += duration;
        state.sleeps.push(duration);
    }
}
