//! Resilient executor - paces and retries every tracker request.
//!
//! All fetch strategies share one executor, so the request spacing holds
//! across strategies and across the per-issue detail requests.
//!
//! # Policy
//!
//! - Requests start at least `60 / requests_per_minute` seconds apart.
//! - HTTP 429: wait `Retry-After` (default 60s) plus 0.1-0.5s jitter, retry.
//! - HTTP 5xx and network failures: wait `base_backoff * 2^attempt` plus
//!   0-1s jitter, retry.
//! - Any other non-2xx status fails at once.
//! - After `max_retries` attempts the last failure is returned wrapped in
//!   `FetchError::Exhausted`.

use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::events::{FetchEventCallback, NoOpEventCallback, RetryReason, RetryScheduled};
use crate::ports::{Clock, FetchError, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Retry-After fallback when the header is missing or not an integer.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Longest response body excerpt kept in client/server error messages.
const ERROR_BODY_EXCERPT: usize = 200;

/// Executor configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorConfig {
    pub requests_per_minute: u32,
    /// Total attempts per request, including the first.
    pub max_retries: u32,
    /// Backoff before the second attempt; doubled for each later one.
    pub base_backoff: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            max_retries: 5,
            base_backoff: Duration::from_secs(1),
        }
    }
}

impl ExecutorConfig {
    pub fn with_requests_per_minute(mut self, rpm: u32) -> Self {
        self.requests_per_minute = rpm;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_backoff(mut self, base_backoff: Duration) -> Self {
        self.base_backoff = base_backoff;
        self
    }

    /// Minimum spacing between request starts.
    pub fn request_interval(&self) -> Duration {
        Duration::from_secs_f64(60.0 / f64::from(self.requests_per_minute.max(1)))
    }
}

/// Enforces the minimum spacing between request starts.
#[derive(Debug)]
struct RateGate {
    interval: Duration,
    last_request: Option<Instant>,
}

impl RateGate {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: None,
        }
    }

    /// How long to wait before the next request may start.
    fn wait_time(&self, now: Instant) -> Option<Duration> {
        let last = self.last_request?;
        let elapsed = now.saturating_duration_since(last);
        (elapsed < self.interval).then(|| self.interval - elapsed)
    }
}

/// Per-call bookkeeping.
#[derive(Debug, Default)]
struct RetryState {
    attempt_count: u32,
    last_error: Option<FetchError>,
}

/// What to do after one attempt.
enum AttemptOutcome {
    Done(serde_json::Value),
    Fail(FetchError),
    Retry {
        error: FetchError,
        reason: RetryReason,
        delay: Duration,
    },
}

/// Paces and retries requests on top of an `HttpTransport`.
pub struct ResilientExecutor {
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    config: ExecutorConfig,
    gate: Mutex<RateGate>,
    callback: Arc<dyn FetchEventCallback>,
}

impl ResilientExecutor {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        clock: Arc<dyn Clock>,
        config: ExecutorConfig,
    ) -> Self {
        let gate = Mutex::new(RateGate::new(config.request_interval()));
        Self {
            transport,
            clock,
            config,
            gate,
            callback: Arc::new(NoOpEventCallback),
        }
    }

    /// Sets the callback that receives retry events.
    pub fn with_event_callback(mut self, callback: Arc<dyn FetchEventCallback>) -> Self {
        self.callback = callback;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Sends `request` under the pacing and retry policy and decodes the
    /// JSON body of the first successful response.
    ///
    /// # Errors
    ///
    /// - `FetchError::Client` for non-retryable HTTP statuses
    /// - `FetchError::Parse` if a 2xx body is not JSON
    /// - `FetchError::Exhausted` once every attempt has failed
    pub async fn execute(&self, request: &HttpRequest) -> Result<serde_json::Value, FetchError> {
        let max_attempts = self.config.max_retries.max(1);
        let mut state = RetryState::default();

        while state.attempt_count < max_attempts {
            let attempt = state.attempt_count;
            state.attempt_count += 1;

            self.pace().await;
            let outcome = match self.transport.send(request).await {
                Ok(response) => self.classify_response(response, attempt),
                Err(err) => self.classify_transport_error(err, attempt),
            };

            match outcome {
                AttemptOutcome::Done(value) => return Ok(value),
                AttemptOutcome::Fail(err) => {
                    tracing::error!("{} {} failed: {}", request.method, request.url, err);
                    return Err(err);
                }
                AttemptOutcome::Retry {
                    error,
                    reason,
                    delay,
                } => {
                    state.last_error = Some(error);
                    if state.attempt_count >= max_attempts {
                        break;
                    }

                    tracing::warn!(
                        "{} {} attempt {}/{} failed ({:?}), retrying in {:.1}s",
                        request.method,
                        request.url,
                        state.attempt_count,
                        max_attempts,
                        reason,
                        delay.as_secs_f64()
                    );
                    self.callback.on_retry(RetryScheduled::new(
                        request.url.clone(),
                        state.attempt_count,
                        max_attempts,
                        reason,
                        delay.as_millis() as u64,
                    ));
                    self.clock.sleep(delay).await;
                }
            }
        }

        let last = state
            .last_error
            .unwrap_or_else(|| FetchError::network("no attempt was made"));
        tracing::error!(
            "{} {} giving up after {} attempts: {}",
            request.method,
            request.url,
            state.attempt_count,
            last
        );
        Err(FetchError::exhausted(state.attempt_count, last))
    }

    /// Waits until the rate gate allows another request and claims the slot.
    async fn pace(&self) {
        let mut gate = self.gate.lock().await;
        if let Some(wait) = gate.wait_time(self.clock.now()) {
            tracing::debug!("rate limit pacing: sleeping {:.3}s", wait.as_secs_f64());
            self.clock.sleep(wait).await;
        }
        gate.last_request = Some(self.clock.now());
    }

    fn classify_response(&self, response: HttpResponse, attempt: u32) -> AttemptOutcome {
        match response.status {
            429 => {
                let retry_after_secs = parse_retry_after(response.header("Retry-After"));
                AttemptOutcome::Retry {
                    error: FetchError::RateLimited { retry_after_secs },
                    reason: RetryReason::RateLimited { retry_after_secs },
                    delay: Duration::from_secs(retry_after_secs) + jitter(0.1, 0.5),
                }
            }
            status if status >= 500 => AttemptOutcome::Retry {
                error: FetchError::server(status, excerpt(&response.body)),
                reason: RetryReason::ServerError { status },
                delay: self.backoff_delay(attempt),
            },
            status if !response.is_success() => {
                AttemptOutcome::Fail(FetchError::client(status, excerpt(&response.body)))
            }
            _ => match serde_json::from_str(&response.body) {
                Ok(value) => AttemptOutcome::Done(value),
                Err(e) => AttemptOutcome::Fail(FetchError::parse(format!(
                    "invalid JSON response: {}",
                    e
                ))),
            },
        }
    }

    fn classify_transport_error(&self, err: TransportError, attempt: u32) -> AttemptOutcome {
        let message = err.to_string();
        let error = match err {
            TransportError::Timeout { timeout_secs } => FetchError::Timeout { timeout_secs },
            TransportError::Connect(_) | TransportError::Other(_) => {
                FetchError::network(message.clone())
            }
        };
        AttemptOutcome::Retry {
            error,
            reason: RetryReason::Network { message },
            delay: self.backoff_delay(attempt),
        }
    }

    /// `base_backoff * 2^attempt` plus up to one second of jitter.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.config.base_backoff.saturating_mul(factor) + jitter(0.0, 1.0)
    }
}

/// Reads a Retry-After header as whole seconds, defaulting to 60.
fn parse_retry_after(value: Option<&str>) -> u64 {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Uniform random duration in `[low, high)` seconds.
fn jitter(low: f64, high: f64) -> Duration {
    Duration::from_secs_f64(rand::thread_rng().gen_range(low..high))
}

fn excerpt(body: &str) -> String {
    body.chars().take(ERROR_BODY_EXCERPT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::MockClock;
    use crate::adapters::tracker::events::RecordingEventCallback;
    use crate::adapters::transport::MockTransport;
    use serde_json::json;

    const URL: &str = "https://tracker.example.com/rest/api/3/search";

    /// Fast pacing so only backoff sleeps show up.
    fn fast_config() -> ExecutorConfig {
        ExecutorConfig::default()
            .with_requests_per_minute(60_000)
            .with_base_backoff(Duration::from_millis(100))
    }

    fn executor(
        transport: &MockTransport,
        clock: &MockClock,
        config: ExecutorConfig,
    ) -> (ResilientExecutor, Arc<RecordingEventCallback>) {
        let events = Arc::new(RecordingEventCallback::new());
        let executor = ResilientExecutor::new(
            Arc::new(transport.clone()),
            Arc::new(clock.clone()),
            config,
        )
        .with_event_callback(events.clone());
        (executor, events)
    }

    #[tokio::test]
    async fn returns_json_on_first_success() {
        let transport = MockTransport::new().with_json(200, json!({"issues": []}));
        let clock = MockClock::new();
        let (executor, events) = executor(&transport, &clock, fast_config());

        let value = executor.execute(&HttpRequest::get(URL)).await.unwrap();

        assert_eq!(value, json!({"issues": []}));
        assert_eq!(transport.call_count(), 1);
        assert!(events.retries().is_empty());
    }

    #[tokio::test]
    async fn retries_server_errors_then_succeeds() {
        let transport = MockTransport::new()
            .with_status(500)
            .with_status(503)
            .with_json(200, json!({"ok": true}));
        let clock = MockClock::new();
        let (executor, events) = executor(&transport, &clock, fast_config());

        let value = executor.execute(&HttpRequest::get(URL)).await.unwrap();

        assert_eq!(value["ok"], true);
        assert_eq!(transport.call_count(), 3);

        let retries = events.retries();
        assert_eq!(retries.len(), 2);
        assert_eq!(retries[0].reason, RetryReason::ServerError { status: 500 });
        assert_eq!(retries[1].reason, RetryReason::ServerError { status: 503 });
        // 100ms * 2^0 + [0, 1s) jitter, then 100ms * 2^1 + jitter
        assert!(retries[0].delay_ms >= 100 && retries[0].delay_ms < 1100);
        assert!(retries[1].delay_ms >= 200 && retries[1].delay_ms < 1200);
    }

    #[tokio::test]
    async fn persistent_server_error_exhausts_after_max_retries() {
        let transport = MockTransport::new()
            .with_status(500)
            .with_status(500)
            .with_status(500)
            .with_status(500)
            .with_status(500)
            .with_status(500);
        let clock = MockClock::new();
        let (executor, events) = executor(&transport, &clock, fast_config());

        let err = executor.execute(&HttpRequest::get(URL)).await.unwrap_err();

        assert_eq!(transport.call_count(), 5);
        assert_eq!(events.retries().len(), 4);
        match err {
            FetchError::Exhausted { attempts, last } => {
                assert_eq!(attempts, 5);
                assert_eq!(last.status(), Some(500));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limited_honours_retry_after() {
        let transport = MockTransport::new()
            .with_response(HttpResponse::new(429, "").with_header("Retry-After", "7"))
            .with_json(200, json!({}));
        let clock = MockClock::new();
        let (executor, events) = executor(&transport, &clock, fast_config());

        executor.execute(&HttpRequest::get(URL)).await.unwrap();

        let retries = events.retries();
        assert_eq!(retries.len(), 1);
        assert_eq!(
            retries[0].reason,
            RetryReason::RateLimited { retry_after_secs: 7 }
        );
        assert!(retries[0].delay_ms >= 7_100 && retries[0].delay_ms < 7_500);
        assert!(clock.elapsed() >= Duration::from_millis(7_100));
    }

    #[tokio::test]
    async fn rate_limited_without_header_waits_default() {
        let transport = MockTransport::new()
            .with_response(HttpResponse::new(429, "").with_header("Retry-After", "soon"))
            .with_json(200, json!({}));
        let clock = MockClock::new();
        let (executor, events) = executor(&transport, &clock, fast_config());

        executor.execute(&HttpRequest::get(URL)).await.unwrap();

        assert_eq!(
            events.retries()[0].reason,
            RetryReason::RateLimited {
                retry_after_secs: DEFAULT_RETRY_AFTER_SECS
            }
        );
    }

    #[tokio::test]
    async fn client_error_fails_immediately() {
        let transport = MockTransport::new()
            .with_response(HttpResponse::new(404, "{\"errorMessages\":[\"no such issue\"]}"))
            .with_json(200, json!({}));
        let clock = MockClock::new();
        let (executor, events) = executor(&transport, &clock, fast_config());

        let err = executor.execute(&HttpRequest::get(URL)).await.unwrap_err();

        assert!(matches!(err, FetchError::Client { status: 404, .. }));
        assert_eq!(transport.call_count(), 1);
        assert_eq!(transport.remaining(), 1);
        assert!(events.retries().is_empty());
    }

    #[tokio::test]
    async fn network_errors_are_retried() {
        let transport = MockTransport::new()
            .with_error(TransportError::Connect("connection reset".to_string()))
            .with_error(TransportError::Timeout { timeout_secs: 30 })
            .with_json(200, json!({"ok": 1}));
        let clock = MockClock::new();
        let (executor, events) = executor(&transport, &clock, fast_config());

        let value = executor.execute(&HttpRequest::get(URL)).await.unwrap();

        assert_eq!(value["ok"], 1);
        assert_eq!(events.retries().len(), 2);
        assert!(matches!(
            events.retries()[0].reason,
            RetryReason::Network { .. }
        ));
    }

    #[tokio::test]
    async fn exhausted_network_error_keeps_timeout_cause() {
        let transport = MockTransport::new()
            .with_error(TransportError::Timeout { timeout_secs: 30 })
            .with_error(TransportError::Timeout { timeout_secs: 30 });
        let clock = MockClock::new();
        let (executor, _) = executor(&transport, &clock, fast_config().with_max_retries(2));

        let err = executor.execute(&HttpRequest::get(URL)).await.unwrap_err();

        assert_eq!(
            err,
            FetchError::exhausted(2, FetchError::Timeout { timeout_secs: 30 })
        );
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let transport = MockTransport::new().with_response(HttpResponse::new(200, "<html>"));
        let clock = MockClock::new();
        let (executor, _) = executor(&transport, &clock, fast_config());

        let err = executor.execute(&HttpRequest::get(URL)).await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn consecutive_requests_are_spaced_by_the_rate_limit() {
        let transport = MockTransport::new()
            .with_json(200, json!({}))
            .with_json(200, json!({}))
            .with_json(200, json!({}))
            .with_json(200, json!({}));
        let clock = MockClock::new();
        let config = ExecutorConfig::default().with_requests_per_minute(60);
        let (executor, _) = executor(&transport, &clock, config);

        for _ in 0..4 {
            executor.execute(&HttpRequest::get(URL)).await.unwrap();
        }

        assert_eq!(clock.sleep_count(), 3);
        assert!(clock.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test]
    async fn no_pacing_sleep_once_interval_has_passed() {
        let transport = MockTransport::new()
            .with_json(200, json!({}))
            .with_json(200, json!({}));
        let clock = MockClock::new();
        let config = ExecutorConfig::default().with_requests_per_minute(60);
        let (executor, _) = executor(&transport, &clock, config);

        executor.execute(&HttpRequest::get(URL)).await.unwrap();
        clock.advance(Duration::from_secs(2));
        executor.execute(&HttpRequest::get(URL)).await.unwrap();

        assert_eq!(clock.sleep_count(), 0);
    }

    #[test]
    fn request_interval_from_rpm() {
        let config = ExecutorConfig::default().with_requests_per_minute(120);
        assert_eq!(config.request_interval(), Duration::from_millis(500));
    }

    #[test]
    fn retry_after_parsing() {
        assert_eq!(parse_retry_after(Some("12")), 12);
        assert_eq!(parse_retry_after(Some(" 3 ")), 3);
        assert_eq!(parse_retry_after(Some("Wed, 21 Oct 2026 07:28:00 GMT")), 60);
        assert_eq!(parse_retry_after(None), 60);
    }

    #[test]
    fn rate_gate_wait_time() {
        let mut gate = RateGate::new(Duration::from_secs(1));
        let start = Instant::now();
        assert_eq!(gate.wait_time(start), None);

        gate.last_request = Some(start);
        assert_eq!(
            gate.wait_time(start + Duration::from_millis(400)),
            Some(Duration::from_millis(600))
        );
        assert_eq!(gate.wait_time(start + Duration::from_secs(1)), None);
    }
}
