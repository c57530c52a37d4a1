//! Failover issue source - tries fetch strategies in a fixed order.
//!
//! The first strategy that completes wins. A strategy that fails is logged
//! and the next one is tried from scratch; partial results are discarded.
//!
//! # Example
//!
//! ```ignore
//! let source = FailoverIssueSource::new(vec![token_cursor, offset])
//!     .with_event_callback(callback);
//! let issues = source.fetch(&query).await?;
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use super::events::{FetchEventCallback, NoOpEventCallback, StrategyFallback};
use super::executor::ResilientExecutor;
use super::offset::OffsetSource;
use super::token_cursor::TokenCursorSource;
use super::wire::TrackerEndpoints;
use crate::domain::issue::IssueSnapshot;
use crate::ports::{FetchError, IssueQuery, IssueSource};

/// Issue source that falls back through an ordered list of strategies.
pub struct FailoverIssueSource {
    strategies: Vec<Arc<dyn IssueSource>>,
    callback: Arc<dyn FetchEventCallback>,
}

impl FailoverIssueSource {
    pub fn new(strategies: Vec<Arc<dyn IssueSource>>) -> Self {
        Self {
            strategies,
            callback: Arc::new(NoOpEventCallback),
        }
    }

    /// The tracker's standard order: token-cursor search first, then offset
    /// search. Both share `executor`, so pacing holds across them.
    pub fn for_tracker(
        executor: Arc<ResilientExecutor>,
        endpoints: TrackerEndpoints,
        page_size: usize,
        callback: Arc<dyn FetchEventCallback>,
    ) -> Self {
        let token_cursor = TokenCursorSource::new(executor.clone(), endpoints.clone())
            .with_page_size(page_size)
            .with_event_callback(callback.clone());
        let offset = OffsetSource::new(executor, endpoints).with_page_size(page_size);

        let strategies: Vec<Arc<dyn IssueSource>> = vec![Arc::new(token_cursor), Arc::new(offset)];
        Self::new(strategies).with_event_callback(callback)
    }

    pub fn with_event_callback(mut self, callback: Arc<dyn FetchEventCallback>) -> Self {
        self.callback = callback;
        self
    }

    /// Names of the configured strategies, in order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

#[async_trait]
impl IssueSource for FailoverIssueSource {
    async fn fetch(&self, query: &IssueQuery) -> Result<Vec<IssueSnapshot>, FetchError> {
        let mut last_error = FetchError::NoStrategies;

        for (index, strategy) in self.strategies.iter().enumerate() {
            match strategy.fetch(query).await {
                Ok(issues) => {
                    tracing::info!(
                        "Fetched {} issues using {} strategy",
                        issues.len(),
                        strategy.name()
                    );
                    return Ok(issues);
                }
                Err(e) => {
                    match self.strategies.get(index + 1) {
                        Some(next) => {
                            tracing::warn!(
                                "{} strategy failed: {}, trying {}",
                                strategy.name(),
                                e,
                                next.name()
                            );
                            self.callback.on_fallback(StrategyFallback::new(
                                strategy.name(),
                                next.name(),
                                e.to_string(),
                            ));
                        }
                        None => {
                            tracing::error!("{} strategy failed: {}", strategy.name(), e);
                        }
                    }
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    fn name(&self) -> &'static str {
        "failover"
    }
}
