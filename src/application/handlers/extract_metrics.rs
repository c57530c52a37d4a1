//! ExtractMetricsHandler - fetches issues, replays them, and writes exports.
//!
//! Extraction is all-or-nothing: every issue is replayed before anything is
//! written, so a fetch or replay failure leaves no output files.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::adapters::export::json_path_for;
use crate::domain::foundation::Timestamp;
use crate::domain::metrics::{ExtractionSummary, IssueMetrics, MetricRecord};
use crate::domain::replay::{ReplayEngine, ReplayError};
use crate::ports::{ExportError, FetchError, IssueQuery, IssueSource, MetricsStore};

/// Command to extract cycle time metrics for a query.
#[derive(Debug, Clone)]
pub struct ExtractMetricsCommand {
    pub jql: String,
    pub max_results: usize,
    /// Where to write the flat CSV; `None` skips all file output.
    pub output: Option<PathBuf>,
    /// Also write the detailed JSON next to the CSV.
    pub include_detailed: bool,
}

impl ExtractMetricsCommand {
    pub fn new(jql: impl Into<String>, max_results: usize) -> Self {
        Self {
            jql: jql.into(),
            max_results,
            output: None,
            include_detailed: false,
        }
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn with_detailed(mut self, include_detailed: bool) -> Self {
        self.include_detailed = include_detailed;
        self
    }
}

/// Result of a successful extraction.
#[derive(Debug, Clone)]
pub struct ExtractMetricsResult {
    /// One entry per fetched issue, in fetch order.
    pub metrics: Vec<IssueMetrics>,
    pub summary: ExtractionSummary,
    /// Files written, CSV first.
    pub written: Vec<PathBuf>,
}

impl ExtractMetricsResult {
    pub fn records(&self) -> Vec<MetricRecord> {
        self.metrics.iter().map(|m| m.record.clone()).collect()
    }
}

/// Errors that abort an extraction.
#[derive(Debug, Error)]
pub enum ExtractMetricsError {
    #[error("failed to fetch issues: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to compute cycle time: {0}")]
    Replay(#[from] ReplayError),

    #[error("failed to write export: {0}")]
    Export(#[from] ExportError),
}

/// Handler for metric extraction.
pub struct ExtractMetricsHandler {
    source: Arc<dyn IssueSource>,
    engine: ReplayEngine,
    store: Arc<dyn MetricsStore>,
}

impl ExtractMetricsHandler {
    pub fn new(
        source: Arc<dyn IssueSource>,
        engine: ReplayEngine,
        store: Arc<dyn MetricsStore>,
    ) -> Self {
        Self {
            source,
            engine,
            store,
        }
    }

    pub async fn handle(
        &self,
        cmd: ExtractMetricsCommand,
    ) -> Result<ExtractMetricsResult, ExtractMetricsError> {
        self.handle_at(cmd, Timestamp::now()).await
    }

    /// Runs the extraction, closing still-open periods of unresolved issues
    /// at `now`.
    pub async fn handle_at(
        &self,
        cmd: ExtractMetricsCommand,
        now: Timestamp,
    ) -> Result<ExtractMetricsResult, ExtractMetricsError> {
        tracing::info!("Fetching issues with query: {}", cmd.jql);
        let query = IssueQuery::new(cmd.jql.clone(), cmd.max_results);
        let issues = self.source.fetch(&query).await?;
        tracing::info!("Found {} issues", issues.len());

        let mut metrics = Vec::with_capacity(issues.len());
        for (index, issue) in issues.iter().enumerate() {
            let result = self.engine.replay_at(issue, now)?;
            tracing::debug!(
                "Processed {}/{}: {} - {:.1} hours",
                index + 1,
                issues.len(),
                issue.key,
                result.total_hours()
            );
            metrics.push(IssueMetrics::from_replay(issue, &result));
        }

        let records: Vec<MetricRecord> = metrics.iter().map(|m| m.record.clone()).collect();
        let summary = ExtractionSummary::from_records(&records);

        let mut written = Vec::new();
        if let Some(csv_path) = cmd.output.as_ref() {
            self.store.save_records(csv_path, &records).await?;
            written.push(csv_path.clone());

            if cmd.include_detailed {
                let json_path = json_path_for(csv_path);
                self.store.save_detailed(&json_path, &metrics).await?;
                written.push(json_path);
            }
        }

        Ok(ExtractMetricsResult {
            metrics,
            summary,
            written,
        })
    }
}
