//! Metrics module - per-issue output records handed to exporters.

mod record;

pub use record::{ExtractionSummary, IssueMetrics, MetricRecord, METRIC_COLUMNS};
