//! Metrics Store Port - persistence for extracted metrics.
//!
//! Extraction writes a flat record file and, optionally, a detailed file
//! with status periods. Analysis reads the flat records back.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::metrics::{IssueMetrics, MetricRecord};

/// Port for saving and loading metric files.
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Writes one flat row per issue.
    async fn save_records(&self, path: &Path, records: &[MetricRecord]) -> Result<(), ExportError>;

    /// Writes full metrics including status periods.
    async fn save_detailed(&self, path: &Path, metrics: &[IssueMetrics]) -> Result<(), ExportError>;

    /// Reads rows written by `save_records`.
    async fn load_records(&self, path: &Path) -> Result<Vec<MetricRecord>, ExportError>;
}

/// Failures while writing or reading exported metrics.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
