//! File-backed metrics store: CSV for flat records, JSON for details.

use async_trait::async_trait;
use std::path::Path;

use super::csv_export::{export_csv, import_csv};
use super::json_export::export_json;
use crate::domain::metrics::{IssueMetrics, MetricRecord};
use crate::ports::{ExportError, MetricsStore};

/// Stores metrics on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileMetricsStore;

impl FileMetricsStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MetricsStore for FileMetricsStore {
    async fn save_records(&self, path: &Path, records: &[MetricRecord]) -> Result<(), ExportError> {
        export_csv(path, records).await
    }

    async fn save_detailed(&self, path: &Path, metrics: &[IssueMetrics]) -> Result<(), ExportError> {
        export_json(path, metrics).await
    }

    async fn load_records(&self, path: &Path) -> Result<Vec<MetricRecord>, ExportError> {
        import_csv(path).await
    }
}
