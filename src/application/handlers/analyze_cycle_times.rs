//! AnalyzeCycleTimesHandler - outlier analysis over an exported record file.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::analysis::{AnalysisReport, OutlierMethod};
use crate::ports::{ExportError, MetricsStore};

/// Command to analyze a previously exported record file.
#[derive(Debug, Clone)]
pub struct AnalyzeCycleTimesCommand {
    pub input: PathBuf,
    /// Methods to run, in report order.
    pub methods: Vec<OutlierMethod>,
}

/// Errors from cycle time analysis.
#[derive(Debug, Error)]
pub enum AnalyzeCycleTimesError {
    #[error("failed to load records: {0}")]
    Load(#[from] ExportError),

    #[error("no outlier methods requested")]
    NoMethods,
}

/// Handler for cycle time analysis.
pub struct AnalyzeCycleTimesHandler {
    store: Arc<dyn MetricsStore>,
}

impl AnalyzeCycleTimesHandler {
    pub fn new(store: Arc<dyn MetricsStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: AnalyzeCycleTimesCommand,
    ) -> Result<AnalysisReport, AnalyzeCycleTimesError> {
        if cmd.methods.is_empty() {
            return Err(AnalyzeCycleTimesError::NoMethods);
        }

        let records = self.store.load_records(&cmd.input).await?;
        tracing::info!("Analyzing {} issues from {}", records.len(), cmd.input.display());

        Ok(AnalysisReport::build(&records, &cmd.methods))
    }
}
