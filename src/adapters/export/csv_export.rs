//! CSV export and import of metric records.
//!
//! Columns follow `METRIC_COLUMNS`; absent optional fields are empty cells.
//! The header is written even when there are no records.

use std::io::{Read, Write};
use std::path::Path;

use super::atomic::write_atomic;
use crate::ports::ExportError;
use crate::domain::metrics::{MetricRecord, METRIC_COLUMNS};

/// Serializes records to CSV on any writer.
pub fn write_records<W: Write>(writer: W, records: &[MetricRecord]) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(METRIC_COLUMNS)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Reads records from CSV produced by `write_records`.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<MetricRecord>, ExportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let records = csv_reader
        .deserialize()
        .collect::<Result<Vec<MetricRecord>, csv::Error>>()?;
    Ok(records)
}

/// Writes records to a CSV file.
pub async fn export_csv(path: &Path, records: &[MetricRecord]) -> Result<(), ExportError> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, records)?;
    write_atomic(path, &buffer).await?;
    tracing::info!("Exported {} records to {}", records.len(), path.display());
    Ok(())
}

/// Loads records from a CSV file.
pub async fn import_csv(path: &Path) -> Result<Vec<MetricRecord>, ExportError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ExportError::io(path, e))?;
    let records = read_records(bytes.as_slice())?;
    tracing::info!("Loaded {} issues from {}", records.len(), path.display());
    Ok(records)
}
