//! Export adapters - metric files and text reports.
//!
//! Files are written atomically (temp file then rename), so a failed run
//! never leaves a half-written export behind.

mod atomic;
mod csv_export;
mod file_store;
mod json_export;
mod report;

pub use atomic::write_atomic;
pub use csv_export::{export_csv, import_csv, read_records, write_records};
pub use file_store::FileMetricsStore;
pub use json_export::{export_json, json_path_for};
pub use report::{render_analysis_report, render_extraction_summary};
