//! Command handlers.
//!
//! - `ExtractMetricsHandler` - fetch, replay, export
//! - `AnalyzeCycleTimesHandler` - outlier analysis over an export

mod analyze_cycle_times;
mod extract_metrics;

pub use analyze_cycle_times::{
    AnalyzeCycleTimesCommand, AnalyzeCycleTimesError, AnalyzeCycleTimesHandler,
};
pub use extract_metrics::{
    ExtractMetricsCommand, ExtractMetricsError, ExtractMetricsHandler, ExtractMetricsResult,
};
