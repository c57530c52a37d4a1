//! Analysis Module - Pure statistics over extracted cycle times.
//!
//! Operates on `MetricRecord`s (usually read back from a CSV export) and
//! never touches the network.
//!
//! # Components
//!
//! - `SampleStatistics` - descriptive statistics (mean, quantiles, shape)
//! - `OutlierAnalyzer` - IQR, z-score, and percentile outlier removal
//! - `BreakdownAnalyzer` - per issue type and per assignee summaries
//! - `AnalysisReport` - one run of all of the above per outlier method

mod breakdown;
mod outliers;
mod report;
mod statistics;

pub use breakdown::{BreakdownAnalyzer, GroupStatistics};
pub use outliers::{
    OutlierAnalyzer, OutlierBounds, OutlierMethod, OutlierSplit, DEFAULT_PERCENTILE_LOWER,
    DEFAULT_PERCENTILE_UPPER, DEFAULT_ZSCORE_THRESHOLD, IQR_FENCE,
};
pub use report::{AnalysisReport, ImprovementSummary, MethodReport, TOP_ASSIGNEES, TOP_OUTLIERS};
pub use statistics::{quantile, SampleStatistics};
