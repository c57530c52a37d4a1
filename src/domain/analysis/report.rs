//! Analysis report - everything one outlier-removal run produces.

use serde::Serialize;

use super::breakdown::{BreakdownAnalyzer, GroupStatistics};
use super::outliers::{OutlierAnalyzer, OutlierBounds, OutlierMethod};
use super::statistics::SampleStatistics;
use crate::domain::metrics::MetricRecord;

/// Assignees listed in a per-method breakdown.
pub const TOP_ASSIGNEES: usize = 10;

/// Longest outliers listed in a per-method report.
pub const TOP_OUTLIERS: usize = 10;

/// Before/after comparison for one method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImprovementSummary {
    pub mean_reduction_pct: f64,
    /// `None` when either sample has no defined standard deviation.
    pub std_reduction_pct: Option<f64>,
    pub retained_pct: f64,
    /// Median of the cleaned sample, in days.
    pub recommended_cycle_time_days: f64,
    /// Cleaned 25th and 75th percentiles, in days.
    pub typical_range_days: (f64, f64),
}

impl ImprovementSummary {
    fn compare(original: &SampleStatistics, cleaned: &SampleStatistics) -> Self {
        let std_reduction_pct = match (original.std, cleaned.std) {
            (Some(before), Some(after)) => reduction_pct(before, after),
            _ => None,
        };
        Self {
            mean_reduction_pct: reduction_pct(original.mean, cleaned.mean).unwrap_or(0.0),
            std_reduction_pct,
            retained_pct: cleaned.count as f64 / original.count as f64 * 100.0,
            recommended_cycle_time_days: cleaned.median,
            typical_range_days: (cleaned.q25, cleaned.q75),
        }
    }
}

fn reduction_pct(before: f64, after: f64) -> Option<f64> {
    (before != 0.0).then(|| (before - after) / before * 100.0)
}

/// Results of one outlier method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodReport {
    pub method: OutlierMethod,
    pub bounds: Option<OutlierBounds>,
    pub outlier_count: usize,
    pub outlier_percentage: f64,
    pub cleaned: Option<SampleStatistics>,
    /// Cleaned records grouped by issue type.
    pub by_issue_type: Vec<GroupStatistics>,
    /// Cleaned records, busiest assignees first.
    pub by_assignee: Vec<GroupStatistics>,
    pub longest_outliers: Vec<MetricRecord>,
    /// Removed records grouped by issue type.
    pub outlier_issue_types: Vec<GroupStatistics>,
    pub improvement: Option<ImprovementSummary>,
}

/// Statistics for the full sample plus one report per method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub record_count: usize,
    pub original: Option<SampleStatistics>,
    pub methods: Vec<MethodReport>,
}

impl AnalysisReport {
    /// Runs every method over `records`, in order.
    pub fn build(records: &[MetricRecord], methods: &[OutlierMethod]) -> Self {
        let values: Vec<f64> = records.iter().map(|r| r.cycle_time_days).collect();
        let original = SampleStatistics::compute(&values);

        let methods = methods
            .iter()
            .map(|method| Self::run_method(records, *method, original.as_ref()))
            .collect();

        Self {
            record_count: records.len(),
            original,
            methods,
        }
    }

    fn run_method(
        records: &[MetricRecord],
        method: OutlierMethod,
        original: Option<&SampleStatistics>,
    ) -> MethodReport {
        let split = OutlierAnalyzer::split(records, method);
        let cleaned_values: Vec<f64> = split.kept.iter().map(|r| r.cycle_time_days).collect();
        let cleaned = SampleStatistics::compute(&cleaned_values);

        let improvement = match (original, cleaned.as_ref()) {
            (Some(original), Some(cleaned)) => Some(ImprovementSummary::compare(original, cleaned)),
            _ => None,
        };

        MethodReport {
            method,
            bounds: split.bounds,
            outlier_count: split.outliers.len(),
            outlier_percentage: split.outlier_percentage(),
            by_issue_type: BreakdownAnalyzer::by_issue_type(&split.kept),
            by_assignee: BreakdownAnalyzer::by_assignee(&split.kept, TOP_ASSIGNEES),
            longest_outliers: split
                .longest_outliers(TOP_OUTLIERS)
                .into_iter()
                .cloned()
                .collect(),
            outlier_issue_types: BreakdownAnalyzer::by_issue_type(&split.outliers),
            cleaned,
            improvement,
        }
    }
}
