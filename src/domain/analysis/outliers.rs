//! Outlier detection - splits records into kept and removed sets.

use serde::Serialize;
use std::fmt;

use super::statistics::{mean, quantile, sample_std};
use crate::domain::metrics::MetricRecord;

/// Multiplier applied to the interquartile range for IQR fences.
pub const IQR_FENCE: f64 = 1.5;

/// Default |z| above which a record is an outlier.
pub const DEFAULT_ZSCORE_THRESHOLD: f64 = 3.0;

/// Default percentile window (inclusive) kept by the percentile method.
pub const DEFAULT_PERCENTILE_LOWER: f64 = 5.0;
pub const DEFAULT_PERCENTILE_UPPER: f64 = 95.0;

/// Strategy used to decide which cycle times are outliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "method")]
pub enum OutlierMethod {
    /// Outside `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`.
    Iqr,
    /// `|x - mean| / std > threshold`.
    ZScore { threshold: f64 },
    /// Outside the `[lower, upper]` percentile values (0-100 scale).
    Percentile { lower: f64, upper: f64 },
}

impl OutlierMethod {
    pub fn zscore() -> Self {
        OutlierMethod::ZScore {
            threshold: DEFAULT_ZSCORE_THRESHOLD,
        }
    }

    pub fn percentile() -> Self {
        OutlierMethod::Percentile {
            lower: DEFAULT_PERCENTILE_LOWER,
            upper: DEFAULT_PERCENTILE_UPPER,
        }
    }

    /// Short uppercase label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            OutlierMethod::Iqr => "IQR",
            OutlierMethod::ZScore { .. } => "ZSCORE",
            OutlierMethod::Percentile { .. } => "PERCENTILE",
        }
    }
}

impl fmt::Display for OutlierMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlierMethod::Iqr => write!(f, "IQR"),
            OutlierMethod::ZScore { threshold } => write!(f, "Z-Score (threshold={})", threshold),
            OutlierMethod::Percentile { lower, upper } => {
                write!(f, "Percentile ({}th-{}th)", lower, upper)
            }
        }
    }
}

/// Inclusive range of accepted cycle times, in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutlierBounds {
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Result of applying an outlier method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierSplit {
    pub method: OutlierMethod,
    /// `None` when the sample cannot define bounds (empty, or zero spread
    /// for z-scores); every record is then kept.
    pub bounds: Option<OutlierBounds>,
    pub kept: Vec<MetricRecord>,
    pub outliers: Vec<MetricRecord>,
}

impl OutlierSplit {
    /// Share of records removed, in percent.
    pub fn outlier_percentage(&self) -> f64 {
        let total = self.kept.len() + self.outliers.len();
        if total == 0 {
            0.0
        } else {
            self.outliers.len() as f64 / total as f64 * 100.0
        }
    }

    /// The `n` outliers with the longest cycle times, longest first.
    pub fn longest_outliers(&self, n: usize) -> Vec<&MetricRecord> {
        let mut longest: Vec<&MetricRecord> = self.outliers.iter().collect();
        longest.sort_by(|a, b| b.cycle_time_days.total_cmp(&a.cycle_time_days));
        longest.truncate(n);
        longest
    }
}

/// Outlier detection over `cycle_time_days`.
pub struct OutlierAnalyzer;

impl OutlierAnalyzer {
    /// Computes the accepted range for a method over a sample.
    pub fn bounds(values: &[f64], method: OutlierMethod) -> Option<OutlierBounds> {
        match method {
            OutlierMethod::Iqr => {
                let q1 = quantile(values, 0.25)?;
                let q3 = quantile(values, 0.75)?;
                let iqr = q3 - q1;
                Some(OutlierBounds {
                    lower: q1 - IQR_FENCE * iqr,
                    upper: q3 + IQR_FENCE * iqr,
                })
            }
            OutlierMethod::ZScore { threshold } => {
                let std = sample_std(values).filter(|s| *s > 0.0)?;
                let m = mean(values);
                Some(OutlierBounds {
                    lower: m - threshold * std,
                    upper: m + threshold * std,
                })
            }
            OutlierMethod::Percentile { lower, upper } => Some(OutlierBounds {
                lower: quantile(values, lower / 100.0)?,
                upper: quantile(values, upper / 100.0)?,
            }),
        }
    }

    /// Splits records into those inside and outside the method's bounds.
    pub fn split(records: &[MetricRecord], method: OutlierMethod) -> OutlierSplit {
        let values: Vec<f64> = records.iter().map(|r| r.cycle_time_days).collect();
        let bounds = Self::bounds(&values, method);

        let (kept, outliers) = match bounds {
            Some(b) => records
                .iter()
                .cloned()
                .partition(|r| b.contains(r.cycle_time_days)),
            None => (records.to_vec(), Vec::new()),
        };

        OutlierSplit {
            method,
            bounds,
            kept,
            outliers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, days: f64) -> MetricRecord {
        MetricRecord {
            key: key.to_string(),
            summary: String::new(),
            status: "Done".to_string(),
            created: "2024-01-01T00:00:00.000+0000".to_string(),
            resolved: None,
            assignee: None,
            priority: None,
            issue_type: Some("Story".to_string()),
            cycle_time_hours: days * 24.0,
            cycle_time_days: days,
        }
    }

    fn sample() -> Vec<MetricRecord> {
        [1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 5.0, 60.0]
            .iter()
            .enumerate()
            .map(|(i, d)| record(&format!("TAS-{}", i), *d))
            .collect()
    }

    #[test]
    fn iqr_removes_far_tail() {
        let split = OutlierAnalyzer::split(&sample(), OutlierMethod::Iqr);

        let bounds = split.bounds.unwrap();
        assert_eq!(bounds.lower, -1.0);
        assert_eq!(bounds.upper, 7.0);
        assert_eq!(split.outliers.len(), 1);
        assert_eq!(split.outliers[0].cycle_time_days, 60.0);
        assert_eq!(split.kept.len(), 8);
    }

    #[test]
    fn zscore_respects_threshold() {
        let strict = OutlierAnalyzer::split(&sample(), OutlierMethod::ZScore { threshold: 2.0 });
        assert_eq!(strict.outliers.len(), 1);

        let lenient = OutlierAnalyzer::split(&sample(), OutlierMethod::ZScore { threshold: 10.0 });
        assert!(lenient.outliers.is_empty());
    }

    #[test]
    fn zscore_with_no_spread_keeps_everything() {
        let records = vec![record("A", 2.0), record("B", 2.0)];
        let split = OutlierAnalyzer::split(&records, OutlierMethod::zscore());
        assert!(split.bounds.is_none());
        assert_eq!(split.kept.len(), 2);
    }

    #[test]
    fn percentile_trims_both_ends() {
        let records: Vec<MetricRecord> = (1..=21)
            .map(|i| record(&format!("TAS-{}", i), i as f64))
            .collect();
        let split = OutlierAnalyzer::split(&records, OutlierMethod::percentile());

        assert_eq!(split.outliers.len(), 2);
        assert_eq!(split.kept.len(), 19);
        assert!(split.outlier_percentage() > 9.0);
    }

    #[test]
    fn empty_input_splits_to_nothing() {
        let split = OutlierAnalyzer::split(&[], OutlierMethod::Iqr);
        assert!(split.bounds.is_none());
        assert!(split.kept.is_empty());
        assert_eq!(split.outlier_percentage(), 0.0);
    }

    #[test]
    fn longest_outliers_sorted_descending() {
        let split = OutlierSplit {
            method: OutlierMethod::Iqr,
            bounds: None,
            kept: Vec::new(),
            outliers: vec![record("A", 10.0), record("B", 30.0), record("C", 20.0)],
        };
        let keys: Vec<&str> = split.longest_outliers(2).iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["B", "C"]);
    }

    #[test]
    fn method_labels() {
        assert_eq!(OutlierMethod::Iqr.label(), "IQR");
        assert_eq!(OutlierMethod::zscore().to_string(), "Z-Score (threshold=3)");
    }
}
