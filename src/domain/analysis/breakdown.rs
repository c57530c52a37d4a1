//! Grouped cycle time breakdowns (by issue type, by assignee).

use serde::Serialize;
use std::collections::BTreeMap;

use super::statistics::{mean, quantile, sample_std};
use crate::domain::metrics::MetricRecord;

/// Cycle time statistics for one group of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStatistics {
    pub group: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
    /// Share of all analysed records that fall in this group, in percent.
    pub share: f64,
}

/// Groups records by a field and summarises each group.
///
/// Records with no value for the field are left out of every group but
/// still count toward the share denominator.
pub struct BreakdownAnalyzer;

impl BreakdownAnalyzer {
    /// Per issue type, ordered by type name.
    pub fn by_issue_type(records: &[MetricRecord]) -> Vec<GroupStatistics> {
        Self::group_by(records, |r| r.issue_type.as_deref())
    }

    /// Top `top_n` assignees by issue count.
    pub fn by_assignee(records: &[MetricRecord], top_n: usize) -> Vec<GroupStatistics> {
        let mut groups = Self::group_by(records, |r| r.assignee.as_deref());
        groups.sort_by(|a, b| b.count.cmp(&a.count));
        groups.truncate(top_n);
        groups
    }

    fn group_by<F>(records: &[MetricRecord], key: F) -> Vec<GroupStatistics>
    where
        F: Fn(&MetricRecord) -> Option<&str>,
    {
        let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for record in records {
            if let Some(group) = key(record) {
                groups.entry(group).or_default().push(record.cycle_time_days);
            }
        }

        let total = records.len();
        groups
            .into_iter()
            .map(|(group, values)| summarise(group, &values, total))
            .collect()
    }
}

fn summarise(group: &str, values: &[f64], total: usize) -> GroupStatistics {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    GroupStatistics {
        group: group.to_string(),
        count: values.len(),
        mean: mean(values),
        median: quantile(values, 0.5).unwrap_or_default(),
        std: sample_std(values),
        min,
        max,
        share: values.len() as f64 / total as f64 * 100.0,
    }
}
