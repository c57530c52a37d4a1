//! Metric records - the flat per-issue output contract.

use serde::{Deserialize, Serialize};

use crate::domain::issue::{CycleTimeResult, IssueSnapshot, PeriodSummary};

/// Column order for tabular exports. Consumers depend on these names.
pub const METRIC_COLUMNS: &[&str] = &[
    "key",
    "summary",
    "status",
    "created",
    "resolved",
    "assignee",
    "priority",
    "issue_type",
    "cycle_time_hours",
    "cycle_time_days",
];

/// One row of extracted metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub created: String,
    pub resolved: Option<String>,
    pub assignee: Option<String>,
    pub priority: Option<String>,
    pub issue_type: Option<String>,
    pub cycle_time_hours: f64,
    pub cycle_time_days: f64,
}

impl MetricRecord {
    /// Joins issue fields with its replay result.
    pub fn from_replay(issue: &IssueSnapshot, result: &CycleTimeResult) -> Self {
        let hours = result.total_hours();
        Self {
            key: issue.key.to_string(),
            summary: issue.summary.clone(),
            status: issue.current_status.clone(),
            created: issue.created_at.clone(),
            resolved: issue.resolved_at.clone(),
            assignee: issue.assignee.clone(),
            priority: issue.priority.clone(),
            issue_type: issue.issue_type.clone(),
            cycle_time_hours: hours,
            cycle_time_days: if hours > 0.0 { hours / 24.0 } else { 0.0 },
        }
    }
}

/// A metric record together with the periods behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueMetrics {
    #[serde(flatten)]
    pub record: MetricRecord,
    pub status_periods: Vec<PeriodSummary>,
}

impl IssueMetrics {
    pub fn from_replay(issue: &IssueSnapshot, result: &CycleTimeResult) -> Self {
        Self {
            record: MetricRecord::from_replay(issue, result),
            status_periods: result.periods.iter().map(PeriodSummary::from).collect(),
        }
    }
}

/// Headline numbers for an extraction run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionSummary {
    pub total_issues: usize,
    pub average_cycle_time_hours: f64,
    pub average_cycle_time_days: f64,
}

impl ExtractionSummary {
    /// Summarises records; averages are zero when there are none.
    pub fn from_records(records: &[MetricRecord]) -> Self {
        let total_issues = records.len();
        let average_cycle_time_hours = if total_issues == 0 {
            0.0
        } else {
            records.iter().map(|r| r.cycle_time_hours).sum::<f64>() / total_issues as f64
        };
        Self {
            total_issues,
            average_cycle_time_hours,
            average_cycle_time_days: average_cycle_time_hours / 24.0,
        }
    }
}
