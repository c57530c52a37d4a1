//! Plain-text rendering of extraction summaries and analysis reports.

use std::fmt::Write;

use crate::domain::analysis::{AnalysisReport, GroupStatistics, MethodReport, SampleStatistics};
use crate::domain::metrics::ExtractionSummary;

const RULE: usize = 60;
const WIDE_RULE: usize = 80;

/// Renders the end-of-extraction summary.
pub fn render_extraction_summary(summary: &ExtractionSummary, statuses: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Summary:");
    let _ = writeln!(out, "Total issues: {}", summary.total_issues);
    let _ = writeln!(
        out,
        "Average cycle time: {:.1} hours ({:.1} days)",
        summary.average_cycle_time_hours, summary.average_cycle_time_days
    );
    let _ = writeln!(out, "Cycle time statuses: {}", statuses.join(", "));
    out
}

/// Renders a full analysis report.
pub fn render_analysis_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Loaded {} issues", report.record_count);

    let Some(original) = report.original.as_ref() else {
        let _ = writeln!(out, "No cycle times to analyze.");
        return out;
    };
    write_statistics(&mut out, "Original Data", original);

    for method in &report.methods {
        write_method(&mut out, method, original);
    }
    out
}

fn write_method(out: &mut String, method: &MethodReport, original: &SampleStatistics) {
    let _ = writeln!(out, "\n{}", "=".repeat(WIDE_RULE));
    let _ = writeln!(out, "ANALYZING WITH {} METHOD", method.method.label());
    let _ = writeln!(out, "{}", "=".repeat(WIDE_RULE));

    let _ = writeln!(out, "\n{} Results:", method.method);
    if let Some(bounds) = method.bounds {
        let _ = writeln!(out, "Lower bound: {:.2} days", bounds.lower);
        let _ = writeln!(out, "Upper bound: {:.2} days", bounds.upper);
    }
    let _ = writeln!(
        out,
        "Outliers removed: {} ({:.1}%)",
        method.outlier_count, method.outlier_percentage
    );

    let Some(cleaned) = method.cleaned.as_ref() else {
        let _ = writeln!(out, "No issues left after outlier removal.");
        return;
    };
    write_statistics(out, &format!("Cleaned Data ({})", method.method.label()), cleaned);

    let _ = writeln!(out, "\n--- Analysis by Issue Type ---");
    write_groups(out, &method.by_issue_type);

    let _ = writeln!(out, "\n--- Analysis by Assignee (Top {}) ---", method.by_assignee.len());
    write_groups(out, &method.by_assignee);

    if method.longest_outliers.is_empty() {
        let _ = writeln!(out, "\nNo outliers to analyze.");
    } else {
        let _ = writeln!(out, "\n--- Analysis of {} Outliers ---", method.outlier_count);
        let _ = writeln!(out, "Top {} longest cycle times (outliers):", method.longest_outliers.len());
        for record in &method.longest_outliers {
            let summary: String = record.summary.chars().take(60).collect();
            let _ = writeln!(
                out,
                "{}: {:.1} days - {} - {}",
                record.key,
                record.cycle_time_days,
                record.issue_type.as_deref().unwrap_or("-"),
                summary
            );
        }
        let _ = writeln!(out, "\nOutlier Issue Types:");
        for group in &method.outlier_issue_types {
            let _ = writeln!(
                out,
                "{}: {} issues ({:.1}%), avg: {:.1} days",
                group.group, group.count, group.share, group.mean
            );
        }
    }

    let _ = writeln!(out, "\n{}", "=".repeat(RULE));
    let _ = writeln!(out, "SUMMARY REPORT - {}", method.method.label());
    let _ = writeln!(out, "{}", "=".repeat(RULE));
    let _ = writeln!(out, "Original Data:");
    write_headline(out, original);
    let _ = writeln!(out, "\nCleaned Data (outliers removed):");
    write_headline(out, cleaned);

    if let Some(improvement) = method.improvement.as_ref() {
        let _ = writeln!(out, "\nImprovement:");
        let _ = writeln!(out, "  Mean reduced by: {:.1}%", improvement.mean_reduction_pct);
        if let Some(std) = improvement.std_reduction_pct {
            let _ = writeln!(out, "  Standard deviation reduced by: {:.1}%", std);
        }
        let _ = writeln!(out, "  Data points retained: {:.1}%", improvement.retained_pct);
        let _ = writeln!(
            out,
            "\nRecommended Team Cycle Time: {:.1} days (median)",
            improvement.recommended_cycle_time_days
        );
        let (low, high) = improvement.typical_range_days;
        let _ = writeln!(out, "Typical Range: {:.1} - {:.1} days (IQR)", low, high);
    }
}

fn write_statistics(out: &mut String, label: &str, stats: &SampleStatistics) {
    let _ = writeln!(out, "\n{} Statistics:", label);
    let _ = writeln!(out, "Count: {}", stats.count);
    let _ = writeln!(out, "Mean: {:.2} days", stats.mean);
    let _ = writeln!(out, "Median: {:.2} days", stats.median);
    let _ = writeln!(out, "Mode: {:.2} days", stats.mode);
    let _ = writeln!(out, "Standard Deviation: {} days", optional(stats.std));
    let _ = writeln!(out, "Min: {:.2} days", stats.min);
    let _ = writeln!(out, "Max: {:.2} days", stats.max);
    let _ = writeln!(out, "25th Percentile: {:.2} days", stats.q25);
    let _ = writeln!(out, "75th Percentile: {:.2} days", stats.q75);
    let _ = writeln!(out, "IQR: {:.2} days", stats.iqr);
    let _ = writeln!(out, "Skewness: {} (0=normal, >1=right-skewed)", optional(stats.skewness));
    let _ = writeln!(out, "Kurtosis: {} (0=normal distribution)", optional(stats.kurtosis));
}

fn write_headline(out: &mut String, stats: &SampleStatistics) {
    let _ = writeln!(out, "  Issues: {}", stats.count);
    let _ = writeln!(out, "  Mean cycle time: {:.1} days", stats.mean);
    let _ = writeln!(out, "  Median cycle time: {:.1} days", stats.median);
    let _ = writeln!(out, "  Standard deviation: {} days", optional(stats.std));
}

fn write_groups(out: &mut String, groups: &[GroupStatistics]) {
    let _ = writeln!(
        out,
        "{:<24} {:>6} {:>8} {:>8} {:>8} {:>8} {:>8} {:>7}",
        "group", "count", "mean", "median", "std", "min", "max", "share"
    );
    for g in groups {
        let _ = writeln!(
            out,
            "{:<24} {:>6} {:>8.2} {:>8.2} {:>8} {:>8.2} {:>8.2} {:>6.1}%",
            g.group,
            g.count,
            g.mean,
            g.median,
            optional(g.std),
            g.min,
            g.max,
            g.share
        );
    }
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}
