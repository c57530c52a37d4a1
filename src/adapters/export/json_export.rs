//! JSON export of detailed per-issue metrics.

use std::path::{Path, PathBuf};

use super::atomic::write_atomic;
use crate::ports::ExportError;
use crate::domain::metrics::IssueMetrics;

/// JSON path next to a CSV path: `.csv` becomes `.json`, anything else
/// gets `.json` appended.
pub fn json_path_for(csv_path: &Path) -> PathBuf {
    match csv_path.extension() {
        Some(ext) if ext == "csv" => csv_path.with_extension("json"),
        _ => {
            let mut name = csv_path.as_os_str().to_owned();
            name.push(".json");
            PathBuf::from(name)
        }
    }
}

/// Writes metrics, including status periods, as pretty-printed JSON.
pub async fn export_json(path: &Path, metrics: &[IssueMetrics]) -> Result<(), ExportError> {
    let json = serde_json::to_vec_pretty(metrics)?;
    write_atomic(path, &json).await?;
    tracing::info!("Exported detailed data to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::issue::PeriodSummary;
    use crate::domain::metrics::MetricRecord;
    use tempfile::TempDir;

    #[test]
    fn json_path_replaces_csv_extension() {
        assert_eq!(
            json_path_for(Path::new("out/metrics.csv")),
            PathBuf::from("out/metrics.json")
        );
        assert_eq!(
            json_path_for(Path::new("metrics.txt")),
            PathBuf::from("metrics.txt.json")
        );
        assert_eq!(json_path_for(Path::new("metrics")), PathBuf::from("metrics.json"));
    }

    #[tokio::test]
    async fn writes_periods() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metrics.json");
        let metrics = vec![IssueMetrics {
            record: MetricRecord {
                key: "TAS-1".to_string(),
                summary: "Login".to_string(),
                status: "Done".to_string(),
                created: "2024-01-01T00:00:00.000+0000".to_string(),
                resolved: None,
                assignee: None,
                priority: Some("High".to_string()),
                issue_type: None,
                cycle_time_hours: 2.0,
                cycle_time_days: 2.0 / 24.0,
            },
            status_periods: vec![PeriodSummary {
                status: "Doing".to_string(),
                start: "2024-01-02T00:00:00+00:00".to_string(),
                end: "2024-01-02T02:00:00+00:00".to_string(),
                duration_hours: 2.0,
            }],
        }];

        export_json(&path, &metrics).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["key"], "TAS-1");
        assert_eq!(value[0]["priority"], "High");
        assert_eq!(value[0]["resolved"], serde_json::Value::Null);
        assert_eq!(value[0]["status_periods"][0]["status"], "Doing");
    }
}
