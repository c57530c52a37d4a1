//! Query configuration and presets

use chrono::Datelike;
use serde::Deserialize;
use std::fmt;

/// Named queries for common reporting windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum QueryPreset {
    /// Resolved in the last 30 days
    Recent,
    /// Issues in open sprints
    Sprint,
    /// Resolved since January 1st of the current year
    Year,
    /// Stories resolved in the last 30 days
    Stories,
}

impl QueryPreset {
    /// Builds the query for a project; `year` is used by `Year` only.
    pub fn jql(&self, project: &str, year: i32) -> String {
        match self {
            QueryPreset::Recent => format!("project = {} AND resolved >= -30d", project),
            QueryPreset::Sprint => format!("project = {} AND sprint in openSprints()", project),
            QueryPreset::Year => {
                format!("project = {} AND resolved >= \"{}-01-01\"", project, year)
            }
            QueryPreset::Stories => format!(
                "project = {} AND issuetype = Story AND resolved >= -30d",
                project
            ),
        }
    }
}

impl fmt::Display for QueryPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryPreset::Recent => "recent",
            QueryPreset::Sprint => "sprint",
            QueryPreset::Year => "year",
            QueryPreset::Stories => "stories",
        };
        write!(f, "{}", name)
    }
}

/// Default query settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryConfig {
    /// Project key used by presets
    #[serde(default = "default_project")]
    pub project: String,

    /// Query used when none is given on the command line
    #[serde(default)]
    pub jql: Option<String>,
}

impl QueryConfig {
    /// Picks the query to run: an explicit query, then a preset, then the
    /// configured query, then the `recent` preset.
    pub fn resolve_jql(&self, explicit: Option<&str>, preset: Option<QueryPreset>) -> String {
        self.resolve_jql_for_year(explicit, preset, chrono::Utc::now().year())
    }

    fn resolve_jql_for_year(
        &self,
        explicit: Option<&str>,
        preset: Option<QueryPreset>,
        year: i32,
    ) -> String {
        if let Some(jql) = explicit.map(str::trim).filter(|q| !q.is_empty()) {
            return jql.to_string();
        }
        if let Some(preset) = preset {
            return preset.jql(&self.project, year);
        }
        match self.jql.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(jql) => jql.to_string(),
            None => QueryPreset::Recent.jql(&self.project, year),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            project: default_project(),
            jql: None,
        }
    }
}

fn default_project() -> String {
    "TAS".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_queries() {
        assert_eq!(
            QueryPreset::Recent.jql("TAS", 2025),
            "project = TAS AND resolved >= -30d"
        );
        assert_eq!(
            QueryPreset::Sprint.jql("OPS", 2025),
            "project = OPS AND sprint in openSprints()"
        );
        assert_eq!(
            QueryPreset::Year.jql("TAS", 2025),
            "project = TAS AND resolved >= \"2025-01-01\""
        );
        assert_eq!(
            QueryPreset::Stories.jql("TAS", 2025),
            "project = TAS AND issuetype = Story AND resolved >= -30d"
        );
    }

    #[test]
    fn test_explicit_query_wins() {
        let config = QueryConfig {
            project: "TAS".to_string(),
            jql: Some("project = CONFIG".to_string()),
        };
        assert_eq!(
            config.resolve_jql_for_year(Some("key = TAS-1"), Some(QueryPreset::Sprint), 2025),
            "key = TAS-1"
        );
        assert_eq!(
            config.resolve_jql_for_year(None, Some(QueryPreset::Sprint), 2025),
            "project = TAS AND sprint in openSprints()"
        );
        assert_eq!(
            config.resolve_jql_for_year(None, None, 2025),
            "project = CONFIG"
        );
    }

    #[test]
    fn test_default_is_recent_preset() {
        let config = QueryConfig::default();
        assert_eq!(
            config.resolve_jql_for_year(Some("  "), None, 2025),
            "project = TAS AND resolved >= -30d"
        );
    }
}
