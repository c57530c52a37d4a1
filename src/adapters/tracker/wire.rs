//! Tracker REST payloads and endpoint URLs.
//!
//! Only the fields the extractor reads are modelled; everything else in the
//! response is ignored.

use serde::Deserialize;

use crate::domain::foundation::{IssueId, IssueKey};
use crate::domain::issue::{ChangelogEntry, FieldChange, IssueSnapshot};
use crate::ports::FetchError;

/// Fields requested for every issue.
pub const ISSUE_FIELDS: &str = "key,summary,status,created,resolutiondate,assignee,priority,issuetype";

/// Expansion that makes the tracker include the changelog.
pub const CHANGELOG_EXPAND: &str = "changelog";

/// REST endpoint URLs under one tracker base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerEndpoints {
    base_url: String,
}

impl TrackerEndpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token-paginated search.
    pub fn search_jql(&self) -> String {
        format!("{}/rest/api/3/search/jql", self.base_url)
    }

    /// Offset-paginated search.
    pub fn search(&self) -> String {
        format!("{}/rest/api/3/search", self.base_url)
    }

    /// Single issue detail.
    pub fn issue(&self, id: &str) -> String {
        format!("{}/rest/api/3/issue/{}", self.base_url, id)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireIssue {
    pub id: String,
    pub key: String,
    pub fields: WireFields,
    #[serde(default)]
    pub changelog: Option<WireChangelog>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireFields {
    #[serde(default)]
    pub summary: Option<String>,
    pub status: WireNamed,
    pub created: String,
    #[serde(default)]
    pub resolutiondate: Option<String>,
    #[serde(default)]
    pub assignee: Option<WireUser>,
    #[serde(default)]
    pub priority: Option<WireNamed>,
    #[serde(default)]
    pub issuetype: Option<WireNamed>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireNamed {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireUser {
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireChangelog {
    #[serde(default)]
    pub histories: Vec<WireHistory>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireHistory {
    pub created: String,
    #[serde(default)]
    pub items: Vec<WireItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireItem {
    pub field: String,
    #[serde(rename = "fromString", default)]
    pub from_value: Option<String>,
    #[serde(rename = "toString", default)]
    pub to_value: Option<String>,
}

impl From<WireIssue> for IssueSnapshot {
    fn from(wire: WireIssue) -> Self {
        let WireIssue {
            id,
            key,
            fields,
            changelog,
        } = wire;

        let changelog = changelog
            .unwrap_or_default()
            .histories
            .into_iter()
            .map(|history| {
                let items = history
                    .items
                    .into_iter()
                    .map(|item| FieldChange {
                        field: item.field,
                        from_value: item.from_value,
                        to_value: item.to_value,
                    })
                    .collect();
                ChangelogEntry::new(history.created, items)
            })
            .collect();

        IssueSnapshot {
            id: IssueId::new(id),
            key: IssueKey::new(key),
            summary: fields.summary.unwrap_or_default(),
            current_status: fields.status.name,
            created_at: fields.created,
            resolved_at: fields.resolutiondate,
            assignee: fields.assignee.and_then(|a| a.display_name),
            priority: fields.priority.map(|p| p.name),
            issue_type: fields.issuetype.map(|t| t.name),
            changelog,
        }
    }
}

/// A page from the token-paginated search: lightweight issue references.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenPage {
    #[serde(default)]
    pub issues: Vec<IssueRef>,
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
    #[serde(rename = "isLast", default)]
    pub is_last: Option<bool>,
}

impl TokenPage {
    /// The tracker omits `isLast` on the final page; treat absence as last.
    pub fn is_final(&self) -> bool {
        self.is_last.unwrap_or(true) || self.next_page_token.as_deref().map_or(true, str::is_empty)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssueRef {
    pub id: String,
}

/// A page from the offset-paginated search: full issues with changelogs.
#[derive(Debug, Deserialize)]
pub(crate) struct OffsetPage {
    #[serde(default)]
    pub issues: Vec<WireIssue>,
    #[serde(default)]
    pub total: usize,
}

/// Decodes a JSON value into a wire type, mapping failures to `FetchError::Parse`.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
    what: &str,
) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|e| FetchError::parse(format!("{}: {}", what, e)))
}
