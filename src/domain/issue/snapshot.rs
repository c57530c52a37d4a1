//! Issue snapshot - the read-only view of one tracker issue.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{IssueId, IssueKey};

/// Field name the tracker uses for workflow status changes.
pub const STATUS_FIELD: &str = "status";

/// A single field-level change inside a changelog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Changed field name (`"status"`, `"assignee"`, ...).
    pub field: String,
    /// Display value before the change.
    pub from_value: Option<String>,
    /// Display value after the change.
    pub to_value: Option<String>,
}

impl FieldChange {
    pub fn new(
        field: impl Into<String>,
        from_value: Option<&str>,
        to_value: Option<&str>,
    ) -> Self {
        Self {
            field: field.into(),
            from_value: from_value.map(str::to_string),
            to_value: to_value.map(str::to_string),
        }
    }

    /// Creates a status transition item.
    pub fn status(from: Option<&str>, to: Option<&str>) -> Self {
        Self::new(STATUS_FIELD, from, to)
    }

    /// Returns true if this item records a status transition.
    pub fn is_status_change(&self) -> bool {
        self.field == STATUS_FIELD
    }
}

/// One changelog history entry: a timestamp and the items changed at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    /// Raw tracker timestamp of the change.
    pub created: String,
    pub items: Vec<FieldChange>,
}

impl ChangelogEntry {
    pub fn new(created: impl Into<String>, items: Vec<FieldChange>) -> Self {
        Self {
            created: created.into(),
            items,
        }
    }
}

/// Immutable snapshot of an issue as returned by the tracker.
///
/// Timestamps are kept as the tracker reported them so exports can echo
/// the original text; the replay engine parses them when it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSnapshot {
    pub id: IssueId,
    pub key: IssueKey,
    pub summary: String,
    pub current_status: String,
    pub created_at: String,
    pub resolved_at: Option<String>,
    pub assignee: Option<String>,
    pub priority: Option<String>,
    pub issue_type: Option<String>,
    /// Changelog entries in the order the tracker emitted them.
    pub changelog: Vec<ChangelogEntry>,
}

impl IssueSnapshot {
    /// Creates a snapshot with the required fields and an empty changelog.
    pub fn new(
        id: impl Into<String>,
        key: impl Into<String>,
        current_status: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: IssueId::new(id),
            key: IssueKey::new(key),
            summary: String::new(),
            current_status: current_status.into(),
            created_at: created_at.into(),
            resolved_at: None,
            assignee: None,
            priority: None,
            issue_type: None,
            changelog: Vec::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_resolved_at(mut self, resolved_at: impl Into<String>) -> Self {
        self.resolved_at = Some(resolved_at.into());
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_issue_type(mut self, issue_type: impl Into<String>) -> Self {
        self.issue_type = Some(issue_type.into());
        self
    }

    /// Appends a changelog entry.
    pub fn with_changelog_entry(mut self, entry: ChangelogEntry) -> Self {
        self.changelog.push(entry);
        self
    }

    /// Appends a changelog entry holding a single status transition.
    pub fn with_transition(
        self,
        created: impl Into<String>,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Self {
        self.with_changelog_entry(ChangelogEntry::new(
            created,
            vec![FieldChange::status(from, to)],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_optional_fields() {
        let issue = IssueSnapshot::new("1", "TAS-1", "Done", "2024-01-01T00:00:00.000+0000")
            .with_summary("Fix login")
            .with_resolved_at("2024-01-03T00:00:00.000+0000")
            .with_assignee("Ada")
            .with_priority("High")
            .with_issue_type("Bug");

        assert_eq!(issue.key.as_str(), "TAS-1");
        assert_eq!(issue.summary, "Fix login");
        assert_eq!(issue.assignee.as_deref(), Some("Ada"));
        assert_eq!(issue.priority.as_deref(), Some("High"));
        assert_eq!(issue.issue_type.as_deref(), Some("Bug"));
        assert!(issue.resolved_at.is_some());
        assert!(issue.changelog.is_empty());
    }

    #[test]
    fn with_transition_appends_status_item() {
        let issue = IssueSnapshot::new("1", "TAS-1", "Doing", "2024-01-01T00:00:00.000+0000")
            .with_transition("2024-01-02T00:00:00.000+0000", Some("To Do"), Some("Doing"));

        assert_eq!(issue.changelog.len(), 1);
        assert!(issue.changelog[0].items[0].is_status_change());
        assert_eq!(issue.changelog[0].items[0].to_value.as_deref(), Some("Doing"));
    }

    #[test]
    fn non_status_items_are_distinguished() {
        let item = FieldChange::new("assignee", None, Some("Ada"));
        assert!(!item.is_status_change());
    }
}
