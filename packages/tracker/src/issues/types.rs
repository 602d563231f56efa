// ABOUTME: Issue domain types: workflow enums, the wire shape with embedded
// ABOUTME: users, request DTOs, and the fixed list of history-tracked fields

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::users::UserSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Task,
    Bug,
    Story,
    Epic,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Task => "task",
            IssueType::Bug => "bug",
            IssueType::Story => "story",
            IssueType::Epic => "epic",
        }
    }
}

/// Workflow states. Any state may move to any other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum IssueStatus {
    Backlog,
    Todo,
    InProgress,
    InReview,
    Done,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Backlog => "backlog",
            IssueStatus::Todo => "todo",
            IssueStatus::InProgress => "in-progress",
            IssueStatus::InReview => "in-review",
            IssueStatus::Done => "done",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IssuePriority {
    Lowest,
    Low,
    Medium,
    High,
    Highest,
}

impl IssuePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssuePriority::Lowest => "lowest",
            IssuePriority::Low => "low",
            IssuePriority::Medium => "medium",
            IssuePriority::High => "high",
            IssuePriority::Highest => "highest",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub key: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub project_id: String,
    pub assignee_id: Option<String>,
    pub reporter_id: String,
    pub epic_id: Option<String>,
    pub sprint_id: Option<String>,
    pub assignee: Option<UserSummary>,
    pub reporter: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub issue_type: Option<IssueType>,
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    pub assignee_id: Option<String>,
    pub reporter_id: Option<String>,
    pub epic_id: Option<String>,
}

/// Partial update. `Some(None)` on a clearable field means "set NULL",
/// `None` means "leave alone". Unrecognized keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub issue_type: Option<IssueType>,
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub epic_id: Option<Option<String>>,
}

impl UpdateIssueRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.issue_type.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee_id.is_none()
            && self.epic_id.is_none()
    }

    /// Empty strings on clearable fields are treated as NULL.
    pub fn normalized(mut self) -> Self {
        if matches!(&self.assignee_id, Some(Some(id)) if id.is_empty()) {
            self.assignee_id = Some(None);
        }
        if matches!(&self.epic_id, Some(Some(id)) if id.is_empty()) {
            self.epic_id = Some(None);
        }
        self
    }
}

/// Distinguishes an explicit JSON `null` from an absent key.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// The fields whose changes land in the audit trail, in recording order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedField {
    Title,
    Description,
    Type,
    Status,
    Priority,
    Assignee,
}

impl TrackedField {
    pub const ALL: [TrackedField; 6] = [
        TrackedField::Title,
        TrackedField::Description,
        TrackedField::Type,
        TrackedField::Status,
        TrackedField::Priority,
        TrackedField::Assignee,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TrackedField::Title => "Title",
            TrackedField::Description => "Description",
            TrackedField::Type => "Type",
            TrackedField::Status => "Status",
            TrackedField::Priority => "Priority",
            TrackedField::Assignee => "Assignee",
        }
    }

    /// Human readable value of this field on `issue`. Assignee resolves to the
    /// user's display name, never the raw id.
    pub fn display_value(&self, issue: &Issue) -> String {
        match self {
            TrackedField::Title => issue.title.clone(),
            TrackedField::Description => issue.description.clone(),
            TrackedField::Type => issue.issue_type.as_str().to_string(),
            TrackedField::Status => issue.status.as_str().to_string(),
            TrackedField::Priority => issue.priority.as_str().to_string(),
            TrackedField::Assignee => issue
                .assignee
                .as_ref()
                .map(|user| user.name.clone())
                .unwrap_or_else(|| "Unassigned".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(IssueStatus::InProgress).unwrap(),
            json!("in-progress")
        );
        assert_eq!(
            serde_json::from_value::<IssueStatus>(json!("in-review")).unwrap(),
            IssueStatus::InReview
        );
    }

    #[test]
    fn absent_and_null_assignee_are_distinct() {
        let absent: UpdateIssueRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(absent.assignee_id, None);

        let cleared: UpdateIssueRequest =
            serde_json::from_value(json!({ "assigneeId": null })).unwrap();
        assert_eq!(cleared.assignee_id, Some(None));

        let set: UpdateIssueRequest =
            serde_json::from_value(json!({ "assigneeId": "user-1" })).unwrap();
        assert_eq!(set.assignee_id, Some(Some("user-1".to_string())));
    }

    #[test]
    fn empty_string_assignee_normalizes_to_null() {
        let request: UpdateIssueRequest =
            serde_json::from_value(json!({ "assigneeId": "" })).unwrap();
        assert_eq!(request.normalized().assignee_id, Some(None));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let request: UpdateIssueRequest =
            serde_json::from_value(json!({ "title": "New", "bogus": 42 })).unwrap();
        assert_eq!(request.title.as_deref(), Some("New"));
        assert!(!request.is_empty());
    }
}
