// ABOUTME: Issue storage and the update pipeline: targeted field writes,
// ABOUTME: display-value diffing, audit rows, and assignment notifications

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, error};
use uuid::Uuid;

use crate::issues::bulk::delete_issues_tx;
use crate::issues::history::HistoryStorage;
use crate::issues::types::{
    CreateIssueRequest, Issue, IssuePriority, IssueStatus, IssueType, TrackedField,
    UpdateIssueRequest,
};
use crate::notifications::NotificationStorage;
use crate::storage::{StorageError, StorageResult};
use crate::users::UserSummary;

const ISSUE_COLUMNS: &str = "\
    i.id, i.key, i.title, i.description, i.type, i.status, i.priority, \
    i.project_id, i.assignee_id, i.reporter_id, i.epic_id, i.sprint_id, \
    i.created_at, i.updated_at, \
    a.id AS assignee_user_id, a.name AS assignee_name, \
    a.email AS assignee_email, a.avatar AS assignee_avatar, \
    r.id AS reporter_user_id, r.name AS reporter_name, \
    r.email AS reporter_email, r.avatar AS reporter_avatar";

const ISSUE_JOINS: &str = "\
    FROM issues i \
    LEFT JOIN users a ON a.id = i.assignee_id \
    LEFT JOIN users r ON r.id = i.reporter_id";

pub struct IssueStorage {
    pool: SqlitePool,
    history: HistoryStorage,
    notifications: NotificationStorage,
}

impl IssueStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            history: HistoryStorage::new(pool.clone()),
            notifications: NotificationStorage::new(pool.clone()),
            pool,
        }
    }

    pub async fn get_issue(&self, issue_id: &str) -> StorageResult<Issue> {
        let query = format!("SELECT {ISSUE_COLUMNS} {ISSUE_JOINS} WHERE i.id = ?");
        let row = sqlx::query(&query)
            .bind(issue_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => row_to_issue(&row),
            None => Err(StorageError::not_found("Issue")),
        }
    }

    pub async fn list_for_project(&self, project_id: &str) -> StorageResult<Vec<Issue>> {
        let query =
            format!("SELECT {ISSUE_COLUMNS} {ISSUE_JOINS} WHERE i.project_id = ? ORDER BY i.created_at DESC");
        let rows = sqlx::query(&query)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_issue).collect()
    }

    pub async fn list_for_sprint(&self, sprint_id: &str) -> StorageResult<Vec<Issue>> {
        let query =
            format!("SELECT {ISSUE_COLUMNS} {ISSUE_JOINS} WHERE i.sprint_id = ? ORDER BY i.created_at DESC");
        let rows = sqlx::query(&query)
            .bind(sprint_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_issue).collect()
    }

    pub async fn search_issues(&self, term: &str) -> StorageResult<Vec<Issue>> {
        let pattern = format!("%{term}%");
        let query = format!(
            "SELECT {ISSUE_COLUMNS} {ISSUE_JOINS} \
             WHERE i.title LIKE ? OR i.description LIKE ? OR i.key LIKE ? \
             ORDER BY i.updated_at DESC LIMIT 20"
        );
        let rows = sqlx::query(&query)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_issue).collect()
    }

    /// Creates an issue under a project. The key is allocated from the
    /// project's counter inside the same transaction, so concurrent creates
    /// never share a key.
    pub async fn create_issue(
        &self,
        project_id: &str,
        request: CreateIssueRequest,
    ) -> StorageResult<Issue> {
        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| StorageError::Validation("Title is required".to_string()))?
            .to_string();
        let reporter_id = request
            .reporter_id
            .as_deref()
            .filter(|r| !r.is_empty())
            .ok_or_else(|| StorageError::Validation("Reporter is required".to_string()))?
            .to_string();

        let assignee_id = request.assignee_id.filter(|a| !a.is_empty());
        let epic_id = request.epic_id.filter(|e| !e.is_empty());

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let bumped = sqlx::query("UPDATE projects SET issue_counter = issue_counter + 1 WHERE id = ?")
            .bind(project_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        if bumped.rows_affected() == 0 {
            return Err(StorageError::not_found("Project"));
        }

        let row = sqlx::query("SELECT key, issue_counter FROM projects WHERE id = ?")
            .bind(project_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        let project_key: String = row.try_get("key")?;
        let counter: i64 = row.try_get("issue_counter")?;
        let key = format!("{project_key}-{counter}");

        sqlx::query(
            r#"
            INSERT INTO issues
                (id, key, title, description, type, status, priority,
                 project_id, assignee_id, reporter_id, epic_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&key)
        .bind(&title)
        .bind(request.description.unwrap_or_default())
        .bind(request.issue_type.unwrap_or(IssueType::Task))
        .bind(request.status.unwrap_or(IssueStatus::Todo))
        .bind(request.priority.unwrap_or(IssuePriority::Medium))
        .bind(project_id)
        .bind(&assignee_id)
        .bind(&reporter_id)
        .bind(&epic_id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        debug!("Created issue {} ({})", id, key);
        self.get_issue(&id).await
    }

    /// Applies a partial update. Each present field gets its own targeted
    /// UPDATE, every observed change lands in the audit trail with display
    /// values, and all of it commits atomically. A change of assignee
    /// notifies the new assignee after commit.
    pub async fn apply_update(
        &self,
        issue_id: &str,
        updates: UpdateIssueRequest,
        actor: &UserSummary,
    ) -> StorageResult<Issue> {
        let updates = updates.normalized();
        let before = self.get_issue(issue_id).await?;

        if updates.is_empty() {
            return Ok(before);
        }

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        if let Some(title) = &updates.title {
            sqlx::query("UPDATE issues SET title = ? WHERE id = ?")
                .bind(title)
                .bind(issue_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }
        if let Some(description) = &updates.description {
            sqlx::query("UPDATE issues SET description = ? WHERE id = ?")
                .bind(description)
                .bind(issue_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }
        if let Some(issue_type) = updates.issue_type {
            sqlx::query("UPDATE issues SET type = ? WHERE id = ?")
                .bind(issue_type)
                .bind(issue_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }
        if let Some(status) = updates.status {
            sqlx::query("UPDATE issues SET status = ? WHERE id = ?")
                .bind(status)
                .bind(issue_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }
        if let Some(priority) = updates.priority {
            sqlx::query("UPDATE issues SET priority = ? WHERE id = ?")
                .bind(priority)
                .bind(issue_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }
        if let Some(assignee_id) = &updates.assignee_id {
            sqlx::query("UPDATE issues SET assignee_id = ? WHERE id = ?")
                .bind(assignee_id.as_deref())
                .bind(issue_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }
        if let Some(epic_id) = &updates.epic_id {
            sqlx::query("UPDATE issues SET epic_id = ? WHERE id = ?")
                .bind(epic_id.as_deref())
                .bind(issue_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        sqlx::query("UPDATE issues SET updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(issue_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        // New assignee display name, resolved before diffing so the audit
        // trail records names rather than ids.
        let new_assignee_name = match &updates.assignee_id {
            None => TrackedField::Assignee.display_value(&before),
            Some(None) => "Unassigned".to_string(),
            Some(Some(user_id)) => {
                let row = sqlx::query("SELECT name FROM users WHERE id = ?")
                    .bind(user_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(StorageError::Sqlx)?;
                match row {
                    Some(row) => row.try_get("name")?,
                    None => user_id.clone(),
                }
            }
        };

        for field in TrackedField::ALL {
            let old_value = field.display_value(&before);
            let new_value = match field {
                TrackedField::Title => updates
                    .title
                    .clone()
                    .unwrap_or_else(|| before.title.clone()),
                TrackedField::Description => updates
                    .description
                    .clone()
                    .unwrap_or_else(|| before.description.clone()),
                TrackedField::Type => updates
                    .issue_type
                    .unwrap_or(before.issue_type)
                    .as_str()
                    .to_string(),
                TrackedField::Status => updates
                    .status
                    .unwrap_or(before.status)
                    .as_str()
                    .to_string(),
                TrackedField::Priority => updates
                    .priority
                    .unwrap_or(before.priority)
                    .as_str()
                    .to_string(),
                TrackedField::Assignee => new_assignee_name.clone(),
            };

            if old_value != new_value {
                self.history
                    .record_tx(&mut tx, issue_id, &actor.id, field.label(), &old_value, &new_value)
                    .await?;
            }
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        let after = self.get_issue(issue_id).await?;

        if let Some(new_assignee) = &updates.assignee_id {
            let changed = before.assignee_id.as_deref() != new_assignee.as_deref();
            if changed {
                if let Some(assignee_id) = new_assignee.as_deref() {
                    let title = format!("{} assigned {} to you", actor.name, after.key);
                    let link = format!("/projects/{}/issues/{}", after.project_id, after.id);
                    if let Err(e) = self
                        .notifications
                        .notify(
                            &[assignee_id.to_string()],
                            &actor.id,
                            "issue_assigned",
                            &title,
                            Some(&after.title),
                            Some(&link),
                        )
                        .await
                    {
                        error!("Failed to dispatch assignment notification: {}", e);
                    }
                }
            }
        }

        Ok(after)
    }

    /// Deletes one issue and every dependent row.
    pub async fn delete_issue(&self, issue_id: &str) -> StorageResult<()> {
        self.get_issue(issue_id).await?;

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;
        delete_issues_tx(&mut tx, &[issue_id.to_string()]).await?;
        tx.commit().await.map_err(StorageError::Sqlx)?;

        debug!("Deleted issue {}", issue_id);
        Ok(())
    }
}

pub(crate) fn row_to_issue(row: &SqliteRow) -> StorageResult<Issue> {
    let assignee = match row.try_get::<Option<String>, _>("assignee_user_id")? {
        Some(id) => Some(UserSummary {
            id,
            name: row.try_get("assignee_name")?,
            email: row.try_get("assignee_email")?,
            avatar: row.try_get("assignee_avatar")?,
        }),
        None => None,
    };
    let reporter = match row.try_get::<Option<String>, _>("reporter_user_id")? {
        Some(id) => Some(UserSummary {
            id,
            name: row.try_get("reporter_name")?,
            email: row.try_get("reporter_email")?,
            avatar: row.try_get("reporter_avatar")?,
        }),
        None => None,
    };

    Ok(Issue {
        id: row.try_get("id")?,
        key: row.try_get("key")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        issue_type: row.try_get("type")?,
        status: row.try_get("status")?,
        priority: row.try_get("priority")?,
        project_id: row.try_get("project_id")?,
        assignee_id: row.try_get("assignee_id")?,
        reporter_id: row.try_get("reporter_id")?,
        epic_id: row.try_get("epic_id")?,
        sprint_id: row.try_get("sprint_id")?,
        assignee,
        reporter,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{memory_pool, seed_project, seed_user};
    use pretty_assertions::assert_eq;

    async fn setup() -> (SqlitePool, IssueStorage, String, UserSummary) {
        let pool = memory_pool().await;
        let user_id = seed_user(&pool, "Rosa Diaz", "rosa@example.com").await;
        let project_id = seed_project(&pool, "Apollo", "APO").await;
        let storage = IssueStorage::new(pool.clone());
        let actor = UserSummary {
            id: user_id,
            name: "Rosa Diaz".to_string(),
            email: "rosa@example.com".to_string(),
            avatar: None,
        };
        (pool, storage, project_id, actor)
    }

    fn new_issue(title: &str, reporter_id: &str) -> CreateIssueRequest {
        CreateIssueRequest {
            title: Some(title.to_string()),
            reporter_id: Some(reporter_id.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn keys_are_allocated_sequentially() {
        let (_pool, storage, project_id, actor) = setup().await;

        let first = storage
            .create_issue(&project_id, new_issue("First", &actor.id))
            .await
            .unwrap();
        let second = storage
            .create_issue(&project_id, new_issue("Second", &actor.id))
            .await
            .unwrap();

        assert_eq!(first.key, "APO-1");
        assert_eq!(second.key, "APO-2");
        assert_eq!(first.status, IssueStatus::Todo);
        assert_eq!(first.priority, IssuePriority::Medium);
        assert_eq!(first.reporter.as_ref().unwrap().name, "Rosa Diaz");
    }

    #[tokio::test]
    async fn create_requires_title_and_reporter() {
        let (_pool, storage, project_id, actor) = setup().await;

        let err = storage
            .create_issue(&project_id, CreateIssueRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Title is required");

        let err = storage
            .create_issue(
                &project_id,
                CreateIssueRequest {
                    title: Some("  ".to_string()),
                    reporter_id: Some(actor.id.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Title is required");

        let err = storage
            .create_issue(
                &project_id,
                CreateIssueRequest {
                    title: Some("Valid".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Reporter is required");
    }

    #[tokio::test]
    async fn create_under_missing_project_is_not_found() {
        let (_pool, storage, _project_id, actor) = setup().await;
        let err = storage
            .create_issue("ghost", new_issue("Lost", &actor.id))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Project not found");
    }

    #[tokio::test]
    async fn changed_fields_land_in_history_with_display_values() {
        let (pool, storage, project_id, actor) = setup().await;
        let issue = storage
            .create_issue(&project_id, new_issue("Broken login", &actor.id))
            .await
            .unwrap();

        let updates = UpdateIssueRequest {
            status: Some(IssueStatus::InProgress),
            priority: Some(IssuePriority::High),
            ..Default::default()
        };
        let updated = storage.apply_update(&issue.id, updates, &actor).await.unwrap();
        assert_eq!(updated.status, IssueStatus::InProgress);
        assert_eq!(updated.priority, IssuePriority::High);

        let history = HistoryStorage::new(pool);
        let entries = history.list_for_issue(&issue.id).await.unwrap();
        assert_eq!(entries.len(), 2);

        let status_entry = entries.iter().find(|e| e.field == "Status").unwrap();
        assert_eq!(status_entry.old_value.as_deref(), Some("todo"));
        assert_eq!(status_entry.new_value.as_deref(), Some("in-progress"));

        let priority_entry = entries.iter().find(|e| e.field == "Priority").unwrap();
        assert_eq!(priority_entry.old_value.as_deref(), Some("medium"));
        assert_eq!(priority_entry.new_value.as_deref(), Some("high"));
    }

    #[tokio::test]
    async fn unchanged_values_produce_no_history() {
        let (pool, storage, project_id, actor) = setup().await;
        let issue = storage
            .create_issue(&project_id, new_issue("Broken login", &actor.id))
            .await
            .unwrap();

        let updates = UpdateIssueRequest {
            status: Some(IssueStatus::Todo),
            ..Default::default()
        };
        storage.apply_update(&issue.id, updates, &actor).await.unwrap();

        let history = HistoryStorage::new(pool);
        assert!(history.list_for_issue(&issue.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_update_is_a_no_op() {
        let (_pool, storage, project_id, actor) = setup().await;
        let issue = storage
            .create_issue(&project_id, new_issue("Broken login", &actor.id))
            .await
            .unwrap();

        let result = storage
            .apply_update(&issue.id, UpdateIssueRequest::default(), &actor)
            .await
            .unwrap();
        assert_eq!(result.updated_at, issue.updated_at);
        assert_eq!(result.title, issue.title);
    }

    #[tokio::test]
    async fn assignment_records_names_and_notifies() {
        let (pool, storage, project_id, actor) = setup().await;
        let assignee_id = seed_user(&pool, "Terry Jeffords", "terry@example.com").await;
        let issue = storage
            .create_issue(&project_id, new_issue("Broken login", &actor.id))
            .await
            .unwrap();

        let updates = UpdateIssueRequest {
            assignee_id: Some(Some(assignee_id.clone())),
            ..Default::default()
        };
        let updated = storage.apply_update(&issue.id, updates, &actor).await.unwrap();
        assert_eq!(updated.assignee.as_ref().unwrap().name, "Terry Jeffords");

        let history = HistoryStorage::new(pool.clone());
        let entries = history.list_for_issue(&issue.id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].field, "Assignee");
        assert_eq!(entries[0].old_value.as_deref(), Some("Unassigned"));
        assert_eq!(entries[0].new_value.as_deref(), Some("Terry Jeffords"));

        let notifications = NotificationStorage::new(pool);
        let inbox = notifications.list_for_user(&assignee_id, true).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, "issue_assigned");
        assert_eq!(inbox[0].title, format!("Rosa Diaz assigned {} to you", issue.key));
    }

    #[tokio::test]
    async fn self_assignment_does_not_notify() {
        let (pool, storage, project_id, actor) = setup().await;
        let issue = storage
            .create_issue(&project_id, new_issue("Broken login", &actor.id))
            .await
            .unwrap();

        let updates = UpdateIssueRequest {
            assignee_id: Some(Some(actor.id.clone())),
            ..Default::default()
        };
        storage.apply_update(&issue.id, updates, &actor).await.unwrap();

        let notifications = NotificationStorage::new(pool);
        assert!(notifications
            .list_for_user(&actor.id, false)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn clearing_assignee_reads_unassigned() {
        let (pool, storage, project_id, actor) = setup().await;
        let assignee_id = seed_user(&pool, "Terry Jeffords", "terry@example.com").await;
        let issue = storage
            .create_issue(&project_id, new_issue("Broken login", &actor.id))
            .await
            .unwrap();

        storage
            .apply_update(
                &issue.id,
                UpdateIssueRequest {
                    assignee_id: Some(Some(assignee_id)),
                    ..Default::default()
                },
                &actor,
            )
            .await
            .unwrap();
        let cleared = storage
            .apply_update(
                &issue.id,
                UpdateIssueRequest {
                    assignee_id: Some(None),
                    ..Default::default()
                },
                &actor,
            )
            .await
            .unwrap();
        assert!(cleared.assignee.is_none());

        let history = HistoryStorage::new(pool);
        let entries = history.list_for_issue(&issue.id).await.unwrap();
        let clear_entry = entries
            .iter()
            .find(|e| e.new_value.as_deref() == Some("Unassigned"))
            .unwrap();
        assert_eq!(clear_entry.old_value.as_deref(), Some("Terry Jeffords"));
    }

    #[tokio::test]
    async fn update_of_missing_issue_is_not_found() {
        let (_pool, storage, _project_id, actor) = setup().await;
        let err = storage
            .apply_update("ghost", UpdateIssueRequest::default(), &actor)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Issue not found");
    }

    #[tokio::test]
    async fn delete_cascades_dependents() {
        let (pool, storage, project_id, actor) = setup().await;
        let issue = storage
            .create_issue(&project_id, new_issue("Doomed", &actor.id))
            .await
            .unwrap();

        storage
            .apply_update(
                &issue.id,
                UpdateIssueRequest {
                    status: Some(IssueStatus::Done),
                    ..Default::default()
                },
                &actor,
            )
            .await
            .unwrap();
        sqlx::query("INSERT INTO comments (id, issue_id, user_id, content) VALUES (?, ?, ?, ?)")
            .bind("c1")
            .bind(&issue.id)
            .bind(&actor.id)
            .bind("note")
            .execute(&pool)
            .await
            .unwrap();

        storage.delete_issue(&issue.id).await.unwrap();

        let err = storage.get_issue(&issue.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Issue not found");

        let comments: i64 = sqlx::query("SELECT COUNT(*) AS n FROM comments")
            .fetch_one(&pool)
            .await
            .map(|r| r.get("n"))
            .unwrap();
        let history: i64 = sqlx::query("SELECT COUNT(*) AS n FROM issue_history")
            .fetch_one(&pool)
            .await
            .map(|r| r.get("n"))
            .unwrap();
        assert_eq!(comments, 0);
        assert_eq!(history, 0);
    }

    #[tokio::test]
    async fn deleting_an_epic_detaches_its_children() {
        let (_pool, storage, project_id, actor) = setup().await;
        let epic = storage
            .create_issue(&project_id, new_issue("Epic", &actor.id))
            .await
            .unwrap();
        let mut child_request = new_issue("Child", &actor.id);
        child_request.epic_id = Some(epic.id.clone());
        let child = storage
            .create_issue(&project_id, child_request)
            .await
            .unwrap();
        assert_eq!(child.epic_id.as_deref(), Some(epic.id.as_str()));

        storage.delete_issue(&epic.id).await.unwrap();

        let child = storage.get_issue(&child.id).await.unwrap();
        assert_eq!(child.epic_id, None);
    }

    #[tokio::test]
    async fn search_matches_title_description_and_key() {
        let (_pool, storage, project_id, actor) = setup().await;
        storage
            .create_issue(&project_id, new_issue("Login times out", &actor.id))
            .await
            .unwrap();
        let mut with_description = new_issue("Other", &actor.id);
        with_description.description = Some("crash during login flow".to_string());
        storage
            .create_issue(&project_id, with_description)
            .await
            .unwrap();

        let hits = storage.search_issues("login").await.unwrap();
        assert_eq!(hits.len(), 2);

        let by_key = storage.search_issues("APO-1").await.unwrap();
        assert_eq!(by_key.len(), 1);
        assert_eq!(by_key[0].key, "APO-1");
    }
}
