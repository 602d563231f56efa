// ABOUTME: Bulk issue mutations: allow-listed field updates over an id set
// ABOUTME: and multi-delete with dependents removed in a fixed order

use chrono::Utc;
use serde::Deserialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::issues::types::{double_option, IssuePriority, IssueStatus, IssueType};
use crate::storage::{StorageError, StorageResult};

/// Fields a bulk update may touch. Anything else in the payload is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdates {
    pub status: Option<IssueStatus>,
    pub priority: Option<IssuePriority>,
    #[serde(rename = "type")]
    pub issue_type: Option<IssueType>,
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub epic_id: Option<Option<String>>,
}

impl BulkUpdates {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.issue_type.is_none()
            && self.assignee_id.is_none()
            && self.epic_id.is_none()
    }

    fn normalized(mut self) -> Self {
        if matches!(&self.assignee_id, Some(Some(id)) if id.is_empty()) {
            self.assignee_id = Some(None);
        }
        if matches!(&self.epic_id, Some(Some(id)) if id.is_empty()) {
            self.epic_id = Some(None);
        }
        self
    }
}

pub struct BulkStorage {
    pool: SqlitePool,
}

impl BulkStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Applies the allowed fields to every issue in `issue_ids`, one
    /// statement per field, all in a single transaction.
    pub async fn bulk_update(
        &self,
        issue_ids: &[String],
        updates: BulkUpdates,
    ) -> StorageResult<usize> {
        if issue_ids.is_empty() {
            return Err(StorageError::Validation(
                "issueIds array is required".to_string(),
            ));
        }

        let updates = updates.normalized();
        if updates.is_empty() {
            return Err(StorageError::Validation(
                "No valid fields to update".to_string(),
            ));
        }

        let placeholders = placeholders(issue_ids.len());
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        if let Some(status) = updates.status {
            let sql = format!(
                "UPDATE issues SET status = ?, updated_at = ? WHERE id IN ({placeholders})"
            );
            let mut q = sqlx::query(&sql).bind(status).bind(now);
            for id in issue_ids {
                q = q.bind(id);
            }
            q.execute(&mut *tx).await.map_err(StorageError::Sqlx)?;
        }
        if let Some(priority) = updates.priority {
            let sql = format!(
                "UPDATE issues SET priority = ?, updated_at = ? WHERE id IN ({placeholders})"
            );
            let mut q = sqlx::query(&sql).bind(priority).bind(now);
            for id in issue_ids {
                q = q.bind(id);
            }
            q.execute(&mut *tx).await.map_err(StorageError::Sqlx)?;
        }
        if let Some(issue_type) = updates.issue_type {
            let sql =
                format!("UPDATE issues SET type = ?, updated_at = ? WHERE id IN ({placeholders})");
            let mut q = sqlx::query(&sql).bind(issue_type).bind(now);
            for id in issue_ids {
                q = q.bind(id);
            }
            q.execute(&mut *tx).await.map_err(StorageError::Sqlx)?;
        }
        if let Some(assignee_id) = &updates.assignee_id {
            let sql = format!(
                "UPDATE issues SET assignee_id = ?, updated_at = ? WHERE id IN ({placeholders})"
            );
            let mut q = sqlx::query(&sql).bind(assignee_id.as_deref()).bind(now);
            for id in issue_ids {
                q = q.bind(id);
            }
            q.execute(&mut *tx).await.map_err(StorageError::Sqlx)?;
        }
        if let Some(epic_id) = &updates.epic_id {
            let sql = format!(
                "UPDATE issues SET epic_id = ?, updated_at = ? WHERE id IN ({placeholders})"
            );
            let mut q = sqlx::query(&sql).bind(epic_id.as_deref()).bind(now);
            for id in issue_ids {
                q = q.bind(id);
            }
            q.execute(&mut *tx).await.map_err(StorageError::Sqlx)?;
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        debug!("Bulk updated {} issue(s)", issue_ids.len());
        Ok(issue_ids.len())
    }

    /// Deletes every issue in `issue_ids` with dependents, atomically.
    pub async fn bulk_delete(&self, issue_ids: &[String]) -> StorageResult<usize> {
        if issue_ids.is_empty() {
            return Err(StorageError::Validation(
                "issueIds array is required".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;
        delete_issues_tx(&mut tx, issue_ids).await?;
        tx.commit().await.map_err(StorageError::Sqlx)?;

        debug!("Bulk deleted {} issue(s)", issue_ids.len());
        Ok(issue_ids.len())
    }
}

/// Removes dependent rows before the issues themselves. Comments first, the
/// issues last; the order never changes.
pub(crate) async fn delete_issues_tx(
    tx: &mut Transaction<'_, Sqlite>,
    issue_ids: &[String],
) -> StorageResult<()> {
    let placeholders = placeholders(issue_ids.len());

    let dependent_deletes = [
        format!("DELETE FROM comments WHERE issue_id IN ({placeholders})"),
        format!("DELETE FROM issue_labels WHERE issue_id IN ({placeholders})"),
        format!("DELETE FROM issue_history WHERE issue_id IN ({placeholders})"),
        format!("DELETE FROM attachments WHERE issue_id IN ({placeholders})"),
        format!("DELETE FROM subtasks WHERE parent_issue_id IN ({placeholders})"),
        format!("DELETE FROM time_logs WHERE issue_id IN ({placeholders})"),
        format!("DELETE FROM issue_estimates WHERE issue_id IN ({placeholders})"),
        format!("DELETE FROM issue_votes WHERE issue_id IN ({placeholders})"),
        format!("DELETE FROM issue_watchers WHERE issue_id IN ({placeholders})"),
        format!("DELETE FROM custom_field_values WHERE issue_id IN ({placeholders})"),
    ];

    for sql in &dependent_deletes {
        let mut q = sqlx::query(sql);
        for id in issue_ids {
            q = q.bind(id);
        }
        q.execute(&mut **tx).await.map_err(StorageError::Sqlx)?;
    }

    let links_sql = format!(
        "DELETE FROM issue_links WHERE source_issue_id IN ({placeholders}) \
         OR target_issue_id IN ({placeholders})"
    );
    let mut q = sqlx::query(&links_sql);
    for id in issue_ids {
        q = q.bind(id);
    }
    for id in issue_ids {
        q = q.bind(id);
    }
    q.execute(&mut **tx).await.map_err(StorageError::Sqlx)?;

    // Children of a deleted epic fall back to having no epic.
    let clear_epics_sql =
        format!("UPDATE issues SET epic_id = NULL WHERE epic_id IN ({placeholders})");
    let mut q = sqlx::query(&clear_epics_sql);
    for id in issue_ids {
        q = q.bind(id);
    }
    q.execute(&mut **tx).await.map_err(StorageError::Sqlx)?;

    let issues_sql = format!("DELETE FROM issues WHERE id IN ({placeholders})");
    let mut q = sqlx::query(&issues_sql);
    for id in issue_ids {
        q = q.bind(id);
    }
    q.execute(&mut **tx).await.map_err(StorageError::Sqlx)?;

    Ok(())
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{memory_pool, seed_issue, seed_project, seed_user};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use sqlx::Row;

    #[tokio::test]
    async fn updates_apply_to_all_listed_issues() {
        let pool = memory_pool().await;
        let user_id = seed_user(&pool, "Rosa", "rosa@example.com").await;
        let project_id = seed_project(&pool, "Apollo", "APO").await;
        let a = seed_issue(&pool, &project_id, &user_id, "One").await;
        let b = seed_issue(&pool, &project_id, &user_id, "Two").await;
        let c = seed_issue(&pool, &project_id, &user_id, "Untouched").await;

        let storage = BulkStorage::new(pool.clone());
        let updates: BulkUpdates = serde_json::from_value(json!({
            "status": "done",
            "assigneeId": user_id,
        }))
        .unwrap();

        let updated = storage
            .bulk_update(&[a.clone(), b.clone()], updates)
            .await
            .unwrap();
        assert_eq!(updated, 2);

        for id in [&a, &b] {
            let row = sqlx::query("SELECT status, assignee_id FROM issues WHERE id = ?")
                .bind(id)
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(row.get::<String, _>("status"), "done");
            assert_eq!(row.get::<Option<String>, _>("assignee_id"), Some(user_id.clone()));
        }

        let row = sqlx::query("SELECT status FROM issues WHERE id = ?")
            .bind(&c)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.get::<String, _>("status"), "backlog");
    }

    #[tokio::test]
    async fn empty_string_clears_assignee_across_set() {
        let pool = memory_pool().await;
        let user_id = seed_user(&pool, "Rosa", "rosa@example.com").await;
        let project_id = seed_project(&pool, "Apollo", "APO").await;
        let a = seed_issue(&pool, &project_id, &user_id, "One").await;
        sqlx::query("UPDATE issues SET assignee_id = ? WHERE id = ?")
            .bind(&user_id)
            .bind(&a)
            .execute(&pool)
            .await
            .unwrap();

        let storage = BulkStorage::new(pool.clone());
        let updates: BulkUpdates = serde_json::from_value(json!({ "assigneeId": "" })).unwrap();
        storage.bulk_update(&[a.clone()], updates).await.unwrap();

        let row = sqlx::query("SELECT assignee_id FROM issues WHERE id = ?")
            .bind(&a)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.get::<Option<String>, _>("assignee_id"), None);
    }

    #[tokio::test]
    async fn rejects_empty_ids_and_empty_updates() {
        let pool = memory_pool().await;
        let storage = BulkStorage::new(pool.clone());

        let err = storage
            .bulk_update(&[], BulkUpdates::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "issueIds array is required");

        let err = storage
            .bulk_update(&["x".to_string()], BulkUpdates::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No valid fields to update");

        let err = storage.bulk_delete(&[]).await.unwrap_err();
        assert_eq!(err.to_string(), "issueIds array is required");
    }

    #[tokio::test]
    async fn unknown_payload_fields_are_ignored() {
        let updates: BulkUpdates = serde_json::from_value(json!({
            "title": "not allowed",
            "reporterId": "nope",
            "priority": "highest",
        }))
        .unwrap();
        assert!(updates.status.is_none());
        assert_eq!(updates.priority, Some(IssuePriority::Highest));
    }

    #[tokio::test]
    async fn delete_removes_dependents_for_every_issue() {
        let pool = memory_pool().await;
        let user_id = seed_user(&pool, "Rosa", "rosa@example.com").await;
        let project_id = seed_project(&pool, "Apollo", "APO").await;
        let a = seed_issue(&pool, &project_id, &user_id, "One").await;
        let b = seed_issue(&pool, &project_id, &user_id, "Two").await;

        for issue_id in [&a, &b] {
            sqlx::query("INSERT INTO comments (id, issue_id, user_id, content) VALUES (?, ?, ?, ?)")
                .bind(format!("c-{issue_id}"))
                .bind(issue_id)
                .bind(&user_id)
                .bind("note")
                .execute(&pool)
                .await
                .unwrap();
            sqlx::query("INSERT INTO time_logs (id, issue_id, user_id, time_spent) VALUES (?, ?, ?, 30)")
                .bind(format!("t-{issue_id}"))
                .bind(issue_id)
                .bind(&user_id)
                .execute(&pool)
                .await
                .unwrap();
        }
        sqlx::query(
            "INSERT INTO issue_links (id, source_issue_id, target_issue_id, link_type) VALUES ('l1', ?, ?, 'blocks')",
        )
        .bind(&a)
        .bind(&b)
        .execute(&pool)
        .await
        .unwrap();

        let storage = BulkStorage::new(pool.clone());
        let deleted = storage.bulk_delete(&[a, b]).await.unwrap();
        assert_eq!(deleted, 2);

        for table in ["issues", "comments", "time_logs", "issue_links"] {
            let sql = format!("SELECT COUNT(*) AS n FROM {table}");
            let n: i64 = sqlx::query(&sql)
                .fetch_one(&pool)
                .await
                .map(|r| r.get("n"))
                .unwrap();
            assert_eq!(n, 0, "{table} should be empty");
        }
    }
}
