// ABOUTME: Issue comments with embedded authors, plus the notification
// ABOUTME: fan-out to reporter and assignee when a comment lands

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::error;
use uuid::Uuid;

use crate::notifications::NotificationStorage;
use crate::storage::{StorageError, StorageResult};
use crate::users::UserSummary;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub issue_id: String,
    pub user_id: String,
    pub content: String,
    pub user: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct CommentStorage {
    pool: SqlitePool,
    notifications: NotificationStorage,
}

impl CommentStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            notifications: NotificationStorage::new(pool.clone()),
            pool,
        }
    }

    pub async fn list_for_issue(&self, issue_id: &str) -> StorageResult<Vec<Comment>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.issue_id, c.user_id, c.content, c.created_at, c.updated_at,
                   u.id AS user_user_id, u.name AS user_name, u.email AS user_email,
                   u.avatar AS user_avatar
            FROM comments c
            LEFT JOIN users u ON u.id = c.user_id
            WHERE c.issue_id = ?
            ORDER BY c.created_at ASC
            "#,
        )
        .bind(issue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_comment).collect()
    }

    pub async fn get_comment(&self, comment_id: &str) -> StorageResult<Comment> {
        let row = sqlx::query(
            r#"
            SELECT c.id, c.issue_id, c.user_id, c.content, c.created_at, c.updated_at,
                   u.id AS user_user_id, u.name AS user_name, u.email AS user_email,
                   u.avatar AS user_avatar
            FROM comments c
            LEFT JOIN users u ON u.id = c.user_id
            WHERE c.id = ?
            "#,
        )
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => row_to_comment(&row),
            None => Err(StorageError::not_found("Comment")),
        }
    }

    /// Adds a comment and notifies the issue's reporter and assignee.
    /// Dispatch failures are logged, never surfaced to the author.
    pub async fn create_comment(
        &self,
        issue_id: &str,
        user_id: &str,
        content: &str,
    ) -> StorageResult<Comment> {
        if content.trim().is_empty() {
            return Err(StorageError::Validation("Content is required".to_string()));
        }
        if user_id.is_empty() {
            return Err(StorageError::Validation("User ID is required".to_string()));
        }

        let issue = sqlx::query(
            "SELECT key, title, project_id, reporter_id, assignee_id FROM issues WHERE id = ?",
        )
        .bind(issue_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?
        .ok_or_else(|| StorageError::not_found("Issue"))?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO comments (id, issue_id, user_id, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(issue_id)
        .bind(user_id)
        .bind(content)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let issue_key: String = issue.try_get("key")?;
        let issue_title: String = issue.try_get("title")?;
        let project_id: String = issue.try_get("project_id")?;
        let reporter_id: String = issue.try_get("reporter_id")?;
        let assignee_id: Option<String> = issue.try_get("assignee_id")?;

        let actor_name = sqlx::query("SELECT name FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .map(|row| row.try_get::<String, _>("name"))
            .transpose()?
            .unwrap_or_else(|| user_id.to_string());

        let mut recipients = vec![reporter_id];
        if let Some(assignee_id) = assignee_id {
            recipients.push(assignee_id);
        }
        let title = format!("{actor_name} commented on {issue_key}");
        let link = format!("/projects/{project_id}/issues/{issue_id}");
        if let Err(e) = self
            .notifications
            .notify(
                &recipients,
                user_id,
                "comment_added",
                &title,
                Some(&issue_title),
                Some(&link),
            )
            .await
        {
            error!("Failed to dispatch comment notification: {}", e);
        }

        self.get_comment(&id).await
    }

    pub async fn update_comment(&self, comment_id: &str, content: &str) -> StorageResult<Comment> {
        if content.trim().is_empty() {
            return Err(StorageError::Validation("Content is required".to_string()));
        }

        let result = sqlx::query("UPDATE comments SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(Utc::now())
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("Comment"));
        }

        self.get_comment(comment_id).await
    }

    pub async fn delete_comment(&self, comment_id: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(())
    }
}

fn row_to_comment(row: &SqliteRow) -> StorageResult<Comment> {
    let user = match row.try_get::<Option<String>, _>("user_user_id")? {
        Some(id) => Some(UserSummary {
            id,
            name: row.try_get("user_name")?,
            email: row.try_get("user_email")?,
            avatar: row.try_get("user_avatar")?,
        }),
        None => None,
    };

    Ok(Comment {
        id: row.try_get("id")?,
        issue_id: row.try_get("issue_id")?,
        user_id: row.try_get("user_id")?,
        content: row.try_get("content")?,
        user,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
