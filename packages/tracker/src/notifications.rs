// ABOUTME: Notification rows and the dispatcher that fans a single event out
// ABOUTME: to a recipient set, deduplicated and with the actor excluded

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::storage::{StorageError, StorageResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: Option<String>,
    pub link: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NotificationStorage {
    pool: SqlitePool,
}

impl NotificationStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Writes one notification per distinct recipient. The acting user never
    /// receives a notification for their own action.
    pub async fn notify(
        &self,
        recipients: &[String],
        actor_id: &str,
        kind: &str,
        title: &str,
        message: Option<&str>,
        link: Option<&str>,
    ) -> StorageResult<usize> {
        let mut seen = Vec::new();
        for recipient in recipients {
            if recipient == actor_id || seen.contains(recipient) {
                continue;
            }
            seen.push(recipient.clone());
        }

        let now = Utc::now();
        for recipient in &seen {
            sqlx::query(
                r#"
                INSERT INTO notifications (id, user_id, type, title, message, link, read, created_at)
                VALUES (?, ?, ?, ?, ?, ?, 0, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(recipient)
            .bind(kind)
            .bind(title)
            .bind(message)
            .bind(link)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        }

        debug!("Dispatched {} notification(s) of type {}", seen.len(), kind);
        Ok(seen.len())
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
        unread_only: bool,
    ) -> StorageResult<Vec<Notification>> {
        let mut query = String::from(
            "SELECT id, user_id, type, title, message, link, read, created_at \
             FROM notifications WHERE user_id = ?",
        );
        if unread_only {
            query.push_str(" AND read = 0");
        }
        query.push_str(" ORDER BY created_at DESC");

        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_notification).collect()
    }

    /// Marks one notification read. Scoped to the owner so a user cannot
    /// touch someone else's rows.
    pub async fn mark_read(&self, notification_id: &str, user_id: &str) -> StorageResult<()> {
        sqlx::query("UPDATE notifications SET read = 1 WHERE id = ? AND user_id = ?")
            .bind(notification_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(())
    }

    pub async fn mark_all_read(&self, user_id: &str) -> StorageResult<()> {
        sqlx::query("UPDATE notifications SET read = 1 WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(())
    }
}

fn row_to_notification(row: &SqliteRow) -> StorageResult<Notification> {
    Ok(Notification {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        kind: row.try_get("type")?,
        title: row.try_get("title")?,
        message: row.try_get("message")?,
        link: row.try_get("link")?,
        read: row.try_get("read")?,
        created_at: row.try_get("created_at")?,
    })
}
