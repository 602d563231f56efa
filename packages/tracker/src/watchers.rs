// ABOUTME: Issue watch lists: explicit add and remove, plus a toggle
// ABOUTME: Adding twice is a no-op, never an error

use chrono::Utc;
use sqlx::SqlitePool;

use crate::storage::{StorageError, StorageResult};
use crate::users::{row_to_summary, UserSummary};

pub struct WatcherStorage {
    pool: SqlitePool,
}

impl WatcherStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn add_watcher(&self, issue_id: &str, user_id: &str) -> StorageResult<()> {
        self.ensure_issue(issue_id).await?;

        sqlx::query(
            "INSERT OR IGNORE INTO issue_watchers (issue_id, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(issue_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;
        Ok(())
    }

    pub async fn remove_watcher(&self, issue_id: &str, user_id: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM issue_watchers WHERE issue_id = ? AND user_id = ?")
            .bind(issue_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(())
    }

    /// Starts watching, or stops if already watching. Returns the new state.
    pub async fn toggle_watch(&self, issue_id: &str, user_id: &str) -> StorageResult<bool> {
        if self.is_watching(issue_id, user_id).await? {
            self.remove_watcher(issue_id, user_id).await?;
            Ok(false)
        } else {
            self.add_watcher(issue_id, user_id).await?;
            Ok(true)
        }
    }

    pub async fn is_watching(&self, issue_id: &str, user_id: &str) -> StorageResult<bool> {
        let row = sqlx::query("SELECT 1 FROM issue_watchers WHERE issue_id = ? AND user_id = ?")
            .bind(issue_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(row.is_some())
    }

    pub async fn list_watchers(&self, issue_id: &str) -> StorageResult<Vec<UserSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.name, u.email, u.avatar
            FROM issue_watchers w
            JOIN users u ON u.id = w.user_id
            WHERE w.issue_id = ?
            ORDER BY u.name ASC
            "#,
        )
        .bind(issue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_summary).collect()
    }

    async fn ensure_issue(&self, issue_id: &str) -> StorageResult<()> {
        let exists = sqlx::query("SELECT id FROM issues WHERE id = ?")
            .bind(issue_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        if exists.is_none() {
            return Err(StorageError::not_found("Issue"));
        }
        Ok(())
    }
}
