// ABOUTME: Issue voting: one vote per user per issue, toggled on repeat

use serde::Serialize;
use sqlx::{Row, SqlitePool};
use chrono::Utc;

use crate::storage::{StorageError, StorageResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatus {
    pub votes: i64,
    pub user_voted: bool,
}

pub struct VoteStorage {
    pool: SqlitePool,
}

impl VoteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Adds the user's vote, or removes it if already present.
    pub async fn toggle_vote(&self, issue_id: &str, user_id: &str) -> StorageResult<VoteStatus> {
        self.ensure_issue(issue_id).await?;

        let existing =
            sqlx::query("SELECT 1 FROM issue_votes WHERE issue_id = ? AND user_id = ?")
                .bind(issue_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

        if existing.is_some() {
            sqlx::query("DELETE FROM issue_votes WHERE issue_id = ? AND user_id = ?")
                .bind(issue_id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;
        } else {
            sqlx::query(
                "INSERT INTO issue_votes (issue_id, user_id, created_at) VALUES (?, ?, ?)",
            )
            .bind(issue_id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        }

        self.status(issue_id, Some(user_id)).await
    }

    pub async fn status(
        &self,
        issue_id: &str,
        user_id: Option<&str>,
    ) -> StorageResult<VoteStatus> {
        let row = sqlx::query("SELECT COUNT(*) AS votes FROM issue_votes WHERE issue_id = ?")
            .bind(issue_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        let votes: i64 = row.try_get("votes")?;

        let user_voted = match user_id {
            Some(user_id) => {
                sqlx::query("SELECT 1 FROM issue_votes WHERE issue_id = ? AND user_id = ?")
                    .bind(issue_id)
                    .bind(user_id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(StorageError::Sqlx)?
                    .is_some()
            }
            None => false,
        };

        Ok(VoteStatus { votes, user_voted })
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
