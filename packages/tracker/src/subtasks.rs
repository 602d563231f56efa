// ABOUTME: Lightweight subtasks hanging off a parent issue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::issues::types::double_option;
use crate::storage::{StorageError, StorageResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub parent_issue_id: String,
    pub title: String,
    pub completed: bool,
    pub assignee_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubtaskRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<String>>,
}

pub struct SubtaskStorage {
    pool: SqlitePool,
}

impl SubtaskStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_issue(&self, parent_issue_id: &str) -> StorageResult<Vec<Subtask>> {
        let rows = sqlx::query(
            "SELECT id, parent_issue_id, title, completed, assignee_id, created_at, updated_at \
             FROM subtasks WHERE parent_issue_id = ? ORDER BY created_at ASC",
        )
        .bind(parent_issue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_subtask).collect()
    }

    pub async fn create_subtask(
        &self,
        parent_issue_id: &str,
        title: &str,
    ) -> StorageResult<Subtask> {
        if title.trim().is_empty() {
            return Err(StorageError::Validation("Title is required".to_string()));
        }

        let exists = sqlx::query("SELECT id FROM issues WHERE id = ?")
            .bind(parent_issue_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        if exists.is_none() {
            return Err(StorageError::not_found("Issue"));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO subtasks (id, parent_issue_id, title, completed, created_at, updated_at) \
             VALUES (?, ?, ?, 0, ?, ?)",
        )
        .bind(&id)
        .bind(parent_issue_id)
        .bind(title)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_subtask(&id).await
    }

    pub async fn get_subtask(&self, subtask_id: &str) -> StorageResult<Subtask> {
        let row = sqlx::query(
            "SELECT id, parent_issue_id, title, completed, assignee_id, created_at, updated_at \
             FROM subtasks WHERE id = ?",
        )
        .bind(subtask_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => row_to_subtask(&row),
            None => Err(StorageError::not_found("Subtask")),
        }
    }

    pub async fn update_subtask(
        &self,
        subtask_id: &str,
        updates: &UpdateSubtaskRequest,
    ) -> StorageResult<Subtask> {
        let mut query = String::from("UPDATE subtasks SET updated_at = ?");
        let mut has_updates = false;

        if updates.title.is_some() {
            query.push_str(", title = ?");
            has_updates = true;
        }
        if updates.completed.is_some() {
            query.push_str(", completed = ?");
            has_updates = true;
        }
        if updates.assignee_id.is_some() {
            query.push_str(", assignee_id = ?");
            has_updates = true;
        }

        if !has_updates {
            return self.get_subtask(subtask_id).await;
        }

        query.push_str(" WHERE id = ?");

        let mut q = sqlx::query(&query).bind(Utc::now());
        if let Some(title) = &updates.title {
            q = q.bind(title);
        }
        if let Some(completed) = updates.completed {
            q = q.bind(completed);
        }
        if let Some(assignee_id) = &updates.assignee_id {
            q = q.bind(assignee_id.as_deref());
        }

        let result = q
            .bind(subtask_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("Subtask"));
        }

        self.get_subtask(subtask_id).await
    }

    pub async fn delete_subtask(&self, subtask_id: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM subtasks WHERE id = ?")
            .bind(subtask_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(())
    }
}

fn row_to_subtask(row: &SqliteRow) -> StorageResult<Subtask> {
    Ok(Subtask {
        id: row.try_get("id")?,
        parent_issue_id: row.try_get("parent_issue_id")?,
        title: row.try_get("title")?,
        completed: row.try_get("completed")?,
        assignee_id: row.try_get("assignee_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
