// ABOUTME: Append-only audit trail of issue field changes
// ABOUTME: Rows store display values so the UI never resolves ids

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::storage::{StorageError, StorageResult};
use crate::users::UserSummary;

const INSERT_HISTORY: &str = "INSERT INTO issue_history \
    (id, issue_id, user_id, field, old_value, new_value, created_at) \
    VALUES (?, ?, ?, ?, ?, ?, ?)";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub issue_id: String,
    pub user_id: String,
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub user: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
}

pub struct HistoryStorage {
    pool: SqlitePool,
}

impl HistoryStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn record(
        &self,
        issue_id: &str,
        user_id: &str,
        field: &str,
        old_value: &str,
        new_value: &str,
    ) -> StorageResult<()> {
        sqlx::query(INSERT_HISTORY)
            .bind(Uuid::new_v4().to_string())
            .bind(issue_id)
            .bind(user_id)
            .bind(field)
            .bind(old_value)
            .bind(new_value)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(())
    }

    /// Same append, but inside the caller's transaction so history commits
    /// atomically with the field writes it describes.
    pub(crate) async fn record_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        issue_id: &str,
        user_id: &str,
        field: &str,
        old_value: &str,
        new_value: &str,
    ) -> StorageResult<()> {
        sqlx::query(INSERT_HISTORY)
            .bind(Uuid::new_v4().to_string())
            .bind(issue_id)
            .bind(user_id)
            .bind(field)
            .bind(old_value)
            .bind(new_value)
            .bind(Utc::now())
            .execute(&mut **tx)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(())
    }

    pub async fn list_for_issue(&self, issue_id: &str) -> StorageResult<Vec<HistoryEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT h.id, h.issue_id, h.user_id, h.field, h.old_value, h.new_value, h.created_at,
                   u.id AS user_user_id, u.name AS user_name, u.email AS user_email,
                   u.avatar AS user_avatar
            FROM issue_history h
            LEFT JOIN users u ON u.id = h.user_id
            WHERE h.issue_id = ?
            ORDER BY h.created_at DESC, h.id
            "#,
        )
        .bind(issue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_entry).collect()
    }
}

fn row_to_entry(row: &SqliteRow) -> StorageResult<HistoryEntry> {
    let user = match row.try_get::<Option<String>, _>("user_user_id")? {
        Some(id) => Some(UserSummary {
            id,
            name: row.try_get("user_name")?,
            email: row.try_get("user_email")?,
            avatar: row.try_get("user_avatar")?,
        }),
        None => None,
    };

    Ok(HistoryEntry {
        id: row.try_get("id")?,
        issue_id: row.try_get("issue_id")?,
        user_id: row.try_get("user_id")?,
        field: row.try_get("field")?,
        old_value: row.try_get("old_value")?,
        new_value: row.try_get("new_value")?,
        user,
        created_at: row.try_get("created_at")?,
    })
}
