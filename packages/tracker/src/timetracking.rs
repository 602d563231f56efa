// ABOUTME: Work logs, estimate rollups, and the "2h 30m" duration parser
// ABOUTME: Aggregation is read-then-write in one transaction, remaining never below zero

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::storage::{StorageError, StorageResult};
use crate::users::UserSummary;

fn hours_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*h").expect("hours pattern"))
}

fn minutes_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*m").expect("minutes pattern"))
}

/// Parses "2h 30m" style durations into minutes. Text without any
/// recognizable component parses to 0.
pub fn parse_duration(text: &str) -> i64 {
    let hours = hours_pattern()
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(0);
    let minutes = minutes_pattern()
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(0);
    hours * 60 + minutes
}

/// Accepts either raw minutes or a duration string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TimeSpentInput {
    Minutes(i64),
    Text(String),
}

impl TimeSpentInput {
    pub fn minutes(&self) -> i64 {
        match self {
            TimeSpentInput::Minutes(minutes) => *minutes,
            TimeSpentInput::Text(text) => parse_duration(text),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeLog {
    pub id: String,
    pub issue_id: String,
    pub user_id: String,
    pub time_spent: i64,
    pub description: Option<String>,
    pub user: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueEstimate {
    pub issue_id: String,
    pub original_estimate: Option<i64>,
    pub remaining_estimate: Option<i64>,
    pub time_spent: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeTrackingSummary {
    pub logs: Vec<TimeLog>,
    pub estimate: Option<IssueEstimate>,
}

pub struct TimeTrackingStorage {
    pool: SqlitePool,
}

impl TimeTrackingStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Records a work log and folds it into the estimate row. Remaining time
    /// decreases by the logged amount but is clamped at zero.
    pub async fn log_time(
        &self,
        issue_id: &str,
        user_id: &str,
        time_spent: &TimeSpentInput,
        description: Option<&str>,
    ) -> StorageResult<TimeLog> {
        let minutes = time_spent.minutes();
        if minutes <= 0 {
            return Err(StorageError::Validation(
                "Time spent is required".to_string(),
            ));
        }

        let exists = sqlx::query("SELECT id FROM issues WHERE id = ?")
            .bind(issue_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        if exists.is_none() {
            return Err(StorageError::not_found("Issue"));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query(
            r#"
            INSERT INTO time_logs (id, issue_id, user_id, time_spent, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(issue_id)
        .bind(user_id)
        .bind(minutes)
        .bind(description)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        let estimate = sqlx::query(
            "SELECT original_estimate, remaining_estimate, time_spent \
             FROM issue_estimates WHERE issue_id = ?",
        )
        .bind(issue_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        match estimate {
            Some(row) => {
                let logged: i64 = row.try_get("time_spent")?;
                let remaining: Option<i64> = row.try_get("remaining_estimate")?;
                let new_remaining = remaining.map(|r| (r - minutes).max(0));

                sqlx::query(
                    "UPDATE issue_estimates \
                     SET time_spent = ?, remaining_estimate = ?, updated_at = ? \
                     WHERE issue_id = ?",
                )
                .bind(logged + minutes)
                .bind(new_remaining)
                .bind(now)
                .bind(issue_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
            }
            None => {
                sqlx::query(
                    "INSERT INTO issue_estimates (issue_id, time_spent, updated_at) \
                     VALUES (?, ?, ?)",
                )
                .bind(issue_id)
                .bind(minutes)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
            }
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        self.get_log(&id).await
    }

    pub async fn set_estimate(
        &self,
        issue_id: &str,
        original_estimate: Option<i64>,
        remaining_estimate: Option<i64>,
    ) -> StorageResult<IssueEstimate> {
        sqlx::query(
            r#"
            INSERT INTO issue_estimates (issue_id, original_estimate, remaining_estimate, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(issue_id) DO UPDATE SET
                original_estimate = excluded.original_estimate,
                remaining_estimate = excluded.remaining_estimate,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(issue_id)
        .bind(original_estimate)
        .bind(remaining_estimate)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let estimate = self.get_estimate(issue_id).await?;
        estimate.ok_or_else(|| StorageError::Database("estimate row missing after upsert".into()))
    }

    pub async fn get_estimate(&self, issue_id: &str) -> StorageResult<Option<IssueEstimate>> {
        let row = sqlx::query(
            "SELECT issue_id, original_estimate, remaining_estimate, time_spent, updated_at \
             FROM issue_estimates WHERE issue_id = ?",
        )
        .bind(issue_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        row.as_ref().map(row_to_estimate).transpose()
    }

    pub async fn summary(&self, issue_id: &str) -> StorageResult<TimeTrackingSummary> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.issue_id, t.user_id, t.time_spent, t.description, t.created_at,
                   u.id AS user_user_id, u.name AS user_name, u.email AS user_email,
                   u.avatar AS user_avatar
            FROM time_logs t
            LEFT JOIN users u ON u.id = t.user_id
            WHERE t.issue_id = ?
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(issue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let logs = rows
            .iter()
            .map(row_to_log)
            .collect::<StorageResult<Vec<_>>>()?;
        let estimate = self.get_estimate(issue_id).await?;

        Ok(TimeTrackingSummary { logs, estimate })
    }

    async fn get_log(&self, log_id: &str) -> StorageResult<TimeLog> {
        let row = sqlx::query(
            r#"
            SELECT t.id, t.issue_id, t.user_id, t.time_spent, t.description, t.created_at,
                   u.id AS user_user_id, u.name AS user_name, u.email AS user_email,
                   u.avatar AS user_avatar
            FROM time_logs t
            LEFT JOIN users u ON u.id = t.user_id
            WHERE t.id = ?
            "#,
        )
        .bind(log_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => row_to_log(&row),
            None => Err(StorageError::not_found("Time log")),
        }
    }
}

fn row_to_log(row: &SqliteRow) -> StorageResult<TimeLog> {
    let user = match row.try_get::<Option<String>, _>("user_user_id")? {
        Some(id) => Some(UserSummary {
            id,
            name: row.try_get("user_name")?,
            email: row.try_get("user_email")?,
            avatar: row.try_get("user_avatar")?,
        }),
        None => None,
    };

    Ok(TimeLog {
        id: row.try_get("id")?,
        issue_id: row.try_get("issue_id")?,
        user_id: row.try_get("user_id")?,
        time_spent: row.try_get("time_spent")?,
        description: row.try_get("description")?,
        user,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_estimate(row: &SqliteRow) -> StorageResult<IssueEstimate> {
    Ok(IssueEstimate {
        issue_id: row.try_get("issue_id")?,
        original_estimate: row.try_get("original_estimate")?,
        remaining_estimate: row.try_get("remaining_estimate")?,
        time_spent: row.try_get("time_spent")?,
        updated_at: row.try_get("updated_at")?,
    })
}
