// ABOUTME: Project-scoped labels and their attachment to issues

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::storage::{StorageError, StorageResult};

const DEFAULT_COLOR: &str = "#6b7280";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: String,
    pub project_id: Option<String>,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

pub struct LabelStorage {
    pool: SqlitePool,
}

impl LabelStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, project_id: Option<&str>) -> StorageResult<Vec<Label>> {
        let rows = match project_id {
            Some(project_id) => {
                sqlx::query(
                    "SELECT id, project_id, name, color, created_at FROM labels \
                     WHERE project_id = ? ORDER BY name ASC",
                )
                .bind(project_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT id, project_id, name, color, created_at FROM labels \
                     ORDER BY name ASC",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_label).collect()
    }

    pub async fn create_label(
        &self,
        project_id: Option<&str>,
        name: &str,
        color: Option<&str>,
    ) -> StorageResult<Label> {
        if name.trim().is_empty() {
            return Err(StorageError::Validation("Name is required".to_string()));
        }

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO labels (id, project_id, name, color, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(project_id)
        .bind(name)
        .bind(color.unwrap_or(DEFAULT_COLOR))
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_label(&id).await
    }

    pub async fn get_label(&self, label_id: &str) -> StorageResult<Label> {
        let row = sqlx::query(
            "SELECT id, project_id, name, color, created_at FROM labels WHERE id = ?",
        )
        .bind(label_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => row_to_label(&row),
            None => Err(StorageError::not_found("Label")),
        }
    }

    pub async fn labels_for_issue(&self, issue_id: &str) -> StorageResult<Vec<Label>> {
        let rows = sqlx::query(
            r#"
            SELECT l.id, l.project_id, l.name, l.color, l.created_at
            FROM issue_labels il
            JOIN labels l ON l.id = il.label_id
            WHERE il.issue_id = ?
            ORDER BY l.name ASC
            "#,
        )
        .bind(issue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_label).collect()
    }

    pub async fn attach(&self, issue_id: &str, label_id: &str) -> StorageResult<()> {
        self.get_label(label_id).await?;

        sqlx::query("INSERT OR IGNORE INTO issue_labels (issue_id, label_id) VALUES (?, ?)")
            .bind(issue_id)
            .bind(label_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(())
    }

    pub async fn detach(&self, issue_id: &str, label_id: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM issue_labels WHERE issue_id = ? AND label_id = ?")
            .bind(issue_id)
            .bind(label_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(())
    }
}

fn row_to_label(row: &SqliteRow) -> StorageResult<Label> {
    Ok(Label {
        id: row.try_get("id")?,
        project_id: row.try_get("project_id")?,
        name: row.try_get("name")?,
        color: row.try_get("color")?,
        created_at: row.try_get("created_at")?,
    })
}
