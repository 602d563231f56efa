// ABOUTME: Per-project custom field definitions and their per-issue values

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::storage::{StorageError, StorageResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomField {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub field_type: String,
    pub options: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A field definition joined with its value on one issue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldValue {
    pub custom_field_id: String,
    pub name: String,
    pub field_type: String,
    pub value: Option<String>,
}

pub struct CustomFieldStorage {
    pool: SqlitePool,
}

impl CustomFieldStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_project(&self, project_id: &str) -> StorageResult<Vec<CustomField>> {
        let rows = sqlx::query(
            "SELECT id, project_id, name, field_type, options, created_at \
             FROM custom_fields WHERE project_id = ? ORDER BY created_at ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_field).collect()
    }

    pub async fn create_field(
        &self,
        project_id: &str,
        name: &str,
        field_type: Option<&str>,
        options: Option<&str>,
    ) -> StorageResult<CustomField> {
        if name.trim().is_empty() {
            return Err(StorageError::Validation("Name is required".to_string()));
        }

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO custom_fields (id, project_id, name, field_type, options, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(project_id)
        .bind(name)
        .bind(field_type.unwrap_or("text"))
        .bind(options)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let row = sqlx::query(
            "SELECT id, project_id, name, field_type, options, created_at \
             FROM custom_fields WHERE id = ?",
        )
        .bind(&id)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        row_to_field(&row)
    }

    pub async fn values_for_issue(&self, issue_id: &str) -> StorageResult<Vec<CustomFieldValue>> {
        let rows = sqlx::query(
            r#"
            SELECT f.id AS custom_field_id, f.name, f.field_type, v.value
            FROM custom_fields f
            LEFT JOIN custom_field_values v
                ON v.custom_field_id = f.id AND v.issue_id = ?
            WHERE f.project_id = (SELECT project_id FROM issues WHERE id = ?)
            ORDER BY f.created_at ASC
            "#,
        )
        .bind(issue_id)
        .bind(issue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| {
                Ok(CustomFieldValue {
                    custom_field_id: row.try_get("custom_field_id")?,
                    name: row.try_get("name")?,
                    field_type: row.try_get("field_type")?,
                    value: row.try_get("value")?,
                })
            })
            .collect()
    }

    pub async fn set_value(
        &self,
        issue_id: &str,
        custom_field_id: &str,
        value: Option<&str>,
    ) -> StorageResult<()> {
        let field = sqlx::query("SELECT id FROM custom_fields WHERE id = ?")
            .bind(custom_field_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        if field.is_none() {
            return Err(StorageError::not_found("Custom field"));
        }

        sqlx::query(
            r#"
            INSERT INTO custom_field_values (issue_id, custom_field_id, value)
            VALUES (?, ?, ?)
            ON CONFLICT(issue_id, custom_field_id) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(issue_id)
        .bind(custom_field_id)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;
        Ok(())
    }
}

fn row_to_field(row: &SqliteRow) -> StorageResult<CustomField> {
    Ok(CustomField {
        id: row.try_get("id")?,
        project_id: row.try_get("project_id")?,
        name: row.try_get("name")?,
        field_type: row.try_get("field_type")?,
        options: row.try_get("options")?,
        created_at: row.try_get("created_at")?,
    })
}
