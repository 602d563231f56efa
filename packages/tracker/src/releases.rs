// ABOUTME: Release versions tracked per project

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::storage::{StorageError, StorageResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub release_date: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReleaseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<String>,
}

pub struct ReleaseStorage {
    pool: SqlitePool,
}

impl ReleaseStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_project(&self, project_id: &str) -> StorageResult<Vec<Release>> {
        let rows = sqlx::query(
            "SELECT id, project_id, name, description, status, release_date, created_at \
             FROM releases WHERE project_id = ? ORDER BY created_at DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_release).collect()
    }

    pub async fn create_release(
        &self,
        project_id: &str,
        request: CreateReleaseRequest,
    ) -> StorageResult<Release> {
        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| StorageError::Validation("Name is required".to_string()))?;

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO releases (id, project_id, name, description, release_date, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(project_id)
        .bind(name)
        .bind(&request.description)
        .bind(&request.release_date)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_release(&id).await
    }

    pub async fn get_release(&self, release_id: &str) -> StorageResult<Release> {
        let row = sqlx::query(
            "SELECT id, project_id, name, description, status, release_date, created_at \
             FROM releases WHERE id = ?",
        )
        .bind(release_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => row_to_release(&row),
            None => Err(StorageError::not_found("Release")),
        }
    }
}

fn row_to_release(row: &SqliteRow) -> StorageResult<Release> {
    Ok(Release {
        id: row.try_get("id")?,
        project_id: row.try_get("project_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        status: row.try_get("status")?,
        release_date: row.try_get("release_date")?,
        created_at: row.try_get("created_at")?,
    })
}
