// ABOUTME: Saved search filters, owned per user and stored as JSON

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::storage::{StorageError, StorageResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFilter {
    pub id: String,
    pub user_id: String,
    pub project_id: Option<String>,
    pub name: String,
    pub filters: Value,
    pub created_at: DateTime<Utc>,
}

pub struct SavedFilterStorage {
    pool: SqlitePool,
}

impl SavedFilterStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
        project_id: Option<&str>,
    ) -> StorageResult<Vec<SavedFilter>> {
        let rows = match project_id {
            Some(project_id) => sqlx::query(
                "SELECT id, user_id, project_id, name, filters, created_at FROM saved_filters \
                 WHERE user_id = ? AND project_id = ? ORDER BY created_at DESC",
            )
            .bind(user_id)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?,
            None => sqlx::query(
                "SELECT id, user_id, project_id, name, filters, created_at FROM saved_filters \
                 WHERE user_id = ? ORDER BY created_at DESC",
            )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?,
        };

        rows.iter().map(row_to_filter).collect()
    }

    pub async fn create_filter(
        &self,
        user_id: &str,
        project_id: Option<&str>,
        name: &str,
        filters: &Value,
    ) -> StorageResult<SavedFilter> {
        if name.trim().is_empty() {
            return Err(StorageError::Validation("Name is required".to_string()));
        }

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO saved_filters (id, user_id, project_id, name, filters, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(project_id)
        .bind(name)
        .bind(serde_json::to_string(filters)?)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let row = sqlx::query(
            "SELECT id, user_id, project_id, name, filters, created_at FROM saved_filters WHERE id = ?",
        )
        .bind(&id)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        row_to_filter(&row)
    }

    /// Owner scoped: a user can only delete their own filters.
    pub async fn delete_filter(&self, filter_id: &str, user_id: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM saved_filters WHERE id = ? AND user_id = ?")
            .bind(filter_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(())
    }
}

fn row_to_filter(row: &SqliteRow) -> StorageResult<SavedFilter> {
    let raw: String = row.try_get("filters")?;
    Ok(SavedFilter {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        project_id: row.try_get("project_id")?,
        name: row.try_get("name")?,
        filters: serde_json::from_str(&raw)?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{memory_pool, seed_project, seed_user};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn filters_roundtrip_as_json_and_stay_owner_scoped() {
        let pool = memory_pool().await;
        let rosa = seed_user(&pool, "Rosa", "rosa@example.com").await;
        let jake = seed_user(&pool, "Jake", "jake@example.com").await;
        let storage = SavedFilterStorage::new(pool);

        let criteria = json!({"status": ["todo", "in-progress"], "priority": "high"});
        let filter = storage
            .create_filter(&rosa, None, "My open work", &criteria)
            .await
            .unwrap();
        assert_eq!(filter.filters, criteria);

        storage.delete_filter(&filter.id, &jake).await.unwrap();
        assert_eq!(storage.list_for_user(&rosa, None).await.unwrap().len(), 1);

        storage.delete_filter(&filter.id, &rosa).await.unwrap();
        assert!(storage.list_for_user(&rosa, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_narrows_by_project() {
        let pool = memory_pool().await;
        let rosa = seed_user(&pool, "Rosa", "rosa@example.com").await;
        let project_id = seed_project(&pool, "Apollo", "APO").await;
        let storage = SavedFilterStorage::new(pool);

        storage
            .create_filter(&rosa, Some(&project_id), "Apollo bugs", &json!({"type": "bug"}))
            .await
            .unwrap();
        storage
            .create_filter(&rosa, None, "Everywhere", &json!({}))
            .await
            .unwrap();

        let scoped = storage
            .list_for_user(&rosa, Some(&project_id))
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].name, "Apollo bugs");
        assert_eq!(storage.list_for_user(&rosa, None).await.unwrap().len(), 2);
    }
}
