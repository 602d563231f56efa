// ABOUTME: Sprint planning: lifecycle rows plus issue-to-sprint assignment

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::storage::{StorageError, StorageResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SprintStatus {
    Future,
    Active,
    Closed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub goal: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: SprintStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSprintRequest {
    pub name: Option<String>,
    pub goal: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<SprintStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSprintRequest {
    pub name: Option<String>,
    pub goal: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<SprintStatus>,
}

pub struct SprintStorage {
    pool: SqlitePool,
}

impl SprintStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_project(&self, project_id: &str) -> StorageResult<Vec<Sprint>> {
        let rows = sqlx::query(
            "SELECT id, project_id, name, goal, start_date, end_date, status, created_at, updated_at \
             FROM sprints WHERE project_id = ? ORDER BY created_at ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_sprint).collect()
    }

    pub async fn create_sprint(
        &self,
        project_id: &str,
        request: CreateSprintRequest,
    ) -> StorageResult<Sprint> {
        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| StorageError::Validation("Name is required".to_string()))?;

        let exists = sqlx::query("SELECT id FROM projects WHERE id = ?")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        if exists.is_none() {
            return Err(StorageError::not_found("Project"));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO sprints
                (id, project_id, name, goal, start_date, end_date, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(project_id)
        .bind(name)
        .bind(&request.goal)
        .bind(&request.start_date)
        .bind(&request.end_date)
        .bind(request.status.unwrap_or(SprintStatus::Future))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_sprint(&id).await
    }

    pub async fn get_sprint(&self, sprint_id: &str) -> StorageResult<Sprint> {
        let row = sqlx::query(
            "SELECT id, project_id, name, goal, start_date, end_date, status, created_at, updated_at \
             FROM sprints WHERE id = ?",
        )
        .bind(sprint_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => row_to_sprint(&row),
            None => Err(StorageError::not_found("Sprint")),
        }
    }

    pub async fn update_sprint(
        &self,
        sprint_id: &str,
        updates: &UpdateSprintRequest,
    ) -> StorageResult<Sprint> {
        let mut query = String::from("UPDATE sprints SET updated_at = ?");
        let mut has_updates = false;

        if updates.name.is_some() {
            query.push_str(", name = ?");
            has_updates = true;
        }
        if updates.goal.is_some() {
            query.push_str(", goal = ?");
            has_updates = true;
        }
        if updates.start_date.is_some() {
            query.push_str(", start_date = ?");
            has_updates = true;
        }
        if updates.end_date.is_some() {
            query.push_str(", end_date = ?");
            has_updates = true;
        }
        if updates.status.is_some() {
            query.push_str(", status = ?");
            has_updates = true;
        }

        if !has_updates {
            return self.get_sprint(sprint_id).await;
        }

        query.push_str(" WHERE id = ?");

        let mut q = sqlx::query(&query).bind(Utc::now());
        if let Some(name) = &updates.name {
            q = q.bind(name);
        }
        if let Some(goal) = &updates.goal {
            q = q.bind(goal);
        }
        if let Some(start_date) = &updates.start_date {
            q = q.bind(start_date);
        }
        if let Some(end_date) = &updates.end_date {
            q = q.bind(end_date);
        }
        if let Some(status) = updates.status {
            q = q.bind(status);
        }

        let result = q
            .bind(sprint_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("Sprint"));
        }

        self.get_sprint(sprint_id).await
    }

    /// Deletes a sprint, unassigning its issues first.
    pub async fn delete_sprint(&self, sprint_id: &str) -> StorageResult<()> {
        self.get_sprint(sprint_id).await?;

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query("UPDATE issues SET sprint_id = NULL WHERE sprint_id = ?")
            .bind(sprint_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        sqlx::query("DELETE FROM sprints WHERE id = ?")
            .bind(sprint_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        debug!("Deleted sprint {}", sprint_id);
        Ok(())
    }

    pub async fn assign_issue(&self, issue_id: &str, sprint_id: &str) -> StorageResult<()> {
        self.get_sprint(sprint_id).await?;

        let result = sqlx::query("UPDATE issues SET sprint_id = ? WHERE id = ?")
            .bind(sprint_id)
            .bind(issue_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("Issue"));
        }
        Ok(())
    }

    pub async fn remove_issue(&self, issue_id: &str, sprint_id: &str) -> StorageResult<()> {
        sqlx::query("UPDATE issues SET sprint_id = NULL WHERE id = ? AND sprint_id = ?")
            .bind(issue_id)
            .bind(sprint_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(())
    }
}

fn row_to_sprint(row: &SqliteRow) -> StorageResult<Sprint> {
    Ok(Sprint {
        id: row.try_get("id")?,
        project_id: row.try_get("project_id")?,
        name: row.try_get("name")?,
        goal: row.try_get("goal")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        status: row.try_get("status")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{memory_pool, seed_issue, seed_project, seed_user};
    use pretty_assertions::assert_eq;
    use sqlx::Row;

    #[tokio::test]
    async fn sprint_lifecycle_and_assignment() {
        let pool = memory_pool().await;
        let user_id = seed_user(&pool, "Rosa", "rosa@example.com").await;
        let project_id = seed_project(&pool, "Apollo", "APO").await;
        let issue_id = seed_issue(&pool, &project_id, &user_id, "Planned work").await;

        let storage = SprintStorage::new(pool.clone());
        let sprint = storage
            .create_sprint(
                &project_id,
                CreateSprintRequest {
                    name: Some("Sprint 1".to_string()),
                    goal: Some("Ship auth".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(sprint.status, SprintStatus::Future);

        storage.assign_issue(&issue_id, &sprint.id).await.unwrap();
        let assigned: Option<String> = sqlx::query("SELECT sprint_id FROM issues WHERE id = ?")
            .bind(&issue_id)
            .fetch_one(&pool)
            .await
            .map(|r| r.get("sprint_id"))
            .unwrap();
        assert_eq!(assigned.as_deref(), Some(sprint.id.as_str()));

        let updates = UpdateSprintRequest {
            status: Some(SprintStatus::Active),
            ..Default::default()
        };
        let updated = storage.update_sprint(&sprint.id, &updates).await.unwrap();
        assert_eq!(updated.status, SprintStatus::Active);

        storage.delete_sprint(&sprint.id).await.unwrap();
        let cleared: Option<String> = sqlx::query("SELECT sprint_id FROM issues WHERE id = ?")
            .bind(&issue_id)
            .fetch_one(&pool)
            .await
            .map(|r| r.get("sprint_id"))
            .unwrap();
        assert_eq!(cleared, None);
    }

    #[tokio::test]
    async fn missing_sprint_is_not_found() {
        let pool = memory_pool().await;
        let storage = SprintStorage::new(pool);
        let err = storage.get_sprint("ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "Sprint not found");
    }

    #[tokio::test]
    async fn sprint_requires_a_name() {
        let pool = memory_pool().await;
        let project_id = seed_project(&pool, "Apollo", "APO").await;
        let storage = SprintStorage::new(pool);

        let err = storage
            .create_sprint(&project_id, CreateSprintRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
    }
}
