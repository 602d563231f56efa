// ABOUTME: Project records, membership, and the storage struct behind them
// ABOUTME: Project deletion cascades over every dependent table in one transaction

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::storage::{StorageError, StorageResult};
use crate::users::{row_to_summary, UserSummary};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub key: String,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub creator_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    pub role: String,
    #[serde(flatten)]
    pub user: UserSummary,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
}

pub struct ProjectStorage {
    pool: SqlitePool,
}

impl ProjectStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_projects(&self) -> StorageResult<Vec<Project>> {
        debug!("Listing projects");
        let rows = sqlx::query(
            r#"
            SELECT id, name, key, description, avatar, creator_id, created_at, updated_at
            FROM projects
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_project).collect()
    }

    pub async fn get_project(&self, project_id: &str) -> StorageResult<Project> {
        let row = sqlx::query(
            r#"
            SELECT id, name, key, description, avatar, creator_id, created_at, updated_at
            FROM projects
            WHERE id = ?
            "#,
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => row_to_project(&row),
            None => Err(StorageError::not_found("Project")),
        }
    }

    /// Creates a project and enrolls the creator as an admin member.
    /// The key is stored uppercased and seeds issue key allocation.
    pub async fn create_project(
        &self,
        name: &str,
        key: &str,
        description: Option<&str>,
        avatar: Option<&str>,
        creator_id: Option<&str>,
    ) -> StorageResult<Project> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let key = key.to_uppercase();

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query(
            r#"
            INSERT INTO projects (id, name, key, description, avatar, creator_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(&key)
        .bind(description)
        .bind(avatar)
        .bind(creator_id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        if let Some(creator_id) = creator_id {
            sqlx::query(
                r#"
                INSERT INTO project_members (project_id, user_id, role, created_at)
                VALUES (?, ?, 'admin', ?)
                "#,
            )
            .bind(&id)
            .bind(creator_id)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        debug!("Created project {} ({})", id, key);
        self.get_project(&id).await
    }

    pub async fn update_project(
        &self,
        project_id: &str,
        updates: &UpdateProjectRequest,
    ) -> StorageResult<Project> {
        let mut query = String::from("UPDATE projects SET updated_at = ?");
        let mut has_updates = false;

        if updates.name.is_some() {
            query.push_str(", name = ?");
            has_updates = true;
        }
        if updates.description.is_some() {
            query.push_str(", description = ?");
            has_updates = true;
        }
        if updates.avatar.is_some() {
            query.push_str(", avatar = ?");
            has_updates = true;
        }

        if !has_updates {
            return self.get_project(project_id).await;
        }

        query.push_str(" WHERE id = ?");

        let mut q = sqlx::query(&query).bind(Utc::now());
        if let Some(name) = &updates.name {
            q = q.bind(name);
        }
        if let Some(description) = &updates.description {
            q = q.bind(description);
        }
        if let Some(avatar) = &updates.avatar {
            q = q.bind(avatar);
        }

        let result = q
            .bind(project_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("Project"));
        }

        self.get_project(project_id).await
    }

    /// Removes the project and every row that references it or its issues.
    pub async fn delete_project(&self, project_id: &str) -> StorageResult<()> {
        // Fail early so callers get a 404 instead of a silent no-op
        self.get_project(project_id).await?;

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let issue_scoped = [
            "DELETE FROM comments WHERE issue_id IN (SELECT id FROM issues WHERE project_id = ?)",
            "DELETE FROM issue_labels WHERE issue_id IN (SELECT id FROM issues WHERE project_id = ?)",
            "DELETE FROM issue_history WHERE issue_id IN (SELECT id FROM issues WHERE project_id = ?)",
            "DELETE FROM attachments WHERE issue_id IN (SELECT id FROM issues WHERE project_id = ?)",
            "DELETE FROM subtasks WHERE parent_issue_id IN (SELECT id FROM issues WHERE project_id = ?)",
            "DELETE FROM time_logs WHERE issue_id IN (SELECT id FROM issues WHERE project_id = ?)",
            "DELETE FROM issue_estimates WHERE issue_id IN (SELECT id FROM issues WHERE project_id = ?)",
            "DELETE FROM issue_votes WHERE issue_id IN (SELECT id FROM issues WHERE project_id = ?)",
            "DELETE FROM issue_watchers WHERE issue_id IN (SELECT id FROM issues WHERE project_id = ?)",
            "DELETE FROM custom_field_values WHERE issue_id IN (SELECT id FROM issues WHERE project_id = ?)",
        ];

        for sql in issue_scoped {
            sqlx::query(sql)
                .bind(project_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        sqlx::query(
            "DELETE FROM issue_links \
             WHERE source_issue_id IN (SELECT id FROM issues WHERE project_id = ?) \
             OR target_issue_id IN (SELECT id FROM issues WHERE project_id = ?)",
        )
        .bind(project_id)
        .bind(project_id)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        // Issues elsewhere may point at this project's epics.
        sqlx::query(
            "UPDATE issues SET epic_id = NULL \
             WHERE epic_id IN (SELECT id FROM issues WHERE project_id = ?)",
        )
        .bind(project_id)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        let project_scoped = [
            "DELETE FROM issues WHERE project_id = ?",
            "DELETE FROM labels WHERE project_id = ?",
            "DELETE FROM sprints WHERE project_id = ?",
            "DELETE FROM releases WHERE project_id = ?",
            "DELETE FROM custom_fields WHERE project_id = ?",
            "DELETE FROM project_members WHERE project_id = ?",
            "DELETE FROM project_github_repos WHERE project_id = ?",
            "DELETE FROM project_vercel_projects WHERE project_id = ?",
            "DELETE FROM projects WHERE id = ?",
        ];

        for sql in project_scoped {
            sqlx::query(sql)
                .bind(project_id)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        debug!("Deleted project {}", project_id);
        Ok(())
    }

    pub async fn search_projects(&self, term: &str) -> StorageResult<Vec<Project>> {
        let pattern = format!("%{term}%");
        let rows = sqlx::query(
            r#"
            SELECT id, name, key, description, avatar, creator_id, created_at, updated_at
            FROM projects
            WHERE name LIKE ? OR description LIKE ? OR key LIKE ?
            ORDER BY updated_at DESC
            LIMIT 10
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_project).collect()
    }

    pub async fn list_members(&self, project_id: &str) -> StorageResult<Vec<ProjectMember>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.name, u.email, u.avatar, pm.role
            FROM project_members pm
            JOIN users u ON u.id = pm.user_id
            WHERE pm.project_id = ?
            ORDER BY u.name ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| {
                Ok(ProjectMember {
                    role: row.try_get("role")?,
                    user: row_to_summary(row)?,
                })
            })
            .collect()
    }

    pub async fn add_member(
        &self,
        project_id: &str,
        user_id: &str,
        role: &str,
    ) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO project_members (project_id, user_id, role, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(role)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;
        Ok(())
    }
}

fn row_to_project(row: &SqliteRow) -> StorageResult<Project> {
    Ok(Project {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        key: row.try_get("key")?,
        description: row.try_get("description")?,
        avatar: row.try_get("avatar")?,
        creator_id: row.try_get("creator_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{memory_pool, seed_issue, seed_user};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn project_key_is_uppercased() {
        let pool = memory_pool().await;
        let storage = ProjectStorage::new(pool);

        let project = storage
            .create_project("Apollo", "apo", None, None, None)
            .await
            .unwrap();
        assert_eq!(project.key, "APO");
    }

    #[tokio::test]
    async fn creator_becomes_admin_member() {
        let pool = memory_pool().await;
        let user_id = seed_user(&pool, "Mia", "mia@example.com").await;
        let storage = ProjectStorage::new(pool);

        let project = storage
            .create_project("Apollo", "APO", Some("moon shot"), None, Some(&user_id))
            .await
            .unwrap();

        let members = storage.list_members(&project.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].role, "admin");
        assert_eq!(members[0].user.id, user_id);
    }

    #[tokio::test]
    async fn partial_update_touches_only_named_fields() {
        let pool = memory_pool().await;
        let storage = ProjectStorage::new(pool);

        let project = storage
            .create_project("Apollo", "APO", Some("first"), None, None)
            .await
            .unwrap();

        let updates = UpdateProjectRequest {
            name: Some("Apollo 11".to_string()),
            ..Default::default()
        };
        let updated = storage.update_project(&project.id, &updates).await.unwrap();
        assert_eq!(updated.name, "Apollo 11");
        assert_eq!(updated.description.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn delete_removes_issues_and_dependents() {
        let pool = memory_pool().await;
        let user_id = seed_user(&pool, "Mia", "mia@example.com").await;
        let storage = ProjectStorage::new(pool.clone());

        let project = storage
            .create_project("Apollo", "APO", None, None, Some(&user_id))
            .await
            .unwrap();
        let issue_id = seed_issue(&pool, &project.id, &user_id, "Crashing on boot").await;

        sqlx::query("INSERT INTO comments (id, issue_id, user_id, content) VALUES (?, ?, ?, ?)")
            .bind("c1")
            .bind(&issue_id)
            .bind(&user_id)
            .bind("note")
            .execute(&pool)
            .await
            .unwrap();

        storage.delete_project(&project.id).await.unwrap();

        let issues: i64 = sqlx::query("SELECT COUNT(*) AS n FROM issues")
            .fetch_one(&pool)
            .await
            .map(|r| r.get("n"))
            .unwrap();
        let comments: i64 = sqlx::query("SELECT COUNT(*) AS n FROM comments")
            .fetch_one(&pool)
            .await
            .map(|r| r.get("n"))
            .unwrap();
        assert_eq!(issues, 0);
        assert_eq!(comments, 0);

        let err = storage.get_project(&project.id).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_missing_project_is_not_found() {
        let pool = memory_pool().await;
        let storage = ProjectStorage::new(pool);
        let err = storage.delete_project("ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "Project not found");
    }
}
