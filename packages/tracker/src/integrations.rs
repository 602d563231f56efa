// ABOUTME: Links between projects and external services (GitHub repositories,
// ABOUTME: Vercel projects) plus the per-project GitHub access token

use chrono::Utc;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::storage::{StorageError, StorageResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubRepoLink {
    pub id: String,
    pub project_id: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub repo_url: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelProjectLink {
    pub id: String,
    pub project_id: String,
    pub vercel_project_id: String,
    pub vercel_project_name: String,
    pub vercel_team_id: Option<String>,
    pub vercel_url: Option<String>,
    pub created_at: String,
}

fn row_to_repo_link(row: &SqliteRow) -> StorageResult<GitHubRepoLink> {
    Ok(GitHubRepoLink {
        id: row.try_get("id")?,
        project_id: row.try_get("project_id")?,
        repo_owner: row.try_get("repo_owner")?,
        repo_name: row.try_get("repo_name")?,
        repo_url: row.try_get("repo_url")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_vercel_link(row: &SqliteRow) -> StorageResult<VercelProjectLink> {
    Ok(VercelProjectLink {
        id: row.try_get("id")?,
        project_id: row.try_get("project_id")?,
        vercel_project_id: row.try_get("vercel_project_id")?,
        vercel_project_name: row.try_get("vercel_project_name")?,
        vercel_team_id: row.try_get("vercel_team_id")?,
        vercel_url: row.try_get("vercel_url")?,
        created_at: row.try_get("created_at")?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub struct IntegrationStorage {
    pool: SqlitePool,
}

impl IntegrationStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_github_repos(&self, project_id: &str) -> StorageResult<Vec<GitHubRepoLink>> {
        let rows = sqlx::query(
            "SELECT id, project_id, repo_owner, repo_name, repo_url, created_at \
             FROM project_github_repos WHERE project_id = ? ORDER BY created_at DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;
        rows.iter().map(row_to_repo_link).collect()
    }

    pub async fn add_github_repo(
        &self,
        project_id: &str,
        owner: &str,
        name: &str,
    ) -> StorageResult<GitHubRepoLink> {
        let exists = sqlx::query("SELECT id FROM projects WHERE id = ?")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        if exists.is_none() {
            return Err(StorageError::not_found("Project"));
        }

        let id = Uuid::new_v4().to_string();
        let url = format!("https://github.com/{}/{}", owner, name);
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO project_github_repos (id, project_id, repo_owner, repo_name, repo_url, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(project_id)
        .bind(owner)
        .bind(name)
        .bind(&url)
        .bind(&now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(GitHubRepoLink {
                id,
                project_id: project_id.to_string(),
                repo_owner: owner.to_string(),
                repo_name: name.to_string(),
                repo_url: url,
                created_at: now,
            }),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(
                "Repository already connected to this project".to_string(),
            )),
            Err(err) => Err(StorageError::Sqlx(err)),
        }
    }

    pub async fn remove_github_repo(&self, project_id: &str, repo_id: &str) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM project_github_repos WHERE id = ? AND project_id = ?")
            .bind(repo_id)
            .bind(project_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("Repository"));
        }
        Ok(())
    }

    pub async fn get_project_token(&self, project_id: &str) -> StorageResult<Option<String>> {
        let row = sqlx::query("SELECT github_access_token FROM projects WHERE id = ?")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        match row {
            Some(row) => Ok(row.try_get("github_access_token")?),
            None => Err(StorageError::not_found("Project")),
        }
    }

    /// Stores the token used for GitHub calls on behalf of this project.
    /// Only fills an empty slot so a user-provided token is never clobbered.
    pub async fn store_project_token_if_absent(
        &self,
        project_id: &str,
        token: &str,
    ) -> StorageResult<()> {
        sqlx::query(
            "UPDATE projects SET github_access_token = ? \
             WHERE id = ? AND github_access_token IS NULL",
        )
        .bind(token)
        .bind(project_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;
        Ok(())
    }

    pub async fn list_vercel_projects(
        &self,
        project_id: &str,
    ) -> StorageResult<Vec<VercelProjectLink>> {
        let rows = sqlx::query(
            "SELECT id, project_id, vercel_project_id, vercel_project_name, vercel_team_id, \
             vercel_url, created_at \
             FROM project_vercel_projects WHERE project_id = ? ORDER BY created_at DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;
        rows.iter().map(row_to_vercel_link).collect()
    }

    pub async fn add_vercel_project(
        &self,
        project_id: &str,
        vercel_project_id: &str,
        vercel_project_name: &str,
        vercel_team_id: Option<&str>,
        vercel_url: Option<&str>,
    ) -> StorageResult<VercelProjectLink> {
        let exists = sqlx::query("SELECT id FROM projects WHERE id = ?")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        if exists.is_none() {
            return Err(StorageError::not_found("Project"));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO project_vercel_projects \
             (id, project_id, vercel_project_id, vercel_project_name, vercel_team_id, vercel_url, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(project_id)
        .bind(vercel_project_id)
        .bind(vercel_project_name)
        .bind(vercel_team_id)
        .bind(vercel_url)
        .bind(&now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(VercelProjectLink {
                id,
                project_id: project_id.to_string(),
                vercel_project_id: vercel_project_id.to_string(),
                vercel_project_name: vercel_project_name.to_string(),
                vercel_team_id: vercel_team_id.map(str::to_string),
                vercel_url: vercel_url.map(str::to_string),
                created_at: now,
            }),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(
                "Vercel project already connected to this project".to_string(),
            )),
            Err(err) => Err(StorageError::Sqlx(err)),
        }
    }

    pub async fn remove_vercel_project(
        &self,
        project_id: &str,
        vercel_project_id: &str,
    ) -> StorageResult<()> {
        let result = sqlx::query(
            "DELETE FROM project_vercel_projects WHERE project_id = ? AND vercel_project_id = ?",
        )
        .bind(project_id)
        .bind(vercel_project_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;
        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("Vercel project"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{memory_pool, seed_project};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn connecting_same_repo_twice_conflicts() {
        let pool = memory_pool().await;
        let project_id = seed_project(&pool, "Apollo", "APO").await;
        let storage = IntegrationStorage::new(pool);

        let link = storage
            .add_github_repo(&project_id, "plank-dev", "plank")
            .await
            .unwrap();
        assert_eq!(link.repo_url, "https://github.com/plank-dev/plank");

        let err = storage
            .add_github_repo(&project_id, "plank-dev", "plank")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        let repos = storage.list_github_repos(&project_id).await.unwrap();
        assert_eq!(repos.len(), 1);
    }

    #[tokio::test]
    async fn project_token_is_only_written_once() {
        let pool = memory_pool().await;
        let project_id = seed_project(&pool, "Apollo", "APO").await;
        let storage = IntegrationStorage::new(pool);

        assert_eq!(storage.get_project_token(&project_id).await.unwrap(), None);
        storage
            .store_project_token_if_absent(&project_id, "ghp_first")
            .await
            .unwrap();
        storage
            .store_project_token_if_absent(&project_id, "ghp_second")
            .await
            .unwrap();
        assert_eq!(
            storage.get_project_token(&project_id).await.unwrap(),
            Some("ghp_first".to_string())
        );
    }

    #[tokio::test]
    async fn vercel_links_round_trip_and_conflict() {
        let pool = memory_pool().await;
        let project_id = seed_project(&pool, "Apollo", "APO").await;
        let storage = IntegrationStorage::new(pool);

        let link = storage
            .add_vercel_project(
                &project_id,
                "prj_123",
                "plank-site",
                Some("team_1"),
                Some("https://plank-site.vercel.app"),
            )
            .await
            .unwrap();
        assert_eq!(link.vercel_team_id.as_deref(), Some("team_1"));

        let err = storage
            .add_vercel_project(&project_id, "prj_123", "plank-site", None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));

        storage
            .remove_vercel_project(&project_id, "prj_123")
            .await
            .unwrap();
        assert!(storage
            .list_vercel_projects(&project_id)
            .await
            .unwrap()
            .is_empty());
    }
}
