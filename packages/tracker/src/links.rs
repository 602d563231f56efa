// ABOUTME: Typed directed links between issues, with the linked issue embedded

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::issues::{IssueStatus, IssueType};
use crate::storage::{StorageError, StorageResult};

pub const LINK_TYPES: [&str; 4] = ["relates", "blocks", "is blocked by", "duplicates"];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedIssue {
    pub id: String,
    pub key: String,
    pub title: String,
    pub status: IssueStatus,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueLink {
    pub id: String,
    pub source_issue_id: String,
    pub target_issue_id: String,
    pub link_type: String,
    /// The issue at the other end, relative to the issue the list was asked for.
    pub linked_issue: Option<LinkedIssue>,
    pub created_at: DateTime<Utc>,
}

pub struct IssueLinkStorage {
    pool: SqlitePool,
}

impl IssueLinkStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists links in both directions, embedding the issue at the other end.
    pub async fn list_for_issue(&self, issue_id: &str) -> StorageResult<Vec<IssueLink>> {
        let rows = sqlx::query(
            r#"
            SELECT l.id, l.source_issue_id, l.target_issue_id, l.link_type, l.created_at,
                   t.id AS linked_id, t.key AS linked_key, t.title AS linked_title,
                   t.status AS linked_status, t.type AS linked_type
            FROM issue_links l
            LEFT JOIN issues t
                ON t.id = CASE WHEN l.source_issue_id = ? THEN l.target_issue_id
                               ELSE l.source_issue_id END
            WHERE l.source_issue_id = ? OR l.target_issue_id = ?
            ORDER BY l.created_at ASC
            "#,
        )
        .bind(issue_id)
        .bind(issue_id)
        .bind(issue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_link).collect()
    }

    pub async fn create_link(
        &self,
        source_issue_id: &str,
        target_issue_id: &str,
        link_type: &str,
    ) -> StorageResult<IssueLink> {
        if !LINK_TYPES.contains(&link_type) {
            return Err(StorageError::Validation("Invalid link type".to_string()));
        }

        for issue_id in [source_issue_id, target_issue_id] {
            let exists = sqlx::query("SELECT id FROM issues WHERE id = ?")
                .bind(issue_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;
            if exists.is_none() {
                return Err(StorageError::not_found("Issue"));
            }
        }

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO issue_links (id, source_issue_id, target_issue_id, link_type, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(source_issue_id)
        .bind(target_issue_id)
        .bind(link_type)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let links = self.list_for_issue(source_issue_id).await?;
        links
            .into_iter()
            .find(|l| l.id == id)
            .ok_or_else(|| StorageError::not_found("Link"))
    }

    pub async fn delete_link(&self, link_id: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM issue_links WHERE id = ?")
            .bind(link_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(())
    }
}

fn row_to_link(row: &SqliteRow) -> StorageResult<IssueLink> {
    let linked_issue = match row.try_get::<Option<String>, _>("linked_id")? {
        Some(id) => Some(LinkedIssue {
            id,
            key: row.try_get("linked_key")?,
            title: row.try_get("linked_title")?,
            status: row.try_get("linked_status")?,
            issue_type: row.try_get("linked_type")?,
        }),
        None => None,
    };

    Ok(IssueLink {
        id: row.try_get("id")?,
        source_issue_id: row.try_get("source_issue_id")?,
        target_issue_id: row.try_get("target_issue_id")?,
        link_type: row.try_get("link_type")?,
        linked_issue,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{memory_pool, seed_issue, seed_project, seed_user};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn links_carry_the_target_issue() {
        let pool = memory_pool().await;
        let user_id = seed_user(&pool, "Rosa", "rosa@example.com").await;
        let project_id = seed_project(&pool, "Apollo", "APO").await;
        let blocker = seed_issue(&pool, &project_id, &user_id, "Blocker").await;
        let blocked = seed_issue(&pool, &project_id, &user_id, "Blocked").await;

        let storage = IssueLinkStorage::new(pool);
        let link = storage
            .create_link(&blocker, &blocked, "blocks")
            .await
            .unwrap();
        assert_eq!(link.link_type, "blocks");
        assert_eq!(link.linked_issue.as_ref().unwrap().title, "Blocked");

        let reverse = storage.list_for_issue(&blocked).await.unwrap();
        assert_eq!(reverse.len(), 1);
        assert_eq!(reverse[0].linked_issue.as_ref().unwrap().title, "Blocker");

        storage.delete_link(&link.id).await.unwrap();
        assert!(storage.list_for_issue(&blocker).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_link_type_is_rejected() {
        let pool = memory_pool().await;
        let user_id = seed_user(&pool, "Rosa", "rosa@example.com").await;
        let project_id = seed_project(&pool, "Apollo", "APO").await;
        let a = seed_issue(&pool, &project_id, &user_id, "A").await;
        let b = seed_issue(&pool, &project_id, &user_id, "B").await;

        let storage = IssueLinkStorage::new(pool);
        let err = storage.create_link(&a, &b, "fixes").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid link type");
    }
}
