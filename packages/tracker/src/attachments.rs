// ABOUTME: Attachment metadata rows and stored-filename generation
// ABOUTME: Payload bytes live on disk under the upload directory, rows point at them

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::storage::{StorageError, StorageResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub issue_id: String,
    pub user_id: String,
    pub filename: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Unique on-disk name for an upload. A UUID prefix keeps two uploads of the
/// same file from colliding, even within one millisecond.
pub fn stored_filename(original: &str) -> String {
    format!("{}-{}", Uuid::new_v4(), sanitize_filename(original))
}

/// Strips directories and anything shell-hostile from a client filename.
pub fn sanitize_filename(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

pub struct AttachmentStorage {
    pool: SqlitePool,
}

impl AttachmentStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_issue(&self, issue_id: &str) -> StorageResult<Vec<Attachment>> {
        let rows = sqlx::query(
            "SELECT id, issue_id, user_id, filename, file_path, file_size, mime_type, created_at \
             FROM attachments WHERE issue_id = ? ORDER BY created_at DESC",
        )
        .bind(issue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_attachment).collect()
    }

    pub async fn create_attachment(
        &self,
        issue_id: &str,
        user_id: &str,
        filename: &str,
        file_path: &str,
        file_size: i64,
        mime_type: Option<&str>,
    ) -> StorageResult<Attachment> {
        let exists = sqlx::query("SELECT id FROM issues WHERE id = ?")
            .bind(issue_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        if exists.is_none() {
            return Err(StorageError::not_found("Issue"));
        }

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO attachments
                (id, issue_id, user_id, filename, file_path, file_size, mime_type, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(issue_id)
        .bind(user_id)
        .bind(filename)
        .bind(file_path)
        .bind(file_size)
        .bind(mime_type)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_attachment(&id).await
    }

    pub async fn get_attachment(&self, attachment_id: &str) -> StorageResult<Attachment> {
        let row = sqlx::query(
            "SELECT id, issue_id, user_id, filename, file_path, file_size, mime_type, created_at \
             FROM attachments WHERE id = ?",
        )
        .bind(attachment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => row_to_attachment(&row),
            None => Err(StorageError::not_found("Attachment")),
        }
    }

    /// Removes the row and returns it so the caller can unlink the payload.
    pub async fn delete_attachment(&self, attachment_id: &str) -> StorageResult<Attachment> {
        let attachment = self.get_attachment(attachment_id).await?;

        sqlx::query("DELETE FROM attachments WHERE id = ?")
            .bind(attachment_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(attachment)
    }
}

fn row_to_attachment(row: &SqliteRow) -> StorageResult<Attachment> {
    Ok(Attachment {
        id: row.try_get("id")?,
        issue_id: row.try_get("issue_id")?,
        user_id: row.try_get("user_id")?,
        filename: row.try_get("filename")?,
        file_path: row.try_get("file_path")?,
        file_size: row.try_get("file_size")?,
        mime_type: row.try_get("mime_type")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{memory_pool, seed_issue, seed_project, seed_user};
    use pretty_assertions::assert_eq;

    #[test]
    fn stored_names_are_unique_per_call() {
        let a = stored_filename("report.pdf");
        let b = stored_filename("report.pdf");
        assert_ne!(a, b);
        assert!(a.ends_with("-report.pdf"));
    }

    #[test]
    fn sanitization_strips_paths_and_odd_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\temp\\notes.txt"), "notes.txt");
        assert_eq!(sanitize_filename("my report (v2).pdf"), "my_report__v2_.pdf");
        assert_eq!(sanitize_filename(""), "file");
    }

    #[tokio::test]
    async fn rows_roundtrip_and_delete_returns_path() {
        let pool = memory_pool().await;
        let user_id = seed_user(&pool, "Rosa", "rosa@example.com").await;
        let project_id = seed_project(&pool, "Apollo", "APO").await;
        let issue_id = seed_issue(&pool, &project_id, &user_id, "Has attachment").await;

        let storage = AttachmentStorage::new(pool);
        let attachment = storage
            .create_attachment(
                &issue_id,
                &user_id,
                "screenshot.png",
                "/uploads/abc-screenshot.png",
                2048,
                Some("image/png"),
            )
            .await
            .unwrap();
        assert_eq!(attachment.filename, "screenshot.png");

        let listed = storage.list_for_issue(&issue_id).await.unwrap();
        assert_eq!(listed.len(), 1);

        let deleted = storage.delete_attachment(&attachment.id).await.unwrap();
        assert_eq!(deleted.file_path, "/uploads/abc-screenshot.png");
        assert!(storage.list_for_issue(&issue_id).await.unwrap().is_empty());

        let err = storage.delete_attachment(&attachment.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Attachment not found");
    }
}
