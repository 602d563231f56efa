// ABOUTME: Password hashing, session rows, and cookie plumbing for login state
// ABOUTME: Sessions are opaque UUIDs stored server side with a 30 day expiry

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::db::DbState;
use crate::storage::{StorageError, StorageResult};
use crate::users::{row_to_summary, UserSummary};

pub const SESSION_COOKIE: &str = "session";
const SESSION_TTL_DAYS: i64 = 30;

pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    hash_password(password) == password_hash
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

pub struct SessionStorage {
    pool: SqlitePool,
}

impl SessionStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_session(&self, user_id: &str) -> StorageResult<Session> {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            expires_at: Utc::now() + Duration::days(SESSION_TTL_DAYS),
        };

        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, expires_at, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(session.expires_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(session)
    }

    /// Resolves a session to its user, dropping expired rows on the way.
    pub async fn user_for_session(&self, session_id: &str) -> StorageResult<Option<UserSummary>> {
        let now = Utc::now();

        sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let row = sqlx::query(
            r#"
            SELECT u.id, u.name, u.email, u.avatar
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = ? AND s.expires_at > ?
            "#,
        )
        .bind(session_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        row.as_ref().map(row_to_summary).transpose()
    }

    pub async fn delete_session(&self, session_id: &str) -> StorageResult<()> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(())
    }

    pub async fn session_count(&self, user_id: &str) -> StorageResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM sessions WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        Ok(row.try_get("count")?)
    }
}

/// Extracts the session id from a Cookie header, if present.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

pub fn session_cookie(session_id: &str) -> String {
    let max_age = Duration::days(SESSION_TTL_DAYS).num_seconds();
    format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}")
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

pub async fn current_user(db: &DbState, headers: &HeaderMap) -> StorageResult<Option<UserSummary>> {
    let Some(session_id) = session_id_from_headers(headers) else {
        return Ok(None);
    };
    db.sessions.user_for_session(&session_id).await
}

/// Session-gated operations resolve their actor through this.
pub async fn require_user(db: &DbState, headers: &HeaderMap) -> StorageResult<UserSummary> {
    current_user(db, headers)
        .await?
        .ok_or(StorageError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{memory_pool, seed_user};
    use pretty_assertions::assert_eq;

    #[test]
    fn hashing_is_deterministic_hex() {
        let a = hash_password("hunter2");
        let b = hash_password("hunter2");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(verify_password("hunter2", &a));
        assert!(!verify_password("hunter3", &a));
    }

    #[test]
    fn cookie_header_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "theme=dark; session=abc-123; other=1".parse().unwrap(),
        );
        assert_eq!(session_id_from_headers(&headers), Some("abc-123".into()));

        let empty = HeaderMap::new();
        assert_eq!(session_id_from_headers(&empty), None);
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let pool = memory_pool().await;
        let user_id = seed_user(&pool, "Sam", "sam@example.com").await;
        let storage = SessionStorage::new(pool.clone());

        let session = storage.create_session(&user_id).await.unwrap();
        let resolved = storage.user_for_session(&session.id).await.unwrap();
        assert_eq!(resolved.unwrap().id, user_id);

        storage.delete_session(&session.id).await.unwrap();
        let resolved = storage.user_for_session(&session.id).await.unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn expired_sessions_do_not_resolve() {
        let pool = memory_pool().await;
        let user_id = seed_user(&pool, "Sam", "sam@example.com").await;
        let storage = SessionStorage::new(pool.clone());

        sqlx::query("INSERT INTO sessions (id, user_id, expires_at) VALUES (?, ?, ?)")
            .bind("stale")
            .bind(&user_id)
            .bind(Utc::now() - Duration::days(1))
            .execute(&pool)
            .await
            .unwrap();

        let resolved = storage.user_for_session("stale").await.unwrap();
        assert!(resolved.is_none());
        assert_eq!(storage.session_count(&user_id).await.unwrap(), 0);
    }
}
