// ABOUTME: Shared helpers for unit tests: in-memory database plus row seeding
// ABOUTME: Single-connection pool so every query observes the same database

use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Fresh in-memory database with all migrations applied.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .unwrap();

    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}

pub async fn seed_user(pool: &SqlitePool, name: &str, email: &str) -> String {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO users (id, email, name, password_hash, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(email)
    .bind(name)
    .bind("test-hash")
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();
    id
}

pub async fn seed_project(pool: &SqlitePool, name: &str, key: &str) -> String {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO projects (id, name, key, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(name)
    .bind(key)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();
    id
}

pub async fn seed_issue(
    pool: &SqlitePool,
    project_id: &str,
    reporter_id: &str,
    title: &str,
) -> String {
    let id = Uuid::new_v4().to_string();
    let key = format!("SEED-{}", &id[..8]);
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO issues (id, key, title, project_id, reporter_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&key)
    .bind(title)
    .bind(project_id)
    .bind(reporter_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .unwrap();
    id
}
