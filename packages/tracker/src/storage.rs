// ABOUTME: Storage error types shared by every storage struct in the crate
// ABOUTME: plus resolution of the on-disk data directory for database and uploads

use std::env;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Conflict(String),
}

impl StorageError {
    pub fn not_found(entity: &str) -> Self {
        StorageError::NotFound(format!("{entity} not found"))
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Base data directory. `PLANK_DATA_DIR` overrides the default `~/.plank`.
pub fn plank_dir() -> PathBuf {
    if let Ok(dir) = env::var("PLANK_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".plank")
}

pub fn default_db_path() -> PathBuf {
    plank_dir().join("plank.db")
}

/// Directory attachment payloads are written to.
pub fn upload_dir() -> PathBuf {
    plank_dir().join("uploads")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_honors_env_override() {
        env::set_var("PLANK_DATA_DIR", "/tmp/plank-test-dir");
        assert_eq!(plank_dir(), PathBuf::from("/tmp/plank-test-dir"));
        assert_eq!(
            default_db_path(),
            PathBuf::from("/tmp/plank-test-dir/plank.db")
        );
        assert_eq!(upload_dir(), PathBuf::from("/tmp/plank-test-dir/uploads"));
        env::remove_var("PLANK_DATA_DIR");
    }

    #[test]
    fn not_found_formats_entity() {
        let err = StorageError::not_found("Issue");
        assert_eq!(err.to_string(), "Issue not found");
    }
}
