// ABOUTME: Database initialization and shared state handed to every route handler
// ABOUTME: Owns the SQLite pool and one storage struct per domain

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

use crate::attachments::AttachmentStorage;
use crate::auth::SessionStorage;
use crate::comments::CommentStorage;
use crate::customfields::CustomFieldStorage;
use crate::filters::SavedFilterStorage;
use crate::integrations::IntegrationStorage;
use crate::issues::{BulkStorage, HistoryStorage, IssueStorage};
use crate::labels::LabelStorage;
use crate::links::IssueLinkStorage;
use crate::notifications::NotificationStorage;
use crate::projects::ProjectStorage;
use crate::releases::ReleaseStorage;
use crate::reports::ReportStorage;
use crate::sprints::SprintStorage;
use crate::storage::{default_db_path, StorageError, StorageResult};
use crate::subtasks::SubtaskStorage;
use crate::timetracking::TimeTrackingStorage;
use crate::users::UserStorage;
use crate::votes::VoteStorage;
use crate::watchers::WatcherStorage;

#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub issues: Arc<IssueStorage>,
    pub bulk: Arc<BulkStorage>,
    pub history: Arc<HistoryStorage>,
    pub projects: Arc<ProjectStorage>,
    pub users: Arc<UserStorage>,
    pub sessions: Arc<SessionStorage>,
    pub comments: Arc<CommentStorage>,
    pub notifications: Arc<NotificationStorage>,
    pub time_tracking: Arc<TimeTrackingStorage>,
    pub votes: Arc<VoteStorage>,
    pub watchers: Arc<WatcherStorage>,
    pub labels: Arc<LabelStorage>,
    pub subtasks: Arc<SubtaskStorage>,
    pub attachments: Arc<AttachmentStorage>,
    pub links: Arc<IssueLinkStorage>,
    pub sprints: Arc<SprintStorage>,
    pub releases: Arc<ReleaseStorage>,
    pub custom_fields: Arc<CustomFieldStorage>,
    pub filters: Arc<SavedFilterStorage>,
    pub reports: Arc<ReportStorage>,
    pub integrations: Arc<IntegrationStorage>,
}

impl DbState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            issues: Arc::new(IssueStorage::new(pool.clone())),
            bulk: Arc::new(BulkStorage::new(pool.clone())),
            history: Arc::new(HistoryStorage::new(pool.clone())),
            projects: Arc::new(ProjectStorage::new(pool.clone())),
            users: Arc::new(UserStorage::new(pool.clone())),
            sessions: Arc::new(SessionStorage::new(pool.clone())),
            comments: Arc::new(CommentStorage::new(pool.clone())),
            notifications: Arc::new(NotificationStorage::new(pool.clone())),
            time_tracking: Arc::new(TimeTrackingStorage::new(pool.clone())),
            votes: Arc::new(VoteStorage::new(pool.clone())),
            watchers: Arc::new(WatcherStorage::new(pool.clone())),
            labels: Arc::new(LabelStorage::new(pool.clone())),
            subtasks: Arc::new(SubtaskStorage::new(pool.clone())),
            attachments: Arc::new(AttachmentStorage::new(pool.clone())),
            links: Arc::new(IssueLinkStorage::new(pool.clone())),
            sprints: Arc::new(SprintStorage::new(pool.clone())),
            releases: Arc::new(ReleaseStorage::new(pool.clone())),
            custom_fields: Arc::new(CustomFieldStorage::new(pool.clone())),
            filters: Arc::new(SavedFilterStorage::new(pool.clone())),
            reports: Arc::new(ReportStorage::new(pool.clone())),
            integrations: Arc::new(IntegrationStorage::new(pool.clone())),
            pool,
        }
    }

    /// Open (or create) the SQLite database at `path` and run pending migrations.
    /// Falls back to the default data directory when no path is given.
    pub async fn init_with_path(path: Option<PathBuf>) -> StorageResult<Self> {
        let db_path = path.unwrap_or_else(default_db_path);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&database_url)
            .await
            .map_err(StorageError::Sqlx)?;

        configure_pragmas(&pool).await?;

        info!("Database connection established at {}", db_path.display());

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(StorageError::Migration)?;

        Ok(Self::new(pool))
    }

    /// In-memory database with the full schema applied. Single connection so
    /// every query sees the same database.
    pub async fn init_in_memory() -> StorageResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(StorageError::Sqlx)?;

        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .map_err(StorageError::Sqlx)?;

        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(StorageError::Migration)?;

        Ok(Self::new(pool))
    }
}

async fn configure_pragmas(pool: &SqlitePool) -> StorageResult<()> {
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await
        .map_err(StorageError::Sqlx)?;
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await
        .map_err(StorageError::Sqlx)?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(pool)
        .await
        .map_err(StorageError::Sqlx)?;
    Ok(())
}
