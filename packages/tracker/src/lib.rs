// ABOUTME: Issue tracking core library: SQLite storage, workflow history,
// ABOUTME: notifications, and the axum REST handlers that expose them

pub mod api;
pub mod attachments;
pub mod auth;
pub mod comments;
pub mod customfields;
pub mod db;
pub mod filters;
pub mod integrations;
pub mod issues;
pub mod labels;
pub mod links;
pub mod notifications;
pub mod projects;
pub mod releases;
pub mod reports;
pub mod sprints;
pub mod storage;
pub mod subtasks;
pub mod timetracking;
pub mod users;
pub mod votes;
pub mod watchers;

pub use db::DbState;
pub use issues::{Issue, IssuePriority, IssueStatus, IssueType};
pub use projects::Project;
pub use storage::{StorageError, StorageResult};
pub use users::{User, UserSummary};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
