// ABOUTME: Issue domain: types, storage, audit history, and bulk operations

pub mod bulk;
pub mod history;
pub mod storage;
pub mod types;

pub use bulk::{BulkStorage, BulkUpdates};
pub use history::{HistoryEntry, HistoryStorage};
pub use storage::IssueStorage;
pub use types::{
    CreateIssueRequest, Issue, IssuePriority, IssueStatus, IssueType, TrackedField,
    UpdateIssueRequest,
};
