// ABOUTME: GitHub REST API client library: repository listing and creation,
// ABOUTME: commit lookups, repo URL parsing, and issue mirroring

pub mod client;
pub mod error;
pub mod types;

pub use client::{parse_repo_url, GitHubClient};
pub use error::{GitHubError, GitHubResult};
pub use types::{CommitDetail, CommitFile, CommitStats, GitHubRepo, IssueMirror, MirroredIssue};
