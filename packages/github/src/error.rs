// ABOUTME: Error type for GitHub API operations

use thiserror::Error;

/// GitHub operation errors
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx answer from the GitHub API. Carries the upstream status so
    /// callers can pass it through.
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid GitHub repository URL")]
    InvalidRepoUrl,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type GitHubResult<T> = Result<T, GitHubError>;

impl GitHubError {
    /// The upstream HTTP status, when the error came from a GitHub response.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            GitHubError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
