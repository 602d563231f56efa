// ABOUTME: Wire types for the GitHub API surface Plank consumes, mapped to
// ABOUTME: the camelCase shapes the frontend expects

use serde::{Deserialize, Serialize};

/// A repository the token's user can see, flattened from the GitHub shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubRepo {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub url: String,
    pub description: Option<String>,
    pub private: bool,
    pub owner: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitStats {
    pub additions: i64,
    pub deletions: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitFile {
    pub filename: String,
    pub status: String,
    pub additions: i64,
    pub deletions: i64,
    pub changes: i64,
    pub patch: Option<String>,
}

/// A commit as served to the frontend. `stats` and `files` are only present
/// when the full detail fetch succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct CommitDetail {
    pub id: String,
    pub message: String,
    pub author: String,
    pub date: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CommitStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<CommitFile>>,
}

/// The fields of a tracker issue that get mirrored to GitHub.
#[derive(Debug, Clone)]
pub struct IssueMirror {
    pub key: String,
    pub title: String,
    pub description: Option<String>,
    pub issue_type: String,
    pub priority: String,
}

impl IssueMirror {
    pub fn github_title(&self) -> String {
        format!("{}: {}", self.key, self.title)
    }

    pub fn github_body(&self) -> String {
        format!(
            "**Description:**\n{}\n\n**Type:** {}\n**Priority:** {}\n\n**Original Issue:** {}",
            self.description.as_deref().unwrap_or("No description"),
            self.issue_type,
            self.priority,
            self.key
        )
    }

    pub fn github_labels(&self) -> Vec<String> {
        if self.issue_type == "bug" {
            vec!["bug".to_string()]
        } else {
            Vec::new()
        }
    }
}

/// Result of mirroring an issue: where it landed on GitHub.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MirroredIssue {
    pub github_issue_url: String,
    pub github_issue_number: i64,
}

// Raw GitHub API shapes, deserialized then mapped.

#[derive(Debug, Deserialize)]
pub(crate) struct RepoResponse {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub private: bool,
    pub owner: OwnerResponse,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwnerResponse {
    pub login: String,
}

impl From<RepoResponse> for GitHubRepo {
    fn from(repo: RepoResponse) -> Self {
        GitHubRepo {
            id: repo.id,
            name: repo.name,
            full_name: repo.full_name,
            url: repo.html_url,
            description: repo.description,
            private: repo.private,
            owner: repo.owner.login,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitResponse {
    pub sha: String,
    pub html_url: String,
    pub commit: CommitInner,
    pub stats: Option<StatsResponse>,
    pub files: Option<Vec<FileResponse>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitInner {
    pub message: String,
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitAuthor {
    pub name: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsResponse {
    pub additions: i64,
    pub deletions: i64,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileResponse {
    pub filename: String,
    pub status: String,
    pub additions: i64,
    pub deletions: i64,
    pub changes: i64,
    pub patch: Option<String>,
}

impl CommitResponse {
    /// Maps the full detail shape, carrying stats and files when present.
    pub(crate) fn into_detail(self) -> CommitDetail {
        let author = self.commit.author.unwrap_or(CommitAuthor {
            name: None,
            date: None,
        });
        CommitDetail {
            id: self.sha,
            message: self.commit.message,
            author: author.name.unwrap_or_default(),
            date: author.date.unwrap_or_default(),
            url: self.html_url,
            stats: self.stats.map(|s| CommitStats {
                additions: s.additions,
                deletions: s.deletions,
                total: s.total,
            }),
            files: self.files.map(|files| {
                files
                    .into_iter()
                    .map(|f| CommitFile {
                        filename: f.filename,
                        status: f.status,
                        additions: f.additions,
                        deletions: f.deletions,
                        changes: f.changes,
                        patch: f.patch,
                    })
                    .collect()
            }),
        }
    }

    /// Maps a commit-list entry, which never carries stats or files.
    pub(crate) fn into_summary(self) -> CommitDetail {
        let mut detail = self.into_detail();
        detail.stats = None;
        detail.files = None;
        detail
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedIssueResponse {
    pub html_url: String,
    pub number: i64,
}
