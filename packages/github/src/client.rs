// ABOUTME: GitHub REST API client: repository listing/creation, commit
// ABOUTME: lookups, and mirroring tracker issues as GitHub issues

use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{GitHubError, GitHubResult};
use crate::types::{
    CommitDetail, CommitResponse, CreatedIssueResponse, GitHubRepo, IssueMirror, MirroredIssue,
    RepoResponse,
};

const GITHUB_API_URL: &str = "https://api.github.com";
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

/// Client for the GitHub REST API, bound to one access token.
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>) -> GitHubResult<Self> {
        Self::with_base_url(token, GITHUB_API_URL)
    }

    /// Same as [`GitHubClient::new`] but against a different API origin.
    pub fn with_base_url(
        token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> GitHubResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GitHubError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Classic and fine-grained personal access tokens use the `token`
    /// scheme; anything else (OAuth, installation tokens) uses `Bearer`.
    fn auth_header(&self) -> String {
        if self.token.starts_with("ghp_") || self.token.starts_with("github_pat_") {
            format!("token {}", self.token)
        } else {
            format!("Bearer {}", self.token)
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .header("Authorization", self.auth_header())
            .header("Accept", ACCEPT_HEADER)
    }

    async fn check(response: reqwest::Response) -> GitHubResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        warn!("GitHub API returned {}: {}", status, message);
        Err(GitHubError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Lists the token user's repositories, most recently updated first.
    pub async fn list_repos(&self) -> GitHubResult<Vec<GitHubRepo>> {
        debug!("Listing GitHub repositories");

        let response = self
            .request(reqwest::Method::GET, "/user/repos?per_page=100&sort=updated")
            .send()
            .await
            .map_err(|e| GitHubError::Network(e.to_string()))?;
        let response = Self::check(response).await?;

        let repos: Vec<RepoResponse> = response
            .json()
            .await
            .map_err(|e| GitHubError::InvalidResponse(e.to_string()))?;
        Ok(repos.into_iter().map(GitHubRepo::from).collect())
    }

    /// Creates a repository under the token's user, initialized with a first
    /// commit so it can be cloned immediately.
    pub async fn create_repo(
        &self,
        name: &str,
        description: Option<&str>,
        private: bool,
    ) -> GitHubResult<GitHubRepo> {
        debug!("Creating GitHub repository {}", name);

        let response = self
            .request(reqwest::Method::POST, "/user/repos")
            .json(&json!({
                "name": name,
                "description": description.unwrap_or(""),
                "private": private,
                "auto_init": true,
            }))
            .send()
            .await
            .map_err(|e| GitHubError::Network(e.to_string()))?;
        let response = Self::check(response).await?;

        let repo: RepoResponse = response
            .json()
            .await
            .map_err(|e| GitHubError::InvalidResponse(e.to_string()))?;
        Ok(repo.into())
    }

    /// Fetches one commit with its stats and changed files.
    pub async fn get_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> GitHubResult<CommitDetail> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/repos/{}/{}/commits/{}", owner, repo, sha),
            )
            .send()
            .await
            .map_err(|e| GitHubError::Network(e.to_string()))?;
        let response = Self::check(response).await?;

        let commit: CommitResponse = response
            .json()
            .await
            .map_err(|e| GitHubError::InvalidResponse(e.to_string()))?;
        Ok(commit.into_detail())
    }

    /// Fetches the newest commit on the default branch. Lists one entry,
    /// then fetches its full detail; when the detail fetch fails the list
    /// entry is returned without stats or files.
    pub async fn latest_commit(&self, owner: &str, repo: &str) -> GitHubResult<CommitDetail> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/repos/{}/{}/commits?per_page=1", owner, repo),
            )
            .send()
            .await
            .map_err(|e| GitHubError::Network(e.to_string()))?;
        let response = Self::check(response).await?;

        let mut commits: Vec<CommitResponse> = response
            .json()
            .await
            .map_err(|e| GitHubError::InvalidResponse(e.to_string()))?;
        if commits.is_empty() {
            return Err(GitHubError::NotFound("No commits found".to_string()));
        }
        let latest = commits.remove(0);

        match self.get_commit(owner, repo, &latest.sha).await {
            Ok(detail) => Ok(detail),
            Err(e) => {
                warn!("Commit detail fetch failed, using list entry: {}", e);
                Ok(latest.into_summary())
            }
        }
    }

    /// Opens a GitHub issue mirroring a tracker issue.
    pub async fn create_issue_mirror(
        &self,
        owner: &str,
        repo: &str,
        mirror: &IssueMirror,
    ) -> GitHubResult<MirroredIssue> {
        debug!("Mirroring issue {} to {}/{}", mirror.key, owner, repo);

        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/repos/{}/{}/issues", owner, repo),
            )
            .json(&json!({
                "title": mirror.github_title(),
                "body": mirror.github_body(),
                "labels": mirror.github_labels(),
            }))
            .send()
            .await
            .map_err(|e| GitHubError::Network(e.to_string()))?;
        let response = Self::check(response).await?;

        let created: CreatedIssueResponse = response
            .json()
            .await
            .map_err(|e| GitHubError::InvalidResponse(e.to_string()))?;
        Ok(MirroredIssue {
            github_issue_url: created.html_url,
            github_issue_number: created.number,
        })
    }
}

/// Extracts `(owner, repo)` from a GitHub repository URL, tolerating a
/// trailing path and stripping a `.git` suffix.
pub fn parse_repo_url(url: &str) -> GitHubResult<(String, String)> {
    let pattern = Regex::new(r"^https?://github\.com/([^/]+)/([^/]+)")
        .map_err(|e| GitHubError::InvalidResponse(e.to_string()))?;
    let captures = pattern.captures(url).ok_or(GitHubError::InvalidRepoUrl)?;
    let owner = captures[1].to_string();
    let repo = captures[2].trim_end_matches(".git").to_string();
    if owner.is_empty() || repo.is_empty() {
        return Err(GitHubError::InvalidRepoUrl);
    }
    Ok((owner, repo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://github.com/plank-dev/plank", "plank-dev", "plank")]
    #[case("http://github.com/plank-dev/plank", "plank-dev", "plank")]
    #[case("https://github.com/plank-dev/plank.git", "plank-dev", "plank")]
    #[case("https://github.com/plank-dev/plank/tree/main/src", "plank-dev", "plank")]
    fn repo_urls_parse(#[case] url: &str, #[case] owner: &str, #[case] repo: &str) {
        let (parsed_owner, parsed_repo) = parse_repo_url(url).unwrap();
        assert_eq!(parsed_owner, owner);
        assert_eq!(parsed_repo, repo);
    }

    #[rstest]
    #[case("https://gitlab.com/plank-dev/plank")]
    #[case("github.com/plank-dev/plank")]
    #[case("https://github.com/plank-dev")]
    #[case("")]
    fn bad_repo_urls_are_rejected(#[case] url: &str) {
        assert!(matches!(
            parse_repo_url(url),
            Err(GitHubError::InvalidRepoUrl)
        ));
    }

    #[test]
    fn auth_scheme_follows_token_prefix() {
        let classic = GitHubClient::new("ghp_abc123").unwrap();
        assert_eq!(classic.auth_header(), "token ghp_abc123");

        let fine_grained = GitHubClient::new("github_pat_abc123").unwrap();
        assert_eq!(fine_grained.auth_header(), "token github_pat_abc123");

        let oauth = GitHubClient::new("gho_abc123").unwrap();
        assert_eq!(oauth.auth_header(), "Bearer gho_abc123");
    }

    #[test]
    fn mirror_body_includes_type_priority_and_back_reference() {
        let mirror = IssueMirror {
            key: "AP-7".to_string(),
            title: "Login crash".to_string(),
            description: Some("Crashes on submit".to_string()),
            issue_type: "bug".to_string(),
            priority: "high".to_string(),
        };
        assert_eq!(mirror.github_title(), "AP-7: Login crash");
        let body = mirror.github_body();
        assert!(body.contains("Crashes on submit"));
        assert!(body.contains("**Type:** bug"));
        assert!(body.contains("**Priority:** high"));
        assert!(body.contains("**Original Issue:** AP-7"));
        assert_eq!(mirror.github_labels(), vec!["bug".to_string()]);
    }

    #[test]
    fn mirror_without_description_uses_placeholder() {
        let mirror = IssueMirror {
            key: "AP-8".to_string(),
            title: "Polish".to_string(),
            description: None,
            issue_type: "task".to_string(),
            priority: "low".to_string(),
        };
        assert!(mirror.github_body().contains("No description"));
        assert!(mirror.github_labels().is_empty());
    }
}
