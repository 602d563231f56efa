// ABOUTME: API handlers for the GitHub integration
// ABOUTME: Endpoints for repo linking, repository/commit proxying, and issue mirroring

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use plank_github::{parse_repo_url, GitHubClient, GitHubError, IssueMirror};
use plank_tracker::api::response::error_response;
use plank_tracker::DbState;

fn env_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty())
}

/// A token supplied with the request wins over the environment.
fn resolve_token(provided: Option<String>) -> Option<String> {
    provided.filter(|t| !t.is_empty()).or_else(env_token)
}

/// Maps a client failure onto the wire. Upstream statuses pass through with
/// the route message, NotFound keeps its own message, the rest become 500.
fn github_error_response(err: GitHubError, message: &str) -> Response {
    warn!("{}: {}", message, err);
    match &err {
        GitHubError::NotFound(detail) => error_response(StatusCode::NOT_FOUND, detail.clone()),
        _ => match err.upstream_status() {
            Some(status) => error_response(
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            ),
            None => error_response(StatusCode::INTERNAL_SERVER_ERROR, message),
        },
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommitQuery {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoIdQuery {
    pub repo_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRepoRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub private: Option<bool>,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRepoRequest {
    pub repo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorIssueRequest {
    pub access_token: Option<String>,
}

/// GET /api/github/repos
/// Lists the token owner's repositories.
pub async fn list_repos(Query(query): Query<TokenQuery>) -> impl IntoResponse {
    let Some(token) = resolve_token(query.token) else {
        return error_response(StatusCode::BAD_REQUEST, "GitHub token is required");
    };

    let client = match GitHubClient::new(token) {
        Ok(client) => client,
        Err(e) => return github_error_response(e, "Failed to fetch repositories"),
    };
    match client.list_repos().await {
        Ok(repos) => (StatusCode::OK, ResponseJson(repos)).into_response(),
        Err(e) => github_error_response(e, "Failed to fetch repositories"),
    }
}

/// POST /api/github/repos
/// Creates a repository under the token owner's account.
pub async fn create_repo(Json(request): Json<CreateRepoRequest>) -> impl IntoResponse {
    let Some(name) = request.name.filter(|n| !n.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Repository name is required");
    };
    let Some(token) = resolve_token(request.token) else {
        return error_response(StatusCode::BAD_REQUEST, "GitHub token is required");
    };

    info!("Creating GitHub repository {}", name);

    let client = match GitHubClient::new(token) {
        Ok(client) => client,
        Err(e) => return github_error_response(e, "Failed to create repository"),
    };
    match client
        .create_repo(
            &name,
            request.description.as_deref(),
            request.private.unwrap_or(false),
        )
        .await
    {
        Ok(repo) => (StatusCode::OK, ResponseJson(repo)).into_response(),
        Err(e) => github_error_response(e, "Failed to create repository"),
    }
}

/// GET /api/github/repos/{owner}/{repo}/commits/latest
pub async fn latest_commit(
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<TokenQuery>,
) -> impl IntoResponse {
    let Some(token) = resolve_token(query.token) else {
        return error_response(StatusCode::BAD_REQUEST, "GitHub token is required");
    };

    let client = match GitHubClient::new(token) {
        Ok(client) => client,
        Err(e) => return github_error_response(e, "Failed to fetch latest commit"),
    };
    match client.latest_commit(&owner, &repo).await {
        Ok(commit) => (StatusCode::OK, ResponseJson(commit)).into_response(),
        Err(e) => github_error_response(e, "Failed to fetch latest commit"),
    }
}

/// GET /api/github/commit/{sha}
pub async fn get_commit(
    Path(sha): Path<String>,
    Query(query): Query<CommitQuery>,
) -> impl IntoResponse {
    let (Some(owner), Some(repo)) = (
        query.owner.filter(|o| !o.is_empty()),
        query.repo.filter(|r| !r.is_empty()),
    ) else {
        return error_response(StatusCode::BAD_REQUEST, "owner and repo are required");
    };
    let Some(token) = resolve_token(query.token) else {
        return error_response(StatusCode::BAD_REQUEST, "GitHub token is required");
    };

    let client = match GitHubClient::new(token) {
        Ok(client) => client,
        Err(e) => return github_error_response(e, "Failed to fetch commit from GitHub"),
    };
    match client.get_commit(&owner, &repo, &sha).await {
        Ok(commit) => (StatusCode::OK, ResponseJson(commit)).into_response(),
        Err(e) => github_error_response(e, "Failed to fetch commit from GitHub"),
    }
}

/// GET /api/projects/{id}/github
/// Repositories connected to the project.
pub async fn project_github_repos(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if let Err(e) = db.projects.get_project(&id).await {
        return e.into_response();
    }

    match db.integrations.list_github_repos(&id).await {
        Ok(repos) => {
            (StatusCode::OK, ResponseJson(json!({ "githubRepos": repos }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// POST /api/projects/{id}/github
/// Connects a repository by URL and remembers the env token for later
/// mirroring when the project has none stored yet.
pub async fn connect_github_repo(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<ConnectRepoRequest>,
) -> impl IntoResponse {
    let Some(repo_url) = request.repo_url.filter(|u| !u.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Repository URL is required");
    };
    let Ok((owner, repo)) = parse_repo_url(&repo_url) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid GitHub repository URL");
    };

    info!("Connecting {}/{} to project {}", owner, repo, id);

    let link = match db.integrations.add_github_repo(&id, &owner, &repo).await {
        Ok(link) => link,
        Err(e) => return e.into_response(),
    };

    if let Some(token) = env_token() {
        if let Err(e) = db
            .integrations
            .store_project_token_if_absent(&id, &token)
            .await
        {
            warn!("Failed to store GitHub token for project {}: {}", id, e);
        }
    }

    (StatusCode::OK, ResponseJson(link)).into_response()
}

/// DELETE /api/projects/{id}/github?repoId=
pub async fn disconnect_github_repo(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Query(query): Query<RepoIdQuery>,
) -> impl IntoResponse {
    let Some(repo_id) = query.repo_id.filter(|r| !r.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Repository ID is required");
    };

    info!("Disconnecting repository {} from project {}", repo_id, id);

    match db.integrations.remove_github_repo(&id, &repo_id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /api/issues/{id}/github?repoId=
/// Mirrors a tracker issue to one of the project's connected repositories.
pub async fn mirror_issue(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Query(query): Query<RepoIdQuery>,
    Json(request): Json<MirrorIssueRequest>,
) -> impl IntoResponse {
    let issue = match db.issues.get_issue(&id).await {
        Ok(issue) => issue,
        Err(e) => return e.into_response(),
    };

    let repos = match db.integrations.list_github_repos(&issue.project_id).await {
        Ok(repos) => repos,
        Err(e) => return e.into_response(),
    };
    if repos.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Project not connected to GitHub");
    }

    let selected = match &query.repo_id {
        Some(repo_id) => repos.iter().find(|r| &r.id == repo_id),
        None => repos.first(),
    };
    let Some(repo) = selected else {
        return error_response(StatusCode::NOT_FOUND, "Repository not found");
    };

    // Token precedence: request body, then the project row, then the env.
    let mut token = request.access_token.filter(|t| !t.is_empty());
    if token.is_none() {
        token = match db.integrations.get_project_token(&issue.project_id).await {
            Ok(stored) => stored,
            Err(e) => return e.into_response(),
        };
    }
    let Some(token) = token.or_else(env_token) else {
        return error_response(StatusCode::BAD_REQUEST, "GitHub token is required");
    };

    let mirror = IssueMirror {
        key: issue.key.clone(),
        title: issue.title.clone(),
        description: Some(issue.description.clone()).filter(|d| !d.is_empty()),
        issue_type: issue.issue_type.as_str().to_string(),
        priority: issue.priority.as_str().to_string(),
    };

    info!(
        "Mirroring issue {} to {}/{}",
        issue.key, repo.repo_owner, repo.repo_name
    );

    let client = match GitHubClient::new(token) {
        Ok(client) => client,
        Err(e) => return github_error_response(e, "Failed to create GitHub issue"),
    };
    match client
        .create_issue_mirror(&repo.repo_owner, &repo.repo_name, &mirror)
        .await
    {
        Ok(mirrored) => (
            StatusCode::OK,
            ResponseJson(json!({
                "success": true,
                "githubIssueUrl": mirrored.github_issue_url,
                "githubIssueNumber": mirrored.github_issue_number,
            })),
        )
            .into_response(),
        Err(e) => github_error_response(e, "Failed to create GitHub issue"),
    }
}
