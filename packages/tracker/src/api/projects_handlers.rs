// ABOUTME: HTTP handlers for project CRUD, membership, and the composed
// ABOUTME: detail view with members and connected external services

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::response::error_response;
use crate::auth::require_user;
use crate::db::DbState;
use crate::integrations::{GitHubRepoLink, VercelProjectLink};
use crate::projects::{Project, ProjectMember, UpdateProjectRequest};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub members: Vec<ProjectMember>,
    pub github_repos: Vec<GitHubRepoLink>,
    pub vercel_projects: Vec<VercelProjectLink>,
}

pub async fn list_projects(State(db): State<DbState>) -> impl IntoResponse {
    info!("Listing projects");

    match db.projects.list_projects().await {
        Ok(projects) => (StatusCode::OK, ResponseJson(projects)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
pub struct CreateProjectRequest {
    pub name: Option<String>,
    pub key: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
}

pub async fn create_project(
    State(db): State<DbState>,
    headers: HeaderMap,
    Json(request): Json<CreateProjectRequest>,
) -> impl IntoResponse {
    let user = match require_user(&db, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    let (name, key) = match (request.name, request.key) {
        (Some(name), Some(key)) if !name.is_empty() && !key.is_empty() => (name, key),
        _ => return error_response(StatusCode::BAD_REQUEST, "Name and key are required"),
    };

    info!("Creating project {} ({})", name, key);

    match db
        .projects
        .create_project(
            &name,
            &key,
            request.description.as_deref(),
            request.avatar.as_deref(),
            Some(&user.id),
        )
        .await
    {
        Ok(project) => (StatusCode::OK, ResponseJson(project)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_project(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("Getting project: {}", id);

    let project = match db.projects.get_project(&id).await {
        Ok(project) => project,
        Err(e) => return e.into_response(),
    };
    let members = match db.projects.list_members(&id).await {
        Ok(members) => members,
        Err(e) => return e.into_response(),
    };
    let github_repos = match db.integrations.list_github_repos(&id).await {
        Ok(repos) => repos,
        Err(e) => return e.into_response(),
    };
    let vercel_projects = match db.integrations.list_vercel_projects(&id).await {
        Ok(links) => links,
        Err(e) => return e.into_response(),
    };

    (
        StatusCode::OK,
        ResponseJson(ProjectDetail {
            project,
            members,
            github_repos,
            vercel_projects,
        }),
    )
        .into_response()
}

pub async fn update_project(
    State(db): State<DbState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<UpdateProjectRequest>,
) -> impl IntoResponse {
    if let Err(e) = require_user(&db, &headers).await {
        return e.into_response();
    }

    info!("Updating project: {}", id);

    match db.projects.update_project(&id, &request).await {
        Ok(project) => (StatusCode::OK, ResponseJson(project)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_project(
    State(db): State<DbState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Err(e) = require_user(&db, &headers).await {
        return e.into_response();
    }

    info!("Deleting project: {}", id);

    match db.projects.delete_project(&id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_members(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    match db.projects.list_members(&id).await {
        Ok(members) => (StatusCode::OK, ResponseJson(members)).into_response(),
        Err(e) => e.into_response(),
    }
}
