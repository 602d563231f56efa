// ABOUTME: API handlers for the Vercel integration
// ABOUTME: Endpoints for project linking and the projects/deployments proxy

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use plank_tracker::api::response::error_response;
use plank_tracker::DbState;
use plank_vercel::{VercelClient, VercelError};

fn env_token() -> Option<String> {
    std::env::var("VERCEL_TOKEN").ok().filter(|t| !t.is_empty())
}

fn env_team_id() -> Option<String> {
    std::env::var("VERCEL_TEAM_ID").ok().filter(|t| !t.is_empty())
}

/// A token supplied with the request wins over the environment.
fn resolve_token(provided: Option<String>) -> Option<String> {
    provided.filter(|t| !t.is_empty()).or_else(env_token)
}

/// Upstream statuses pass through with the route message, the rest become 500.
fn vercel_error_response(err: VercelError, message: &str) -> Response {
    warn!("{}: {}", message, err);
    match err.upstream_status() {
        Some(status) => error_response(
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            message,
        ),
        None => error_response(StatusCode::INTERNAL_SERVER_ERROR, message),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelQuery {
    pub token: Option<String>,
    pub team_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectVercelRequest {
    pub vercel_project_id: Option<String>,
    pub vercel_project_name: Option<String>,
    pub vercel_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelLinkQuery {
    pub vercel_project_id: Option<String>,
}

/// GET /api/vercel/projects
pub async fn list_projects(Query(query): Query<VercelQuery>) -> impl IntoResponse {
    let Some(token) = resolve_token(query.token) else {
        return error_response(StatusCode::BAD_REQUEST, "Vercel token is required");
    };
    let team_id = query.team_id.filter(|t| !t.is_empty()).or_else(env_team_id);

    let client = match VercelClient::new(token, team_id) {
        Ok(client) => client,
        Err(e) => return vercel_error_response(e, "Failed to fetch Vercel projects"),
    };
    match client.list_projects().await {
        Ok(projects) => (StatusCode::OK, ResponseJson(projects)).into_response(),
        Err(e) => vercel_error_response(e, "Failed to fetch Vercel projects"),
    }
}

/// GET /api/vercel/projects/{id}/deployments
/// Project summary, recent deployments, and every known domain in one payload.
pub async fn project_deployments(
    Path(id): Path<String>,
    Query(query): Query<VercelQuery>,
) -> impl IntoResponse {
    let Some(token) = resolve_token(query.token) else {
        return error_response(StatusCode::BAD_REQUEST, "Vercel token is required");
    };
    let team_id = query.team_id.filter(|t| !t.is_empty()).or_else(env_team_id);

    let client = match VercelClient::new(token, team_id) {
        Ok(client) => client,
        Err(e) => return vercel_error_response(e, "Failed to fetch deployments"),
    };
    match client.deployment_overview(&id).await {
        Ok(overview) => (StatusCode::OK, ResponseJson(overview)).into_response(),
        // Only the project fetch can fail the overview; the other calls degrade.
        Err(e) => match e.upstream_status() {
            Some(_) => vercel_error_response(e, "Failed to fetch project"),
            None => vercel_error_response(e, "Failed to fetch deployments"),
        },
    }
}

/// GET /api/projects/{id}/vercel
/// Vercel projects connected to the tracker project.
pub async fn project_vercel_links(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if let Err(e) = db.projects.get_project(&id).await {
        return e.into_response();
    }

    match db.integrations.list_vercel_projects(&id).await {
        Ok(links) => (
            StatusCode::OK,
            ResponseJson(json!({ "vercelProjects": links })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /api/projects/{id}/vercel
pub async fn connect_vercel_project(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<ConnectVercelRequest>,
) -> impl IntoResponse {
    let (Some(vercel_project_id), Some(vercel_project_name)) = (
        request.vercel_project_id.filter(|v| !v.is_empty()),
        request.vercel_project_name.filter(|v| !v.is_empty()),
    ) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Vercel project ID and name are required",
        );
    };

    info!(
        "Connecting Vercel project {} to project {}",
        vercel_project_id, id
    );

    match db
        .integrations
        .add_vercel_project(
            &id,
            &vercel_project_id,
            &vercel_project_name,
            env_team_id().as_deref(),
            request.vercel_url.as_deref(),
        )
        .await
    {
        Ok(link) => (StatusCode::OK, ResponseJson(link)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// DELETE /api/projects/{id}/vercel?vercelProjectId=
pub async fn disconnect_vercel_project(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Query(query): Query<VercelLinkQuery>,
) -> impl IntoResponse {
    let Some(vercel_project_id) = query.vercel_project_id.filter(|v| !v.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Vercel project ID is required");
    };

    info!(
        "Disconnecting Vercel project {} from project {}",
        vercel_project_id, id
    );

    match db
        .integrations
        .remove_vercel_project(&id, &vercel_project_id)
        .await
    {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}
