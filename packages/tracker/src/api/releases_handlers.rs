// ABOUTME: HTTP handlers for project release versions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use tracing::info;

use crate::db::DbState;
use crate::releases::CreateReleaseRequest;

pub async fn list_releases(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    match db.releases.list_for_project(&id).await {
        Ok(releases) => (StatusCode::OK, ResponseJson(releases)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create_release(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<CreateReleaseRequest>,
) -> impl IntoResponse {
    info!("Creating release in project: {}", id);

    match db.releases.create_release(&id, request).await {
        Ok(release) => (StatusCode::OK, ResponseJson(release)).into_response(),
        Err(e) => e.into_response(),
    }
}
