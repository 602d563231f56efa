// ABOUTME: HTTP handlers for subtasks nested under a parent issue

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::response::error_response;
use crate::db::DbState;
use crate::subtasks::UpdateSubtaskRequest;

pub async fn list_subtasks(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    match db.subtasks.list_for_issue(&id).await {
        Ok(subtasks) => (StatusCode::OK, ResponseJson(subtasks)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
pub struct CreateSubtaskRequest {
    pub title: Option<String>,
}

pub async fn create_subtask(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<CreateSubtaskRequest>,
) -> impl IntoResponse {
    let Some(title) = request.title.filter(|t| !t.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Title is required");
    };

    info!("Creating subtask on issue: {}", id);

    match db.subtasks.create_subtask(&id, &title).await {
        Ok(subtask) => (StatusCode::OK, ResponseJson(subtask)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchSubtaskRequest {
    pub subtask_id: Option<String>,
    #[serde(flatten)]
    pub updates: UpdateSubtaskRequest,
}

pub async fn update_subtask(
    State(db): State<DbState>,
    Json(request): Json<PatchSubtaskRequest>,
) -> impl IntoResponse {
    let Some(subtask_id) = request.subtask_id.filter(|s| !s.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Subtask ID is required");
    };

    info!("Updating subtask: {}", subtask_id);

    match db.subtasks.update_subtask(&subtask_id, &request.updates).await {
        Ok(subtask) => (StatusCode::OK, ResponseJson(subtask)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSubtaskParams {
    pub subtask_id: Option<String>,
}

pub async fn delete_subtask(
    State(db): State<DbState>,
    Query(params): Query<DeleteSubtaskParams>,
) -> impl IntoResponse {
    let Some(subtask_id) = params.subtask_id.filter(|s| !s.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Subtask ID is required");
    };

    info!("Deleting subtask: {}", subtask_id);

    match db.subtasks.delete_subtask(&subtask_id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}
