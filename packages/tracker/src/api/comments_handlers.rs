// ABOUTME: HTTP handlers for issue comments and their notification fan-out

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::response::error_response;
use crate::db::DbState;

pub async fn list_comments(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    match db.comments.list_for_issue(&id).await {
        Ok(comments) => (StatusCode::OK, ResponseJson(comments)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: Option<String>,
    pub user_id: Option<String>,
}

pub async fn create_comment(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<CreateCommentRequest>,
) -> impl IntoResponse {
    let Some(user_id) = request.user_id.filter(|u| !u.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "User ID is required");
    };
    let content = request.content.unwrap_or_default();

    info!("Creating comment on issue: {}", id);

    match db.comments.create_comment(&id, &user_id, &content).await {
        Ok(comment) => (StatusCode::OK, ResponseJson(comment)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
pub struct UpdateCommentRequest {
    pub content: Option<String>,
}

pub async fn update_comment(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCommentRequest>,
) -> impl IntoResponse {
    info!("Updating comment: {}", id);

    let content = request.content.unwrap_or_default();
    match db.comments.update_comment(&id, &content).await {
        Ok(comment) => (StatusCode::OK, ResponseJson(comment)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_comment(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("Deleting comment: {}", id);

    match db.comments.delete_comment(&id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}
