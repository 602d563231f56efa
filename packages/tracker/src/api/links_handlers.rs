// ABOUTME: HTTP handlers for typed links between issues

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

pub async fn list_links(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    match db.links.list_for_issue(&id).await {
        Ok(links) => (StatusCode::OK, ResponseJson(links)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    pub target_issue_id: Option<String>,
    pub link_type: Option<String>,
}

pub async fn create_link(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<CreateLinkRequest>,
) -> impl IntoResponse {
    let Some(target_issue_id) = request.target_issue_id.filter(|t| !t.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Target issue ID is required");
    };
    let link_type = request.link_type.as_deref().unwrap_or("relates");

    info!("Linking issue {} -> {} ({})", id, target_issue_id, link_type);

    match db.links.create_link(&id, &target_issue_id, link_type).await {
        Ok(link) => (StatusCode::OK, ResponseJson(link)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_link(
    State(db): State<DbState>,
    Path((_id, link_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("Deleting issue link: {}", link_id);

    match db.links.delete_link(&link_id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}
