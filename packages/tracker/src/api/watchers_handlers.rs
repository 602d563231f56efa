// ABOUTME: HTTP handlers for issue watcher membership

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

pub async fn list_watchers(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    match db.watchers.list_watchers(&id).await {
        Ok(watchers) => (StatusCode::OK, ResponseJson(watchers)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWatcherRequest {
    pub user_id: Option<String>,
}

pub async fn add_watcher(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<AddWatcherRequest>,
) -> impl IntoResponse {
    let Some(user_id) = request.user_id.filter(|u| !u.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "userId is required");
    };

    info!("Adding watcher {} to issue {}", user_id, id);

    match db.watchers.add_watcher(&id, &user_id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveWatcherParams {
    pub user_id: Option<String>,
}

pub async fn remove_watcher(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Query(params): Query<RemoveWatcherParams>,
) -> impl IntoResponse {
    let Some(user_id) = params.user_id.filter(|u| !u.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "userId is required");
    };

    info!("Removing watcher {} from issue {}", user_id, id);

    match db.watchers.remove_watcher(&id, &user_id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}
