// ABOUTME: HTTP handlers for label management and issue label assignment

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::response::error_response;
use crate::auth::require_user;
use crate::db::DbState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLabelsParams {
    pub project_id: Option<String>,
}

pub async fn list_labels(
    State(db): State<DbState>,
    Query(params): Query<ListLabelsParams>,
) -> impl IntoResponse {
    match db.labels.list(params.project_id.as_deref()).await {
        Ok(labels) => (StatusCode::OK, ResponseJson(labels)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLabelRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub project_id: Option<String>,
}

pub async fn create_label(
    State(db): State<DbState>,
    headers: HeaderMap,
    Json(request): Json<CreateLabelRequest>,
) -> impl IntoResponse {
    if let Err(e) = require_user(&db, &headers).await {
        return e.into_response();
    }

    let Some(name) = request.name.filter(|n| !n.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Name is required");
    };

    info!("Creating label: {}", name);

    match db
        .labels
        .create_label(
            request.project_id.as_deref(),
            &name,
            request.color.as_deref(),
        )
        .await
    {
        Ok(label) => (StatusCode::OK, ResponseJson(label)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn issue_labels(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    match db.labels.labels_for_issue(&id).await {
        Ok(labels) => (StatusCode::OK, ResponseJson(labels)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachLabelRequest {
    pub label_id: Option<String>,
}

pub async fn attach_label(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<AttachLabelRequest>,
) -> impl IntoResponse {
    let Some(label_id) = request.label_id.filter(|l| !l.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Label ID is required");
    };

    info!("Attaching label {} to issue {}", label_id, id);

    match db.labels.attach(&id, &label_id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetachLabelParams {
    pub label_id: Option<String>,
}

pub async fn detach_label(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Query(params): Query<DetachLabelParams>,
) -> impl IntoResponse {
    let Some(label_id) = params.label_id.filter(|l| !l.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Label ID is required");
    };

    info!("Detaching label {} from issue {}", label_id, id);

    match db.labels.detach(&id, &label_id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}
