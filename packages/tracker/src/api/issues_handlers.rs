// ABOUTME: HTTP handlers for issue CRUD, the field-diffing update pipeline,
// ABOUTME: audit history, and bulk update/delete over id sets

use axum::{
    extract::{Path, State},
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
use crate::issues::{BulkUpdates, CreateIssueRequest, UpdateIssueRequest};

pub async fn list_issues(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("Listing issues for project: {}", id);

    match db.issues.list_for_project(&id).await {
        Ok(issues) => (StatusCode::OK, ResponseJson(issues)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create_issue(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<CreateIssueRequest>,
) -> impl IntoResponse {
    info!("Creating issue in project: {}", id);

    match db.issues.create_issue(&id, request).await {
        Ok(issue) => (StatusCode::OK, ResponseJson(issue)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_issue(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    match db.issues.get_issue(&id).await {
        Ok(issue) => (StatusCode::OK, ResponseJson(issue)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// The acting user comes from the session and feeds the audit trail and
/// assignment notifications.
pub async fn update_issue(
    State(db): State<DbState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<UpdateIssueRequest>,
) -> impl IntoResponse {
    let actor = match require_user(&db, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    info!("Updating issue: {}", id);

    match db.issues.apply_update(&id, request, &actor).await {
        Ok(issue) => (StatusCode::OK, ResponseJson(issue)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_issue(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("Deleting issue: {}", id);

    match db.issues.delete_issue(&id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn issue_history(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match db.history.list_for_issue(&id).await {
        Ok(history) => (StatusCode::OK, ResponseJson(history)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateRequest {
    pub issue_ids: Option<Vec<String>>,
    pub updates: Option<serde_json::Map<String, serde_json::Value>>,
}

pub async fn bulk_update(
    State(db): State<DbState>,
    Json(request): Json<BulkUpdateRequest>,
) -> impl IntoResponse {
    let issue_ids = request.issue_ids.unwrap_or_default();
    if issue_ids.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "issueIds array is required");
    }
    let updates = match request.updates {
        Some(updates) if !updates.is_empty() => updates,
        _ => return error_response(StatusCode::BAD_REQUEST, "updates object is required"),
    };
    let updates: BulkUpdates = match serde_json::from_value(serde_json::Value::Object(updates)) {
        Ok(updates) => updates,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    info!("Bulk updating {} issue(s)", issue_ids.len());

    match db.bulk.bulk_update(&issue_ids, updates).await {
        Ok(updated) => (
            StatusCode::OK,
            ResponseJson(json!({ "success": true, "updated": updated })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteRequest {
    pub issue_ids: Option<Vec<String>>,
}

pub async fn bulk_delete(
    State(db): State<DbState>,
    Json(request): Json<BulkDeleteRequest>,
) -> impl IntoResponse {
    let issue_ids = request.issue_ids.unwrap_or_default();

    info!("Bulk deleting {} issue(s)", issue_ids.len());

    match db.bulk.bulk_delete(&issue_ids).await {
        Ok(deleted) => (
            StatusCode::OK,
            ResponseJson(json!({ "success": true, "deleted": deleted })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
