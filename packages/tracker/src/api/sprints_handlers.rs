// ABOUTME: HTTP handlers for sprint lifecycle and issue-to-sprint assignment

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::response::error_response;
use crate::db::DbState;
use crate::issues::Issue;
use crate::sprints::{CreateSprintRequest, Sprint, UpdateSprintRequest};

pub async fn list_sprints(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    match db.sprints.list_for_project(&id).await {
        Ok(sprints) => (StatusCode::OK, ResponseJson(sprints)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn create_sprint(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<CreateSprintRequest>,
) -> impl IntoResponse {
    info!("Creating sprint in project: {}", id);

    match db.sprints.create_sprint(&id, request).await {
        Ok(sprint) => (StatusCode::OK, ResponseJson(sprint)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Serialize)]
pub struct SprintDetail {
    #[serde(flatten)]
    pub sprint: Sprint,
    pub issues: Vec<Issue>,
}

pub async fn get_sprint(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    let sprint = match db.sprints.get_sprint(&id).await {
        Ok(sprint) => sprint,
        Err(e) => return e.into_response(),
    };
    match db.issues.list_for_sprint(&id).await {
        Ok(issues) => {
            (StatusCode::OK, ResponseJson(SprintDetail { sprint, issues })).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn update_sprint(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateSprintRequest>,
) -> impl IntoResponse {
    info!("Updating sprint: {}", id);

    match db.sprints.update_sprint(&id, &request).await {
        Ok(sprint) => (StatusCode::OK, ResponseJson(sprint)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_sprint(State(db): State<DbState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("Deleting sprint: {}", id);

    match db.sprints.delete_sprint(&id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignSprintRequest {
    pub sprint_id: Option<String>,
}

pub async fn assign_issue_to_sprint(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<AssignSprintRequest>,
) -> impl IntoResponse {
    let Some(sprint_id) = request.sprint_id.filter(|s| !s.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "sprintId is required");
    };

    info!("Assigning issue {} to sprint {}", id, sprint_id);

    match db.sprints.assign_issue(&id, &sprint_id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveSprintParams {
    pub sprint_id: Option<String>,
}

pub async fn remove_issue_from_sprint(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Query(params): Query<RemoveSprintParams>,
) -> impl IntoResponse {
    let Some(sprint_id) = params.sprint_id.filter(|s| !s.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "sprintId is required");
    };

    info!("Removing issue {} from sprint {}", id, sprint_id);

    match db.sprints.remove_issue(&id, &sprint_id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}
