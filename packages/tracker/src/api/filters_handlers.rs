// ABOUTME: HTTP handlers for per-user saved search filters

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::require_user;
use crate::db::DbState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFiltersParams {
    pub project_id: Option<String>,
}

pub async fn list_filters(
    State(db): State<DbState>,
    headers: HeaderMap,
    Query(params): Query<ListFiltersParams>,
) -> impl IntoResponse {
    let user = match require_user(&db, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    match db
        .filters
        .list_for_user(&user.id, params.project_id.as_deref())
        .await
    {
        Ok(filters) => (StatusCode::OK, ResponseJson(filters)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFilterRequest {
    pub name: Option<String>,
    pub project_id: Option<String>,
    pub filters: Option<Value>,
}

pub async fn create_filter(
    State(db): State<DbState>,
    headers: HeaderMap,
    Json(request): Json<CreateFilterRequest>,
) -> impl IntoResponse {
    let user = match require_user(&db, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    let name = request.name.unwrap_or_default();
    let criteria = request.filters.unwrap_or_else(|| json!({}));

    info!("Saving filter '{}' for user {}", name, user.id);

    match db
        .filters
        .create_filter(&user.id, request.project_id.as_deref(), &name, &criteria)
        .await
    {
        Ok(filter) => (StatusCode::OK, ResponseJson(filter)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_filter(
    State(db): State<DbState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user = match require_user(&db, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    info!("Deleting saved filter: {}", id);

    match db.filters.delete_filter(&id, &user.id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}
