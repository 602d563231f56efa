// ABOUTME: HTTP handlers for custom field definitions and per-issue values

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

pub async fn list_custom_fields(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match db.custom_fields.list_for_project(&id).await {
        Ok(fields) => (StatusCode::OK, ResponseJson(fields)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomFieldRequest {
    pub name: Option<String>,
    pub field_type: Option<String>,
    pub options: Option<String>,
}

pub async fn create_custom_field(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<CreateCustomFieldRequest>,
) -> impl IntoResponse {
    let name = request.name.unwrap_or_default();

    info!("Creating custom field in project: {}", id);

    match db
        .custom_fields
        .create_field(
            &id,
            &name,
            request.field_type.as_deref(),
            request.options.as_deref(),
        )
        .await
    {
        Ok(field) => (StatusCode::OK, ResponseJson(field)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn issue_custom_field_values(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match db.custom_fields.values_for_issue(&id).await {
        Ok(values) => (StatusCode::OK, ResponseJson(values)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCustomFieldValueRequest {
    pub custom_field_id: Option<String>,
    pub value: Option<String>,
}

pub async fn set_issue_custom_field_value(
    State(db): State<DbState>,
    Path(id): Path<String>,
    Json(request): Json<SetCustomFieldValueRequest>,
) -> impl IntoResponse {
    let Some(custom_field_id) = request.custom_field_id.filter(|c| !c.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "customFieldId is required");
    };

    info!("Setting custom field {} on issue {}", custom_field_id, id);

    match db
        .custom_fields
        .set_value(&id, &custom_field_id, request.value.as_deref())
        .await
    {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}
