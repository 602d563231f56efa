// ABOUTME: HTTP handlers for the per-user notification feed

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json as ResponseJson},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::auth::require_user;
use crate::db::DbState;

#[derive(Deserialize)]
pub struct NotificationParams {
    #[serde(rename = "unreadOnly")]
    pub unread_only: Option<String>,
}

pub async fn list_notifications(
    State(db): State<DbState>,
    Query(params): Query<NotificationParams>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user = match require_user(&db, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };
    let unread_only = params.unread_only.as_deref() == Some("true");

    match db.notifications.list_for_user(&user.id, unread_only).await {
        Ok(notifications) => (StatusCode::OK, ResponseJson(notifications)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn mark_all_read(State(db): State<DbState>, headers: HeaderMap) -> impl IntoResponse {
    let user = match require_user(&db, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    info!("Marking all notifications read for {}", user.id);

    match db.notifications.mark_all_read(&user.id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn mark_read(
    State(db): State<DbState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user = match require_user(&db, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    match db.notifications.mark_read(&id, &user.id).await {
        Ok(()) => (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response(),
        Err(e) => e.into_response(),
    }
}
