// ABOUTME: HTTP handlers for work logs and the remaining-estimate aggregate

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use tracing::info;

use super::response::error_response;
use crate::auth::require_user;
use crate::db::DbState;
use crate::timetracking::TimeSpentInput;

pub async fn time_tracking_summary(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match db.time_tracking.summary(&id).await {
        Ok(summary) => (StatusCode::OK, ResponseJson(summary)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogTimeRequest {
    pub time_spent: Option<TimeSpentInput>,
    pub description: Option<String>,
}

pub async fn log_time(
    State(db): State<DbState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<LogTimeRequest>,
) -> impl IntoResponse {
    let user = match require_user(&db, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };
    let Some(time_spent) = request.time_spent else {
        return error_response(StatusCode::BAD_REQUEST, "Time spent is required");
    };

    info!("Logging time on issue: {}", id);

    match db
        .time_tracking
        .log_time(&id, &user.id, &time_spent, request.description.as_deref())
        .await
    {
        Ok(log) => (StatusCode::OK, ResponseJson(log)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub original_estimate: Option<i64>,
    pub remaining_estimate: Option<i64>,
}

pub async fn update_estimate(
    State(db): State<DbState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<EstimateRequest>,
) -> impl IntoResponse {
    if let Err(e) = require_user(&db, &headers).await {
        return e.into_response();
    }

    info!("Updating estimate for issue: {}", id);

    match db
        .time_tracking
        .set_estimate(&id, request.original_estimate, request.remaining_estimate)
        .await
    {
        Ok(estimate) => (StatusCode::OK, ResponseJson(estimate)).into_response(),
        Err(e) => e.into_response(),
    }
}
