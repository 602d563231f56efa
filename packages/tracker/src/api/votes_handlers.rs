// ABOUTME: HTTP handlers for the per-issue vote toggle

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json as ResponseJson},
};
use tracing::info;

use crate::auth::{current_user, require_user};
use crate::db::DbState;

pub async fn vote_status(
    State(db): State<DbState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user = match current_user(&db, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    match db
        .votes
        .status(&id, user.as_ref().map(|u| u.id.as_str()))
        .await
    {
        Ok(status) => (StatusCode::OK, ResponseJson(status)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn toggle_vote(
    State(db): State<DbState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user = match require_user(&db, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    info!("Toggling vote on issue {} by {}", id, user.id);

    match db.votes.toggle_vote(&id, &user.id).await {
        Ok(status) => (StatusCode::OK, ResponseJson(status)).into_response(),
        Err(e) => e.into_response(),
    }
}
