// ABOUTME: HTTP handlers for user listing

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use tracing::info;

use crate::db::DbState;

pub async fn list_users(State(db): State<DbState>) -> impl IntoResponse {
    info!("Listing users");

    match db.users.list_users().await {
        Ok(users) => (StatusCode::OK, ResponseJson(users)).into_response(),
        Err(e) => e.into_response(),
    }
}
