// ABOUTME: Liveness endpoint probing the database before reporting healthy

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use serde_json::json;
use tracing::error;

use plank_tracker::api::response::error_response;
use plank_tracker::DbState;

/// GET /api/health
pub async fn health_check(State(db): State<DbState>) -> impl IntoResponse {
    if let Err(e) = sqlx::query("SELECT 1").execute(&db.pool).await {
        error!("Health probe failed: {}", e);
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "Database unavailable");
    }

    (
        StatusCode::OK,
        ResponseJson(json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
        .into_response()
}
