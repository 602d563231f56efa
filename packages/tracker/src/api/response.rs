// ABOUTME: Shared API error body and status mapping
// ABOUTME: Converts storage errors into `{"error": ...}` JSON responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use serde::Serialize;
use tracing::error;

use crate::storage::StorageError;

/// Wire shape for every failed request.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        ResponseJson(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for StorageError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            StorageError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            StorageError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            StorageError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            StorageError::Conflict(_) => (StatusCode::CONFLICT, self.to_string()),
            StorageError::Database(_) | StorageError::Sqlx(_) | StorageError::Migration(_) => {
                error!("Storage error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            StorageError::Io(_) | StorageError::Json(_) => {
                error!("Storage error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        error_response(status, message)
    }
}
