// ABOUTME: HTTP handlers for attachment upload, listing, and removal
// ABOUTME: Payload bytes are written below the upload dir, rows record the public path

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json as ResponseJson},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::response::error_response;
use crate::attachments::stored_filename;
use crate::auth::require_user;
use crate::db::DbState;
use crate::storage::{self, StorageError};

pub async fn list_attachments(
    State(db): State<DbState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match db.attachments.list_for_issue(&id).await {
        Ok(attachments) => (StatusCode::OK, ResponseJson(attachments)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn upload_attachment(
    State(db): State<DbState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let user = match require_user(&db, &headers).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    let mut upload = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
        };
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("file").to_string();
        let mime_type = field.content_type().map(|m| m.to_string());
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
        };
        upload = Some((filename, mime_type, bytes));
        break;
    }

    let Some((filename, mime_type, bytes)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "No file provided");
    };

    let stored = stored_filename(&filename);
    let dir = storage::upload_dir();
    if let Err(e) = tokio::fs::create_dir_all(&dir).await {
        return StorageError::Io(e).into_response();
    }
    if let Err(e) = tokio::fs::write(dir.join(&stored), &bytes).await {
        return StorageError::Io(e).into_response();
    }

    info!("Stored attachment {} on issue {}", stored, id);

    match db
        .attachments
        .create_attachment(
            &id,
            &user.id,
            &filename,
            &format!("/uploads/{}", stored),
            bytes.len() as i64,
            mime_type.as_deref(),
        )
        .await
    {
        Ok(attachment) => (StatusCode::OK, ResponseJson(attachment)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAttachmentParams {
    pub attachment_id: Option<String>,
}

pub async fn delete_attachment(
    State(db): State<DbState>,
    Query(params): Query<DeleteAttachmentParams>,
) -> impl IntoResponse {
    let Some(attachment_id) = params.attachment_id.filter(|a| !a.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Attachment ID is required");
    };

    info!("Deleting attachment: {}", attachment_id);

    let attachment = match db.attachments.delete_attachment(&attachment_id).await {
        Ok(attachment) => attachment,
        Err(e) => return e.into_response(),
    };

    // The row is authoritative; a missing payload file only gets a warning.
    let disk_name = attachment.file_path.trim_start_matches("/uploads/");
    if let Err(e) = tokio::fs::remove_file(storage::upload_dir().join(disk_name)).await {
        warn!("Could not remove payload for {}: {}", attachment.id, e);
    }

    (StatusCode::OK, ResponseJson(json!({ "success": true }))).into_response()
}
