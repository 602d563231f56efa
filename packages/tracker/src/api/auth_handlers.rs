// ABOUTME: HTTP handlers for login, logout, registration and session lookup

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json as ResponseJson},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::response::error_response;
use crate::auth::{
    clear_session_cookie, current_user, hash_password, session_cookie, session_id_from_headers,
    verify_password,
};
use crate::db::DbState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn login(State(db): State<DbState>, Json(request): Json<LoginRequest>) -> impl IntoResponse {
    let (email, password) = match (request.email, request.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => return error_response(StatusCode::BAD_REQUEST, "Missing required fields"),
    };

    info!("Login attempt for {}", email);

    let user = match db.users.get_user_by_email(&email).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };
    let user = match user {
        Some(user) if verify_password(&password, &user.password_hash) => user,
        _ => return error_response(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    };

    match db.sessions.create_session(&user.id).await {
        Ok(session) => (
            StatusCode::OK,
            [(header::SET_COOKIE, session_cookie(&session.id))],
            ResponseJson(json!({ "success": true, "user": user.summary() })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn register(
    State(db): State<DbState>,
    Json(request): Json<RegisterRequest>,
) -> impl IntoResponse {
    let (name, email, password) = match (request.name, request.email, request.password) {
        (Some(name), Some(email), Some(password))
            if !name.is_empty() && !email.is_empty() && !password.is_empty() =>
        {
            (name, email, password)
        }
        _ => return error_response(StatusCode::BAD_REQUEST, "Missing required fields"),
    };

    info!("Registering user {}", email);

    let user = match db
        .users
        .create_user(&name, &email, &hash_password(&password), None)
        .await
    {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    match db.sessions.create_session(&user.id).await {
        Ok(session) => (
            StatusCode::OK,
            [(header::SET_COOKIE, session_cookie(&session.id))],
            ResponseJson(json!({ "success": true, "user": user })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn logout(State(db): State<DbState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(session_id) = session_id_from_headers(&headers) {
        if let Err(e) = db.sessions.delete_session(&session_id).await {
            return e.into_response();
        }
    }

    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie())],
        ResponseJson(json!({ "success": true })),
    )
        .into_response()
}

pub async fn me(State(db): State<DbState>, headers: HeaderMap) -> impl IntoResponse {
    match current_user(&db, &headers).await {
        Ok(Some(user)) => (StatusCode::OK, ResponseJson(user)).into_response(),
        Ok(None) => error_response(StatusCode::UNAUTHORIZED, "Unauthorized"),
        Err(e) => e.into_response(),
    }
}
