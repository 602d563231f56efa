// ABOUTME: HTTP handler for the overview and assignee report types

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use serde::Deserialize;

use super::response::error_response;
use crate::db::DbState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportParams {
    #[serde(rename = "type")]
    pub report_type: Option<String>,
    pub project_id: Option<String>,
}

pub async fn report(
    State(db): State<DbState>,
    Query(params): Query<ReportParams>,
) -> impl IntoResponse {
    let project_id = params.project_id.as_deref();

    match params.report_type.as_deref().unwrap_or("overview") {
        "overview" => match db.reports.overview(project_id).await {
            Ok(report) => (StatusCode::OK, ResponseJson(report)).into_response(),
            Err(e) => e.into_response(),
        },
        "assignee" => match db.reports.by_assignee(project_id).await {
            Ok(report) => (StatusCode::OK, ResponseJson(report)).into_response(),
            Err(e) => e.into_response(),
        },
        _ => error_response(StatusCode::BAD_REQUEST, "Invalid report type"),
    }
}
