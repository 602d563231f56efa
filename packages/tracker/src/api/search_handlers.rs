// ABOUTME: HTTP handler for cross-entity search over issues and projects

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use serde::{Deserialize, Serialize};

use crate::db::DbState;
use crate::issues::Issue;
use crate::projects::Project;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub search_type: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResults {
    pub issues: Vec<Issue>,
    pub projects: Vec<Project>,
}

pub async fn search(
    State(db): State<DbState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let query = params.q.unwrap_or_default();
    let search_type = params.search_type.as_deref().unwrap_or("all");

    let mut results = SearchResults {
        issues: Vec::new(),
        projects: Vec::new(),
    };

    if query.trim().is_empty() {
        return (StatusCode::OK, ResponseJson(results)).into_response();
    }

    if search_type == "all" || search_type == "issues" {
        results.issues = match db.issues.search_issues(&query).await {
            Ok(issues) => issues,
            Err(e) => return e.into_response(),
        };
    }

    if search_type == "all" || search_type == "projects" {
        results.projects = match db.projects.search_projects(&query).await {
            Ok(projects) => projects,
            Err(e) => return e.into_response(),
        };
    }

    (StatusCode::OK, ResponseJson(results)).into_response()
}
