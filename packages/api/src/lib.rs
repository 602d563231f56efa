// ABOUTME: HTTP API layer for Plank providing REST endpoints and routing
// ABOUTME: Integration layer that composes the tracker routers with the
// ABOUTME: GitHub/Vercel proxy handlers and the health endpoint

use axum::{
    routing::{delete, get, post},
    Router,
};

use plank_tracker::api::{
    create_auth_router, create_comments_router, create_filters_router, create_issues_router,
    create_labels_router, create_notifications_router, create_projects_router,
    create_reports_router, create_search_router, create_sprints_router, create_users_router,
};
use plank_tracker::DbState;

pub mod github_handlers;
pub mod health_handlers;
pub mod vercel_handlers;

/// Builds the full application router, every route under `/api`.
pub fn create_app(db: DbState) -> Router {
    let api = Router::new()
        .route("/health", get(health_handlers::health_check))
        .nest("/auth", create_auth_router())
        .nest("/users", create_users_router())
        .nest("/projects", create_projects_router())
        .nest("/issues", create_issues_router())
        .nest("/comments", create_comments_router())
        .nest("/notifications", create_notifications_router())
        .nest("/sprints", create_sprints_router())
        .nest("/labels", create_labels_router())
        .nest("/filters", create_filters_router())
        .nest("/search", create_search_router())
        .nest("/reports", create_reports_router())
        .merge(create_integrations_router());

    Router::new().nest("/api", api).with_state(db)
}

/// Routes that bridge tracker projects and issues to GitHub and Vercel,
/// plus the raw proxy endpoints the integration dialogs drive.
fn create_integrations_router() -> Router<DbState> {
    Router::new()
        .route(
            "/projects/{id}/github",
            get(github_handlers::project_github_repos),
        )
        .route(
            "/projects/{id}/github",
            post(github_handlers::connect_github_repo),
        )
        .route(
            "/projects/{id}/github",
            delete(github_handlers::disconnect_github_repo),
        )
        .route(
            "/projects/{id}/vercel",
            get(vercel_handlers::project_vercel_links),
        )
        .route(
            "/projects/{id}/vercel",
            post(vercel_handlers::connect_vercel_project),
        )
        .route(
            "/projects/{id}/vercel",
            delete(vercel_handlers::disconnect_vercel_project),
        )
        .route("/issues/{id}/github", post(github_handlers::mirror_issue))
        .route("/github/repos", get(github_handlers::list_repos))
        .route("/github/repos", post(github_handlers::create_repo))
        .route(
            "/github/repos/{owner}/{repo}/commits/latest",
            get(github_handlers::latest_commit),
        )
        .route("/github/commit/{sha}", get(github_handlers::get_commit))
        .route("/vercel/projects", get(vercel_handlers::list_projects))
        .route(
            "/vercel/projects/{id}/deployments",
            get(vercel_handlers::project_deployments),
        )
}
