use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::db::DbState;

pub mod attachments_handlers;
pub mod auth_handlers;
pub mod comments_handlers;
pub mod customfields_handlers;
pub mod filters_handlers;
pub mod issues_handlers;
pub mod labels_handlers;
pub mod links_handlers;
pub mod notifications_handlers;
pub mod projects_handlers;
pub mod releases_handlers;
pub mod reports_handlers;
pub mod response;
pub mod search_handlers;
pub mod sprints_handlers;
pub mod subtasks_handlers;
pub mod timetracking_handlers;
pub mod users_handlers;
pub mod votes_handlers;
pub mod watchers_handlers;

/// Creates the auth API router
pub fn create_auth_router() -> Router<DbState> {
    Router::new()
        .route("/login", post(auth_handlers::login))
        .route("/register", post(auth_handlers::register))
        .route("/logout", post(auth_handlers::logout))
        .route("/me", get(auth_handlers::me))
}

/// Creates the users API router
pub fn create_users_router() -> Router<DbState> {
    Router::new().route("/", get(users_handlers::list_users))
}

/// Creates the projects API router, including project-scoped planning routes
pub fn create_projects_router() -> Router<DbState> {
    Router::new()
        .route("/", get(projects_handlers::list_projects))
        .route("/", post(projects_handlers::create_project))
        .route("/{id}", get(projects_handlers::get_project))
        .route("/{id}", put(projects_handlers::update_project))
        .route("/{id}", delete(projects_handlers::delete_project))
        .route("/{id}/members", get(projects_handlers::list_members))
        .route("/{id}/issues", get(issues_handlers::list_issues))
        .route("/{id}/issues", post(issues_handlers::create_issue))
        .route("/{id}/sprints", get(sprints_handlers::list_sprints))
        .route("/{id}/sprints", post(sprints_handlers::create_sprint))
        .route("/{id}/releases", get(releases_handlers::list_releases))
        .route("/{id}/releases", post(releases_handlers::create_release))
        .route(
            "/{id}/custom-fields",
            get(customfields_handlers::list_custom_fields),
        )
        .route(
            "/{id}/custom-fields",
            post(customfields_handlers::create_custom_field),
        )
}

/// Creates the issues API router, covering the per-issue sub-resources
pub fn create_issues_router() -> Router<DbState> {
    Router::new()
        .route("/bulk", patch(issues_handlers::bulk_update))
        .route("/bulk", delete(issues_handlers::bulk_delete))
        .route("/{id}", get(issues_handlers::get_issue))
        .route("/{id}", patch(issues_handlers::update_issue))
        .route("/{id}", delete(issues_handlers::delete_issue))
        .route("/{id}/history", get(issues_handlers::issue_history))
        .route("/{id}/comments", get(comments_handlers::list_comments))
        .route("/{id}/comments", post(comments_handlers::create_comment))
        .route("/{id}/labels", get(labels_handlers::issue_labels))
        .route("/{id}/labels", post(labels_handlers::attach_label))
        .route("/{id}/labels", delete(labels_handlers::detach_label))
        .route("/{id}/subtasks", get(subtasks_handlers::list_subtasks))
        .route("/{id}/subtasks", post(subtasks_handlers::create_subtask))
        .route("/{id}/subtasks", patch(subtasks_handlers::update_subtask))
        .route("/{id}/subtasks", delete(subtasks_handlers::delete_subtask))
        .route(
            "/{id}/attachments",
            get(attachments_handlers::list_attachments),
        )
        .route(
            "/{id}/attachments",
            post(attachments_handlers::upload_attachment),
        )
        .route(
            "/{id}/attachments",
            delete(attachments_handlers::delete_attachment),
        )
        .route("/{id}/links", get(links_handlers::list_links))
        .route("/{id}/links", post(links_handlers::create_link))
        .route("/{id}/links/{link_id}", delete(links_handlers::delete_link))
        .route(
            "/{id}/time-tracking",
            get(timetracking_handlers::time_tracking_summary),
        )
        .route("/{id}/time-tracking", post(timetracking_handlers::log_time))
        .route(
            "/{id}/time-tracking",
            patch(timetracking_handlers::update_estimate),
        )
        .route("/{id}/votes", get(votes_handlers::vote_status))
        .route("/{id}/votes", post(votes_handlers::toggle_vote))
        .route("/{id}/watchers", get(watchers_handlers::list_watchers))
        .route("/{id}/watchers", post(watchers_handlers::add_watcher))
        .route("/{id}/watchers", delete(watchers_handlers::remove_watcher))
        .route(
            "/{id}/sprint",
            post(sprints_handlers::assign_issue_to_sprint),
        )
        .route(
            "/{id}/sprint",
            delete(sprints_handlers::remove_issue_from_sprint),
        )
        .route(
            "/{id}/custom-fields",
            get(customfields_handlers::issue_custom_field_values),
        )
        .route(
            "/{id}/custom-fields",
            post(customfields_handlers::set_issue_custom_field_value),
        )
}

/// Creates the comments API router for direct comment edits
pub fn create_comments_router() -> Router<DbState> {
    Router::new()
        .route("/{id}", patch(comments_handlers::update_comment))
        .route("/{id}", delete(comments_handlers::delete_comment))
}

/// Creates the notifications API router
pub fn create_notifications_router() -> Router<DbState> {
    Router::new()
        .route("/", get(notifications_handlers::list_notifications))
        .route("/", post(notifications_handlers::mark_all_read))
        .route("/{id}", patch(notifications_handlers::mark_read))
}

/// Creates the sprints API router for sprint-level reads and edits
pub fn create_sprints_router() -> Router<DbState> {
    Router::new()
        .route("/{id}", get(sprints_handlers::get_sprint))
        .route("/{id}", patch(sprints_handlers::update_sprint))
        .route("/{id}", delete(sprints_handlers::delete_sprint))
}

/// Creates the labels API router
pub fn create_labels_router() -> Router<DbState> {
    Router::new()
        .route("/", get(labels_handlers::list_labels))
        .route("/", post(labels_handlers::create_label))
}

/// Creates the saved filters API router
pub fn create_filters_router() -> Router<DbState> {
    Router::new()
        .route("/", get(filters_handlers::list_filters))
        .route("/", post(filters_handlers::create_filter))
        .route("/{id}", delete(filters_handlers::delete_filter))
}

/// Creates the search API router
pub fn create_search_router() -> Router<DbState> {
    Router::new().route("/", get(search_handlers::search))
}

/// Creates the reports API router
pub fn create_reports_router() -> Router<DbState> {
    Router::new().route("/", get(reports_handlers::report))
}
