// ABOUTME: Common test utilities for integration tests
// ABOUTME: Boots the full router stack over an in-memory database

use axum::Router;
use plank_tracker::api::{
    create_auth_router, create_comments_router, create_filters_router, create_issues_router,
    create_labels_router, create_notifications_router, create_projects_router,
    create_reports_router, create_search_router, create_sprints_router, create_users_router,
};
use plank_tracker::DbState;
use serde_json::{json, Value};

/// Test context carrying the server URL, direct database access, and a
/// cookie-holding client so session flows work across requests.
pub struct TestContext {
    pub base_url: String,
    pub db: DbState,
    pub client: reqwest::Client,
}

/// Create a test server with an isolated database and every router mounted.
pub async fn setup_test_server() -> TestContext {
    let db = DbState::init_in_memory()
        .await
        .expect("Failed to initialize in-memory database");

    let app = Router::new()
        .nest("/api/auth", create_auth_router())
        .nest("/api/users", create_users_router())
        .nest("/api/projects", create_projects_router())
        .nest("/api/issues", create_issues_router())
        .nest("/api/comments", create_comments_router())
        .nest("/api/notifications", create_notifications_router())
        .nest("/api/sprints", create_sprints_router())
        .nest("/api/labels", create_labels_router())
        .nest("/api/filters", create_filters_router())
        .nest("/api/search", create_search_router())
        .nest("/api/reports", create_reports_router())
        .with_state(db.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to build HTTP client");

    TestContext {
        base_url,
        db,
        client,
    }
}

impl TestContext {
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Failed to make GET request")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .expect("Failed to make POST request")
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .put(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .expect("Failed to make PUT request")
    }

    pub async fn patch_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .patch(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .expect("Failed to make PATCH request")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.client
            .delete(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("Failed to make DELETE request")
    }

    /// Register a fresh account. The session cookie lands in the client jar,
    /// so subsequent requests act as this user. Returns the user object.
    pub async fn register(&self, name: &str, email: &str) -> Value {
        let response = self
            .post_json(
                "/api/auth/register",
                &json!({ "name": name, "email": email, "password": "hunter2" }),
            )
            .await;
        assert_eq!(response.status(), 200, "registration should succeed");
        let body: Value = response.json().await.unwrap();
        body["user"].clone()
    }

    /// Create a project through the API. Requires a registered session.
    pub async fn create_project(&self, name: &str, key: &str) -> Value {
        let response = self
            .post_json("/api/projects", &json!({ "name": name, "key": key }))
            .await;
        assert_eq!(response.status(), 200, "project creation should succeed");
        response.json().await.unwrap()
    }

    /// Create an issue under a project, reported by `reporter_id`.
    pub async fn create_issue(&self, project_id: &str, reporter_id: &str, title: &str) -> Value {
        let response = self
            .post_json(
                &format!("/api/projects/{}/issues", project_id),
                &json!({ "title": title, "reporterId": reporter_id }),
            )
            .await;
        assert_eq!(response.status(), 200, "issue creation should succeed");
        response.json().await.unwrap()
    }
}

/// Parse a response body as JSON.
pub async fn body_json(response: reqwest::Response) -> Value {
    response.json().await.expect("response body should be JSON")
}
