// ABOUTME: Wiremock-backed tests for the GitHub client: auth header
// ABOUTME: selection, field mapping, and the latest-commit fallback

use plank_github::{GitHubClient, GitHubError, IssueMirror};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn repo_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("plank-dev/{}", name),
        "html_url": format!("https://github.com/plank-dev/{}", name),
        "description": "A repo",
        "private": false,
        "owner": { "login": "plank-dev" }
    })
}

#[tokio::test]
async fn test_personal_access_token_uses_token_scheme() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(header("Authorization", "token ghp_secret"))
        .and(query_param("per_page", "100"))
        .and(query_param("sort", "updated"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([repo_json(1, "plank")])))
        .mount(&server)
        .await;

    let client = GitHubClient::with_base_url("ghp_secret", server.uri()).unwrap();
    let repos = client.list_repos().await.unwrap();

    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].name, "plank");
    assert_eq!(repos[0].full_name, "plank-dev/plank");
    assert_eq!(repos[0].owner, "plank-dev");
    assert_eq!(repos[0].url, "https://github.com/plank-dev/plank");
}

#[tokio::test]
async fn test_other_tokens_use_bearer_scheme() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(header("Authorization", "Bearer gho_oauth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = GitHubClient::with_base_url("gho_oauth", server.uri()).unwrap();
    let repos = client.list_repos().await.unwrap();
    assert!(repos.is_empty());
}

#[tokio::test]
async fn test_accept_header_requests_v3_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .and(header("Accept", "application/vnd.github.v3+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = GitHubClient::with_base_url("ghp_x", server.uri()).unwrap();
    client.list_repos().await.unwrap();
}

#[tokio::test]
async fn test_create_repo_sends_auto_init() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/repos"))
        .and(body_partial_json(json!({
            "name": "plank-site",
            "auto_init": true,
            "private": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(repo_json(7, "plank-site")))
        .mount(&server)
        .await;

    let client = GitHubClient::with_base_url("ghp_x", server.uri()).unwrap();
    let repo = client
        .create_repo("plank-site", Some("The site"), true)
        .await
        .unwrap();
    assert_eq!(repo.id, 7);
    assert_eq!(repo.name, "plank-site");
}

#[tokio::test]
async fn test_upstream_error_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/repos"))
        .respond_with(ResponseTemplate::new(403).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = GitHubClient::with_base_url("ghp_x", server.uri()).unwrap();
    let err = client.list_repos().await.unwrap_err();
    assert_eq!(err.upstream_status(), Some(403));
    match err {
        GitHubError::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "rate limited");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_commit_parses_stats_and_files() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/plank-dev/plank/commits/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": "abc123",
            "html_url": "https://github.com/plank-dev/plank/commit/abc123",
            "commit": {
                "message": "Fix the build",
                "author": { "name": "Ada", "date": "2025-06-01T12:00:00Z" }
            },
            "stats": { "additions": 10, "deletions": 2, "total": 12 },
            "files": [{
                "filename": "src/lib.rs",
                "status": "modified",
                "additions": 10,
                "deletions": 2,
                "changes": 12,
                "patch": "@@ -1 +1 @@"
            }]
        })))
        .mount(&server)
        .await;

    let client = GitHubClient::with_base_url("ghp_x", server.uri()).unwrap();
    let commit = client
        .get_commit("plank-dev", "plank", "abc123")
        .await
        .unwrap();

    assert_eq!(commit.id, "abc123");
    assert_eq!(commit.message, "Fix the build");
    assert_eq!(commit.author, "Ada");
    let stats = commit.stats.unwrap();
    assert_eq!(stats.total, 12);
    let files = commit.files.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].filename, "src/lib.rs");
}

#[tokio::test]
async fn test_latest_commit_fetches_detail_for_newest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/plank-dev/plank/commits"))
        .and(query_param("per_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "sha": "abc123",
            "html_url": "https://github.com/plank-dev/plank/commit/abc123",
            "commit": { "message": "Fix", "author": { "name": "Ada", "date": "2025-06-01T12:00:00Z" } }
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/plank-dev/plank/commits/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": "abc123",
            "html_url": "https://github.com/plank-dev/plank/commit/abc123",
            "commit": { "message": "Fix", "author": { "name": "Ada", "date": "2025-06-01T12:00:00Z" } },
            "stats": { "additions": 1, "deletions": 1, "total": 2 }
        })))
        .mount(&server)
        .await;

    let client = GitHubClient::with_base_url("ghp_x", server.uri()).unwrap();
    let commit = client.latest_commit("plank-dev", "plank").await.unwrap();
    assert_eq!(commit.id, "abc123");
    assert!(commit.stats.is_some());
}

#[tokio::test]
async fn test_latest_commit_degrades_when_detail_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/plank-dev/plank/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "sha": "abc123",
            "html_url": "https://github.com/plank-dev/plank/commit/abc123",
            "commit": { "message": "Fix", "author": { "name": "Ada", "date": "2025-06-01T12:00:00Z" } }
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/plank-dev/plank/commits/abc123"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = GitHubClient::with_base_url("ghp_x", server.uri()).unwrap();
    let commit = client.latest_commit("plank-dev", "plank").await.unwrap();
    assert_eq!(commit.id, "abc123");
    assert_eq!(commit.message, "Fix");
    assert!(commit.stats.is_none());
    assert!(commit.files.is_none());
}

#[tokio::test]
async fn test_latest_commit_on_empty_repo_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/plank-dev/empty/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = GitHubClient::with_base_url("ghp_x", server.uri()).unwrap();
    let err = client.latest_commit("plank-dev", "empty").await.unwrap_err();
    assert!(matches!(err, GitHubError::NotFound(message) if message == "No commits found"));
}

#[tokio::test]
async fn test_issue_mirror_posts_title_body_and_labels() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/plank-dev/plank/issues"))
        .and(body_partial_json(json!({
            "title": "AP-7: Login crash",
            "labels": ["bug"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "html_url": "https://github.com/plank-dev/plank/issues/42",
            "number": 42
        })))
        .mount(&server)
        .await;

    let client = GitHubClient::with_base_url("ghp_x", server.uri()).unwrap();
    let mirror = IssueMirror {
        key: "AP-7".to_string(),
        title: "Login crash".to_string(),
        description: Some("Crashes on submit".to_string()),
        issue_type: "bug".to_string(),
        priority: "high".to_string(),
    };
    let created = client
        .create_issue_mirror("plank-dev", "plank", &mirror)
        .await
        .unwrap();

    assert_eq!(created.github_issue_number, 42);
    assert_eq!(
        created.github_issue_url,
        "https://github.com/plank-dev/plank/issues/42"
    );
}
