// ABOUTME: Demo data loader for local development
// ABOUTME: Creates sample users, a project, a sprint, labels, and issues

use std::path::PathBuf;

use colored::*;

use plank_tracker::auth::hash_password;
use plank_tracker::issues::{CreateIssueRequest, IssuePriority, IssueStatus, IssueType};
use plank_tracker::sprints::CreateSprintRequest;
use plank_tracker::DbState;

const DEMO_PASSWORD: &str = "plank123";

pub async fn run(db_path: Option<PathBuf>) -> anyhow::Result<()> {
    let db = DbState::init_with_path(db_path).await?;

    if db.users.get_user_by_email("ana@plank.dev").await?.is_some() {
        println!("{}", "Demo data already loaded, nothing to do".yellow());
        return Ok(());
    }

    println!("{}", "🌱 Seeding demo data...".green().bold());

    let password_hash = hash_password(DEMO_PASSWORD);
    let ana = db
        .users
        .create_user("Ana Sousa", "ana@plank.dev", &password_hash, None)
        .await?;
    let ben = db
        .users
        .create_user("Ben Carter", "ben@plank.dev", &password_hash, None)
        .await?;
    let cleo = db
        .users
        .create_user("Cleo Park", "cleo@plank.dev", &password_hash, None)
        .await?;

    let project = db
        .projects
        .create_project(
            "Plank Demo",
            "DEMO",
            Some("A sample project showing what Plank can track"),
            None,
            Some(&ana.id),
        )
        .await?;
    db.projects.add_member(&project.id, &ben.id, "member").await?;
    db.projects.add_member(&project.id, &cleo.id, "member").await?;

    let backend = db
        .labels
        .create_label(Some(&project.id), "backend", Some("#1f6feb"))
        .await?;
    let frontend = db
        .labels
        .create_label(Some(&project.id), "frontend", Some("#a371f7"))
        .await?;
    db.labels
        .create_label(Some(&project.id), "design", Some("#f778ba"))
        .await?;

    let sprint = db
        .sprints
        .create_sprint(
            &project.id,
            CreateSprintRequest {
                name: Some("Sprint 1".to_string()),
                goal: Some("Ship the first usable board".to_string()),
                ..Default::default()
            },
        )
        .await?;

    let epic = db
        .issues
        .create_issue(
            &project.id,
            CreateIssueRequest {
                title: Some("User authentication".to_string()),
                description: Some("Registration, login, and session handling".to_string()),
                issue_type: Some(IssueType::Epic),
                priority: Some(IssuePriority::High),
                status: Some(IssueStatus::InProgress),
                assignee_id: Some(ana.id.clone()),
                reporter_id: Some(ana.id.clone()),
                ..Default::default()
            },
        )
        .await?;

    let login_bug = db
        .issues
        .create_issue(
            &project.id,
            CreateIssueRequest {
                title: Some("Login form validation errors not shown".to_string()),
                description: Some(
                    "Submitting an empty form silently does nothing instead of marking the fields"
                        .to_string(),
                ),
                issue_type: Some(IssueType::Bug),
                priority: Some(IssuePriority::Highest),
                assignee_id: Some(ben.id.clone()),
                reporter_id: Some(cleo.id.clone()),
                epic_id: Some(epic.id.clone()),
                ..Default::default()
            },
        )
        .await?;

    let sessions = db
        .issues
        .create_issue(
            &project.id,
            CreateIssueRequest {
                title: Some("Expire sessions after a week".to_string()),
                issue_type: Some(IssueType::Task),
                status: Some(IssueStatus::InProgress),
                assignee_id: Some(ana.id.clone()),
                reporter_id: Some(ana.id.clone()),
                epic_id: Some(epic.id.clone()),
                ..Default::default()
            },
        )
        .await?;

    let ci = db
        .issues
        .create_issue(
            &project.id,
            CreateIssueRequest {
                title: Some("Set up CI pipeline".to_string()),
                issue_type: Some(IssueType::Task),
                priority: Some(IssuePriority::High),
                status: Some(IssueStatus::Done),
                assignee_id: Some(ben.id.clone()),
                reporter_id: Some(ana.id.clone()),
                ..Default::default()
            },
        )
        .await?;

    db.issues
        .create_issue(
            &project.id,
            CreateIssueRequest {
                title: Some("Board drag and drop".to_string()),
                issue_type: Some(IssueType::Story),
                status: Some(IssueStatus::Backlog),
                reporter_id: Some(cleo.id.clone()),
                ..Default::default()
            },
        )
        .await?;

    db.issues
        .create_issue(
            &project.id,
            CreateIssueRequest {
                title: Some("Dark theme".to_string()),
                issue_type: Some(IssueType::Story),
                priority: Some(IssuePriority::Low),
                status: Some(IssueStatus::Backlog),
                assignee_id: Some(cleo.id.clone()),
                reporter_id: Some(ben.id.clone()),
                ..Default::default()
            },
        )
        .await?;

    db.labels.attach(&login_bug.id, &frontend.id).await?;
    db.labels.attach(&sessions.id, &backend.id).await?;
    db.labels.attach(&ci.id, &backend.id).await?;

    db.sprints.assign_issue(&login_bug.id, &sprint.id).await?;
    db.sprints.assign_issue(&sessions.id, &sprint.id).await?;

    db.comments
        .create_comment(
            &login_bug.id,
            &cleo.id,
            "Reproduced on Safari 17, the error container never renders.",
        )
        .await?;

    println!(
        "✅ Seeded project {} with 6 issues across 3 users",
        project.key.cyan()
    );
    println!("   Log in as ana@plank.dev / {}", DEMO_PASSWORD);

    Ok(())
}
