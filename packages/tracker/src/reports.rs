// ABOUTME: Aggregate reports over a project's issues: status overview and
// ABOUTME: per-assignee workload, computed with COUNT FILTER in the database

use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::storage::{StorageError, StorageResult};

/// Counter field names mirror the SQL aliases they come from.
#[derive(Debug, Clone, Serialize)]
pub struct OverviewStats {
    pub backlog_count: i64,
    pub todo_count: i64,
    pub in_progress_count: i64,
    pub in_review_count: i64,
    pub done_count: i64,
    pub total_issues: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub issue_type: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriorityCount {
    pub priority: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewReport {
    pub stats: OverviewStats,
    pub by_type: Vec<TypeCount>,
    pub by_priority: Vec<PriorityCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssigneeReport {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub open_issues: i64,
    pub closed_issues: i64,
    pub total_issues: i64,
}

pub struct ReportStorage {
    pool: SqlitePool,
}

impl ReportStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Scopes to one project when `project_id` is given, otherwise counts
    /// across every project.
    pub async fn overview(&self, project_id: Option<&str>) -> StorageResult<OverviewReport> {
        let mut sql = String::from(
            "SELECT \
                COUNT(*) FILTER (WHERE status = 'backlog') AS backlog_count, \
                COUNT(*) FILTER (WHERE status = 'todo') AS todo_count, \
                COUNT(*) FILTER (WHERE status = 'in-progress') AS in_progress_count, \
                COUNT(*) FILTER (WHERE status = 'in-review') AS in_review_count, \
                COUNT(*) FILTER (WHERE status = 'done') AS done_count, \
                COUNT(*) AS total_issues \
             FROM issues",
        );
        if project_id.is_some() {
            sql.push_str(" WHERE project_id = ?");
        }
        let mut query = sqlx::query(&sql);
        if let Some(project_id) = project_id {
            query = query.bind(project_id);
        }
        let row = query
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let stats = OverviewStats {
            backlog_count: row.try_get("backlog_count")?,
            todo_count: row.try_get("todo_count")?,
            in_progress_count: row.try_get("in_progress_count")?,
            in_review_count: row.try_get("in_review_count")?,
            done_count: row.try_get("done_count")?,
            total_issues: row.try_get("total_issues")?,
        };

        let by_type = self
            .count_grouped_by(project_id, "type")
            .await?
            .into_iter()
            .map(|(issue_type, count)| TypeCount { issue_type, count })
            .collect();
        let by_priority = self
            .count_grouped_by(project_id, "priority")
            .await?
            .into_iter()
            .map(|(priority, count)| PriorityCount { priority, count })
            .collect();

        Ok(OverviewReport {
            stats,
            by_type,
            by_priority,
        })
    }

    async fn count_grouped_by(
        &self,
        project_id: Option<&str>,
        column: &str,
    ) -> StorageResult<Vec<(String, i64)>> {
        let mut sql = format!("SELECT {column}, COUNT(*) AS count FROM issues");
        if project_id.is_some() {
            sql.push_str(" WHERE project_id = ?");
        }
        sql.push_str(&format!(" GROUP BY {column} ORDER BY count DESC"));

        let mut query = sqlx::query(&sql);
        if let Some(project_id) = project_id {
            query = query.bind(project_id);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;
        rows.iter()
            .map(|row| Ok((row.try_get(column)?, row.try_get("count")?)))
            .collect()
    }

    /// Workload per assignee. Users with no matching issues are filtered
    /// out, heaviest load first.
    pub async fn by_assignee(
        &self,
        project_id: Option<&str>,
    ) -> StorageResult<Vec<AssigneeReport>> {
        let mut sql = String::from(
            "SELECT \
                u.id, u.name, u.avatar, \
                COUNT(i.id) FILTER (WHERE i.status != 'done') AS open_issues, \
                COUNT(i.id) FILTER (WHERE i.status = 'done') AS closed_issues, \
                COUNT(i.id) AS total_issues \
             FROM users u \
             LEFT JOIN issues i ON i.assignee_id = u.id",
        );
        if project_id.is_some() {
            sql.push_str(" AND i.project_id = ?");
        }
        sql.push_str(
            " GROUP BY u.id, u.name, u.avatar \
             HAVING COUNT(i.id) > 0 \
             ORDER BY total_issues DESC",
        );

        let mut query = sqlx::query(&sql);
        if let Some(project_id) = project_id {
            query = query.bind(project_id);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter()
            .map(|row| {
                Ok(AssigneeReport {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    avatar: row.try_get("avatar")?,
                    open_issues: row.try_get("open_issues")?,
                    closed_issues: row.try_get("closed_issues")?,
                    total_issues: row.try_get("total_issues")?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{memory_pool, seed_issue, seed_project, seed_user};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn overview_counts_by_status_type_and_priority() {
        let pool = memory_pool().await;
        let user_id = seed_user(&pool, "Rosa", "rosa@example.com").await;
        let project_id = seed_project(&pool, "Apollo", "APO").await;

        let a = seed_issue(&pool, &project_id, &user_id, "One").await;
        let b = seed_issue(&pool, &project_id, &user_id, "Two").await;
        seed_issue(&pool, &project_id, &user_id, "Three").await;
        sqlx::query("UPDATE issues SET status = 'done', type = 'bug' WHERE id = ?")
            .bind(&a)
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("UPDATE issues SET status = 'in-progress' WHERE id = ?")
            .bind(&b)
            .execute(&pool)
            .await
            .unwrap();

        let storage = ReportStorage::new(pool);
        let report = storage.overview(Some(&project_id)).await.unwrap();

        assert_eq!(report.stats.total_issues, 3);
        assert_eq!(report.stats.backlog_count, 1);
        assert_eq!(report.stats.in_progress_count, 1);
        assert_eq!(report.stats.done_count, 1);
        assert_eq!(report.stats.todo_count, 0);

        let bug = report.by_type.iter().find(|t| t.issue_type == "bug").unwrap();
        assert_eq!(bug.count, 1);
    }

    #[tokio::test]
    async fn assignee_report_skips_idle_users() {
        let pool = memory_pool().await;
        let rosa = seed_user(&pool, "Rosa", "rosa@example.com").await;
        let idle = seed_user(&pool, "Idle", "idle@example.com").await;
        let project_id = seed_project(&pool, "Apollo", "APO").await;

        let a = seed_issue(&pool, &project_id, &rosa, "One").await;
        let b = seed_issue(&pool, &project_id, &rosa, "Two").await;
        for id in [&a, &b] {
            sqlx::query("UPDATE issues SET assignee_id = ? WHERE id = ?")
                .bind(&rosa)
                .bind(id)
                .execute(&pool)
                .await
                .unwrap();
        }
        sqlx::query("UPDATE issues SET status = 'done' WHERE id = ?")
            .bind(&a)
            .execute(&pool)
            .await
            .unwrap();

        let storage = ReportStorage::new(pool);
        let report = storage.by_assignee(Some(&project_id)).await.unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].name, "Rosa");
        assert_eq!(report[0].open_issues, 1);
        assert_eq!(report[0].closed_issues, 1);
        assert_eq!(report[0].total_issues, 2);
        assert!(!report.iter().any(|r| r.id == idle));
    }
}
