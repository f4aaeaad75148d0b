use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::applications::access::ApplicationView;
use crate::models::application::{ActorRole, ApplicationRow};
use crate::progression::stats::StatusCount;

pub const RECENT_APPLICATIONS_LIMIT: i64 = 10;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RoleTypeCount {
    pub role_type: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobTypeCount {
    pub is_technical: bool,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminStats {
    pub applications_by_status: Vec<StatusCount>,
    pub applications_by_role_type: Vec<RoleTypeCount>,
    pub jobs_by_type: Vec<JobTypeCount>,
    /// Newest first, shown with the admin's view of each application.
    pub recent_applications: Vec<ApplicationView>,
    pub generated_at: DateTime<Utc>,
}

pub async fn load_admin_stats(
    pool: &PgPool,
    now: DateTime<Utc>,
) -> Result<AdminStats, sqlx::Error> {
    let applications_by_status: Vec<StatusCount> = sqlx::query_as(
        "SELECT status, COUNT(*) AS count FROM applications GROUP BY status ORDER BY status",
    )
    .fetch_all(pool)
    .await?;

    let applications_by_role_type: Vec<RoleTypeCount> = sqlx::query_as(
        "SELECT role_type, COUNT(*) AS count FROM applications GROUP BY role_type ORDER BY role_type",
    )
    .fetch_all(pool)
    .await?;

    let jobs_by_type: Vec<JobTypeCount> = sqlx::query_as(
        r#"
        SELECT is_technical, COUNT(*) AS count
        FROM job_postings
        GROUP BY is_technical
        ORDER BY is_technical DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let recent: Vec<ApplicationRow> = sqlx::query_as(
        "SELECT * FROM applications ORDER BY created_at DESC, id DESC LIMIT $1",
    )
    .bind(RECENT_APPLICATIONS_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(AdminStats {
        applications_by_status,
        applications_by_role_type,
        jobs_by_type,
        recent_applications: recent
            .into_iter()
            .map(|row| ApplicationView::for_viewer(row, ActorRole::Admin))
            .collect(),
        generated_at: now,
    })
}
