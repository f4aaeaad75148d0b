use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::applications::ingest::NewApplication;
use crate::errors::StoreError;
use crate::models::application::{
    ActorRole, ApplicationRow, ApplicationStatus, CommentRow, HistoryEntryRow, HistorySource,
    HISTORY_ORIGIN,
};

pub const SUBMISSION_NOTE: &str = "Application submitted by applicant";
pub const SUBMISSION_COMMENT: &str = "Application submitted";

/// Optional filters for listing applications.
#[derive(Debug, Default, Clone)]
pub struct ApplicationFilter {
    pub applicant_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub role_type: Option<String>,
    pub status: Option<String>,
}

/// A status change made by an admin.
#[derive(Debug, Clone)]
pub struct ManualStatusChange {
    pub application_id: Uuid,
    pub prev_status: ApplicationStatus,
    pub new_status: ApplicationStatus,
    pub updated_by: String,
    pub note: String,
    pub at: DateTime<Utc>,
}

/// Default note recorded when an admin doesn't supply one.
pub fn default_manual_note(prev: ApplicationStatus, new: ApplicationStatus) -> String {
    format!("Admin updated status from {prev} to {new}")
}

/// Inserts the application together with its first history record and submission comment.
/// A second application for the same job by the same applicant is a `Conflict`.
pub async fn insert_application(
    pool: &PgPool,
    new: &NewApplication,
    at: DateTime<Utc>,
) -> Result<ApplicationRow, StoreError> {
    let mut tx = pool.begin().await?;

    let row: ApplicationRow = sqlx::query_as(
        r#"
        INSERT INTO applications
            (job_id, job_title, applicant_id, applicant_name, role_type, status,
             match_score, extracted_text, suggested_skills, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
        RETURNING *
        "#,
    )
    .bind(new.job_id)
    .bind(&new.job_title)
    .bind(new.applicant_id)
    .bind(&new.applicant_name)
    .bind(new.role_type.as_str())
    .bind(ApplicationStatus::Applied.as_str())
    .bind(i32::from(new.match_score))
    .bind(&new.extracted_text)
    .bind(&new.suggested_skills)
    .bind(at)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict("You have already applied for this job".to_string())
        }
        other => StoreError::Database(other),
    })?;

    sqlx::query(
        r#"
        INSERT INTO application_history
            (application_id, prev_status, new_status, updated_by, source, note, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(row.id)
    .bind(HISTORY_ORIGIN)
    .bind(ApplicationStatus::Applied.as_str())
    .bind(&new.applicant_name)
    .bind(HistorySource::Manual.as_str())
    .bind(SUBMISSION_NOTE)
    .bind(at)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO application_comments (application_id, text, author, role, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(row.id)
    .bind(SUBMISSION_COMMENT)
    .bind(&new.applicant_name)
    .bind(ActorRole::Applicant.as_str())
    .bind(at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(
        "Application {} created for job {} (score {}, scorer {})",
        row.id, new.job_id, new.match_score, new.scorer_backend
    );
    Ok(row)
}

pub async fn get_application(pool: &PgPool, id: Uuid) -> Result<ApplicationRow, StoreError> {
    sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(StoreError::NotFound(id))
}

pub async fn get_history(pool: &PgPool, id: Uuid) -> Result<Vec<HistoryEntryRow>, StoreError> {
    Ok(sqlx::query_as(
        "SELECT * FROM application_history WHERE application_id = $1 ORDER BY created_at ASC, id ASC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_comments(pool: &PgPool, id: Uuid) -> Result<Vec<CommentRow>, StoreError> {
    Ok(sqlx::query_as(
        "SELECT * FROM application_comments WHERE application_id = $1 ORDER BY created_at ASC, id ASC",
    )
    .bind(id)
    .fetch_all(pool)
    .await?)
}

pub async fn list_applications(
    pool: &PgPool,
    filter: &ApplicationFilter,
) -> Result<Vec<ApplicationRow>, StoreError> {
    Ok(sqlx::query_as(
        r#"
        SELECT * FROM applications
        WHERE ($1::uuid IS NULL OR applicant_id = $1)
          AND ($2::uuid IS NULL OR job_id = $2)
          AND ($3::text IS NULL OR role_type = $3)
          AND ($4::text IS NULL OR status = $4)
        ORDER BY created_at DESC
        "#,
    )
    .bind(filter.applicant_id)
    .bind(filter.job_id)
    .bind(filter.role_type.as_deref())
    .bind(filter.status.as_deref())
    .fetch_all(pool)
    .await?)
}

/// Applies an admin status change with the same compare-and-swap guard the bot uses.
pub async fn apply_manual_status(
    pool: &PgPool,
    change: &ManualStatusChange,
) -> Result<ApplicationRow, StoreError> {
    let mut tx = pool.begin().await?;

    let row: Option<ApplicationRow> = sqlx::query_as(
        r#"
        UPDATE applications SET status = $1, updated_at = $2
        WHERE id = $3 AND status = $4
        RETURNING *
        "#,
    )
    .bind(change.new_status.as_str())
    .bind(change.at)
    .bind(change.application_id)
    .bind(change.prev_status.as_str())
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        tx.rollback().await?;
        return Err(StoreError::StaleStatus {
            id: change.application_id,
            expected: change.prev_status,
        });
    };

    sqlx::query(
        r#"
        INSERT INTO application_history
            (application_id, prev_status, new_status, updated_by, source, note, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(change.application_id)
    .bind(change.prev_status.as_str())
    .bind(change.new_status.as_str())
    .bind(&change.updated_by)
    .bind(HistorySource::Manual.as_str())
    .bind(&change.note)
    .bind(change.at)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO application_comments (application_id, text, author, role, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(change.application_id)
    .bind(&change.note)
    .bind(&change.updated_by)
    .bind(ActorRole::Admin.as_str())
    .bind(change.at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!(
        "Application {} moved {} -> {} by {}",
        change.application_id, change.prev_status, change.new_status, change.updated_by
    );
    Ok(row)
}

/// Appends a comment. The caller has already resolved the application.
pub async fn add_comment(
    pool: &PgPool,
    application_id: Uuid,
    text: &str,
    author: &str,
    role: ActorRole,
) -> Result<CommentRow, StoreError> {
    Ok(sqlx::query_as(
        r#"
        INSERT INTO application_comments (application_id, text, author, role)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(application_id)
    .bind(text)
    .bind(author)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manual_note() {
        assert_eq!(
            default_manual_note(ApplicationStatus::Applied, ApplicationStatus::Shortlisted),
            "Admin updated status from Applied to Shortlisted"
        );
    }
}
