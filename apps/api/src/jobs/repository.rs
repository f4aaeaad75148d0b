use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobPostingRow;

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const JOB_STATUSES: [&str; 3] = ["active", "inactive", "closed"];

#[derive(Debug, Clone, Deserialize)]
pub struct NewJobPosting {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub required_keywords: Vec<String>,
    #[serde(default)]
    pub is_technical: bool,
}

impl NewJobPosting {
    /// Trims text fields and drops blank skills; rejects over-long or empty fields.
    pub fn normalized(self) -> Result<Self, AppError> {
        let title = self.title.trim().to_string();
        let description = self.description.trim().to_string();

        if title.is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(AppError::Validation(format!(
                "title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        if description.is_empty() {
            return Err(AppError::Validation("description is required".to_string()));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(AppError::Validation(format!(
                "description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        Ok(NewJobPosting {
            title,
            description,
            required_skills: clean_list(self.required_skills),
            required_keywords: clean_list(self.required_keywords),
            is_technical: self.is_technical,
        })
    }
}

/// Partial edit of a posting. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPostingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub required_keywords: Option<Vec<String>>,
    pub is_technical: Option<bool>,
    pub status: Option<String>,
}

impl JobPostingUpdate {
    /// Applies the same limits as creation to whichever fields are present.
    pub fn normalized(self) -> Result<Self, AppError> {
        let title = match self.title.map(|t| t.trim().to_string()) {
            Some(t) if t.is_empty() => {
                return Err(AppError::Validation("title cannot be empty".to_string()))
            }
            Some(t) if t.chars().count() > MAX_TITLE_LEN => {
                return Err(AppError::Validation(format!(
                    "title must be at most {MAX_TITLE_LEN} characters"
                )))
            }
            other => other,
        };
        let description = match self.description.map(|d| d.trim().to_string()) {
            Some(d) if d.is_empty() => {
                return Err(AppError::Validation("description cannot be empty".to_string()))
            }
            Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => {
                return Err(AppError::Validation(format!(
                    "description must be at most {MAX_DESCRIPTION_LEN} characters"
                )))
            }
            other => other,
        };
        if let Some(status) = self.status.as_deref() {
            if !JOB_STATUSES.contains(&status) {
                return Err(AppError::Validation(format!("unknown job status '{status}'")));
            }
        }

        Ok(JobPostingUpdate {
            title,
            description,
            required_skills: self.required_skills.map(clean_list),
            required_keywords: self.required_keywords.map(clean_list),
            is_technical: self.is_technical,
            status: self.status,
        })
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub async fn insert_job(pool: &PgPool, job: &NewJobPosting) -> Result<JobPostingRow, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO job_postings (title, description, required_skills, required_keywords, is_technical)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&job.title)
    .bind(&job.description)
    .bind(&job.required_skills)
    .bind(&job.required_keywords)
    .bind(job.is_technical)
    .fetch_one(pool)
    .await
}

pub async fn fetch_job(pool: &PgPool, id: Uuid) -> Result<Option<JobPostingRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM job_postings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_jobs(
    pool: &PgPool,
    status: Option<&str>,
) -> Result<Vec<JobPostingRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM job_postings WHERE ($1::text IS NULL OR status = $1) ORDER BY created_at DESC",
    )
    .bind(status)
    .fetch_all(pool)
    .await
}

/// Returns `None` when no posting has this id.
pub async fn update_job(
    pool: &PgPool,
    id: Uuid,
    update: &JobPostingUpdate,
) -> Result<Option<JobPostingRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE job_postings SET
            title             = COALESCE($2, title),
            description       = COALESCE($3, description),
            required_skills   = COALESCE($4, required_skills),
            required_keywords = COALESCE($5, required_keywords),
            is_technical      = COALESCE($6, is_technical),
            status            = COALESCE($7, status)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(update.title.as_deref())
    .bind(update.description.as_deref())
    .bind(update.required_skills.as_ref())
    .bind(update.required_keywords.as_ref())
    .bind(update.is_technical)
    .bind(update.status.as_deref())
    .fetch_optional(pool)
    .await
}

/// Removes the posting. Existing applications keep their title and role type snapshot.
pub async fn delete_job(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM job_postings WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
