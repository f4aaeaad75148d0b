use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::applications::access::{ensure_admin, viewer_role};
use crate::errors::AppError;
use crate::jobs::repository::{
    delete_job, fetch_job, insert_job, list_jobs, update_job, JobPostingUpdate, NewJobPosting,
    JOB_STATUSES,
};
use crate::models::job::JobPostingRow;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct JobListQuery {
    pub status: Option<String>,
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<NewJobPosting>,
) -> Result<(StatusCode, Json<JobPostingRow>), AppError> {
    ensure_admin(viewer_role(&headers), "create jobs")?;
    let job = insert_job(&state.db, &req.normalized()?).await?;
    info!("Job {} created (technical: {})", job.id, job.is_technical);
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> Result<Json<Vec<JobPostingRow>>, AppError> {
    if let Some(status) = params.status.as_deref() {
        if !JOB_STATUSES.contains(&status) {
            return Err(AppError::Validation(format!("unknown job status '{status}'")));
        }
    }
    Ok(Json(list_jobs(&state.db, params.status.as_deref()).await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobPostingRow>, AppError> {
    fetch_job(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// PUT /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<JobPostingUpdate>,
) -> Result<Json<JobPostingRow>, AppError> {
    ensure_admin(viewer_role(&headers), "update jobs")?;
    let job = update_job(&state.db, id, &req.normalized()?)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
    info!("Job {id} updated (status: {}, technical: {})", job.status, job.is_technical);
    Ok(Json(job))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ensure_admin(viewer_role(&headers), "delete jobs")?;
    if !delete_job(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    info!("Job {id} deleted");
    Ok(StatusCode::NO_CONTENT)
}
