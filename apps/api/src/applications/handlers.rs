use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::applications::access::{
    ensure_can_apply, ensure_can_read, ensure_form_applicant, ensure_manual_update_allowed,
    scoped_filter, viewer_id, viewer_name, viewer_role, ApplicationDetailView, ApplicationView,
};
use crate::applications::ingest::{parse_skill_list, prepare_application, ApplicantSubmission};
use crate::applications::repository::{
    add_comment, apply_manual_status, default_manual_note, get_application, get_comments,
    get_history, insert_application, list_applications, ManualStatusChange,
};
use crate::applications::resume_text::{extract_resume_text_blocking, scoring_source, ResumeUpload};
use crate::errors::AppError;
use crate::jobs::repository::fetch_job;
use crate::models::application::{
    history_is_contiguous, ActorRole, ApplicationStatus, CommentRow, MAX_COMMENT_LEN,
    MAX_NOTE_LEN,
};
use crate::state::AppState;

/// Fields of the multipart application form.
#[derive(Debug, Default)]
struct ApplicationForm {
    job_id: Option<Uuid>,
    applicant_id: Option<Uuid>,
    applicant_name: Option<String>,
    skills: Vec<String>,
    resume: Option<ResumeUpload>,
}

async fn read_application_form(
    mut multipart: Multipart,
    max_resume_bytes: usize,
) -> Result<ApplicationForm, AppError> {
    let mut form = ApplicationForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read resume: {e}")))?;
                if bytes.len() > max_resume_bytes {
                    return Err(AppError::Validation(format!(
                        "resume exceeds the {max_resume_bytes} byte limit"
                    )));
                }
                if !bytes.is_empty() {
                    form.resume = Some(ResumeUpload {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            "job_id" | "applicant_id" | "applicant_name" | "skills" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("invalid field '{name}': {e}")))?;
                let value = value.trim();
                match name.as_str() {
                    "job_id" => form.job_id = Some(parse_uuid("job_id", value)?),
                    "applicant_id" => form.applicant_id = Some(parse_uuid("applicant_id", value)?),
                    "applicant_name" => form.applicant_name = Some(value.to_string()),
                    _ => form.skills = parse_skill_list(value),
                }
            }
            other => warn!("Ignoring unexpected form field '{other}'"),
        }
    }

    Ok(form)
}

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value).map_err(|_| AppError::Validation(format!("{field} must be a UUID")))
}

#[derive(Serialize)]
pub struct CreateApplicationResponse {
    #[serde(flatten)]
    pub application: ApplicationView,
    /// Set when the résumé could not be read and listed skills were scored instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_warning: Option<String>,
}

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreateApplicationResponse>), AppError> {
    let role = viewer_role(&headers);
    let applicant_id = ensure_can_apply(role, viewer_id(&headers))?;
    let form = read_application_form(multipart, state.config.max_resume_bytes).await?;
    ensure_form_applicant(applicant_id, form.applicant_id)?;

    let job_id = form
        .job_id
        .ok_or_else(|| AppError::Validation("job_id is required".to_string()))?;
    let applicant_name = form
        .applicant_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| viewer_name(&headers, ActorRole::Applicant));

    let job = fetch_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    if !job.is_active() {
        return Err(AppError::Validation(
            "This job is no longer accepting applications".to_string(),
        ));
    }

    let extracted = match form.resume {
        Some(upload) => Some(extract_resume_text_blocking(upload).await),
        None => None,
    };
    let source = scoring_source(extracted, &form.skills);

    let submission = ApplicantSubmission {
        applicant_id,
        applicant_name,
        skills: form.skills,
    };
    let new = prepare_application(&job, &submission, &source, state.scorer.as_ref());
    let row = insert_application(&state.db, &new, Utc::now()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateApplicationResponse {
            application: ApplicationView::for_viewer(row, role),
            resume_warning: source.parse_warning,
        }),
    ))
}

#[derive(Deserialize)]
pub struct ApplicationListQuery {
    pub job_id: Option<Uuid>,
    pub role_type: Option<String>,
    pub status: Option<String>,
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ApplicationListQuery>,
) -> Result<Json<Vec<ApplicationView>>, AppError> {
    let role = viewer_role(&headers);
    let filter = scoped_filter(
        role,
        viewer_id(&headers),
        params.job_id,
        params.role_type.as_deref(),
        params.status.as_deref(),
    )?;

    let rows = list_applications(&state.db, &filter).await?;
    Ok(Json(
        rows.into_iter()
            .map(|row| ApplicationView::for_viewer(row, role))
            .collect(),
    ))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationDetailView>, AppError> {
    let role = viewer_role(&headers);
    let row = get_application(&state.db, id).await?;
    ensure_can_read(role, viewer_id(&headers), &row)?;

    let history = get_history(&state.db, id).await?;
    if !history_is_contiguous(&history, &row.status) {
        warn!("History of application {id} does not end at its current status {}", row.status);
    }
    let comments = get_comments(&state.db, id).await?;
    Ok(Json(ApplicationDetailView {
        application: ApplicationView::for_viewer(row, role),
        history,
        comments,
    }))
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
    pub comment: Option<String>,
}

/// Note recorded for a manual change: the admin's comment, or a generated one.
fn resolve_note(
    comment: Option<&str>,
    prev: ApplicationStatus,
    new: ApplicationStatus,
) -> Result<String, AppError> {
    match comment.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) if c.chars().count() > MAX_NOTE_LEN => Err(AppError::Validation(format!(
            "comment must be at most {MAX_NOTE_LEN} characters"
        ))),
        Some(c) => Ok(c.to_string()),
        None => Ok(default_manual_note(prev, new)),
    }
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<ApplicationView>, AppError> {
    let role = viewer_role(&headers);
    let row = get_application(&state.db, id).await?;
    ensure_manual_update_allowed(role, &row.role_type)?;

    let new_status = req
        .status
        .parse::<ApplicationStatus>()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let prev_status: ApplicationStatus = row.status.parse().map_err(|_| {
        AppError::Conflict(format!("Application {id} has unrecognised status '{}'", row.status))
    })?;
    if new_status == prev_status {
        return Err(AppError::Validation(format!(
            "Application is already {prev_status}"
        )));
    }

    let change = ManualStatusChange {
        application_id: id,
        prev_status,
        new_status,
        updated_by: viewer_name(&headers, role),
        note: resolve_note(req.comment.as_deref(), prev_status, new_status)?,
        at: Utc::now(),
    };
    let updated = apply_manual_status(&state.db, &change).await?;
    Ok(Json(ApplicationView::for_viewer(updated, role)))
}

#[derive(Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

fn validate_comment(text: &str) -> Result<&str, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("comment text is required".to_string()));
    }
    if text.chars().count() > MAX_COMMENT_LEN {
        return Err(AppError::Validation(format!(
            "comment must be at most {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(text)
}

/// POST /api/v1/applications/:id/comments
pub async fn handle_add_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> Result<(StatusCode, Json<CommentRow>), AppError> {
    let role = viewer_role(&headers);
    let text = validate_comment(&req.text)?;
    let row = get_application(&state.db, id).await?;
    ensure_can_read(role, viewer_id(&headers), &row)?;

    let comment = add_comment(&state.db, id, text, &viewer_name(&headers, role), role).await?;
    info!("Comment {} added to application {id} by {}", comment.id, role.as_str());
    Ok((StatusCode::CREATED, Json(comment)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_note_defaults() {
        let note = resolve_note(None, ApplicationStatus::Applied, ApplicationStatus::Reviewed);
        assert_eq!(note.unwrap(), "Admin updated status from Applied to Reviewed");

        let blank = resolve_note(
            Some("   "),
            ApplicationStatus::Reviewed,
            ApplicationStatus::Offer,
        );
        assert_eq!(blank.unwrap(), "Admin updated status from Reviewed to Offer");
    }

    #[test]
    fn test_resolve_note_keeps_admin_comment() {
        let note = resolve_note(
            Some(" Great portfolio "),
            ApplicationStatus::Applied,
            ApplicationStatus::Shortlisted,
        );
        assert_eq!(note.unwrap(), "Great portfolio");
    }

    #[test]
    fn test_resolve_note_length_limit() {
        let long = "n".repeat(MAX_NOTE_LEN + 1);
        assert!(matches!(
            resolve_note(Some(&long), ApplicationStatus::Applied, ApplicationStatus::Rejected),
            Err(AppError::Validation(_))
        ));
        let exact = "n".repeat(MAX_NOTE_LEN);
        assert!(resolve_note(Some(&exact), ApplicationStatus::Applied, ApplicationStatus::Rejected)
            .is_ok());
    }

    #[test]
    fn test_validate_comment() {
        assert_eq!(validate_comment("  hello ").unwrap(), "hello");
        assert!(validate_comment("   ").is_err());
        assert!(validate_comment(&"c".repeat(MAX_COMMENT_LEN)).is_ok());
        assert!(validate_comment(&"c".repeat(MAX_COMMENT_LEN + 1)).is_err());
    }

    #[test]
    fn test_parse_uuid_field() {
        assert!(parse_uuid("job_id", "nope").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_uuid("job_id", &id.to_string()).unwrap(), id);
    }
}
