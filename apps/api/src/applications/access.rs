//! Read/write rules at the data-access boundary.
//!
//! Authentication happens upstream; the gateway forwards the caller's role in `X-User-Role`,
//! their id in `X-User-Id` and their display name in `X-User-Name`. The match score and the
//! text it was computed from are only readable by admins and the bot.

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::applications::repository::ApplicationFilter;
use crate::errors::AppError;
use crate::models::application::{
    ActorRole, ApplicationRow, ApplicationStatus, CommentRow, HistoryEntryRow, RoleType,
};

pub const ROLE_HEADER: &str = "x-user-role";
pub const NAME_HEADER: &str = "x-user-name";
pub const ID_HEADER: &str = "x-user-id";

/// Caller role; an absent or unknown header is treated as an applicant.
pub fn viewer_role(headers: &HeaderMap) -> ActorRole {
    headers
        .get(ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<ActorRole>().ok())
        .unwrap_or(ActorRole::Applicant)
}

pub fn viewer_name(headers: &HeaderMap, role: ActorRole) -> String {
    headers
        .get(NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| match role {
            ActorRole::Bot => "Bot".to_string(),
            ActorRole::Admin => "Admin".to_string(),
            ActorRole::Applicant => "Applicant".to_string(),
        })
}

pub fn viewer_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
}

pub fn ensure_admin(role: ActorRole, action: &str) -> Result<(), AppError> {
    if role != ActorRole::Admin {
        return Err(AppError::Forbidden(format!("Only admins can {action}")));
    }
    Ok(())
}

pub fn can_view_match_score(role: ActorRole) -> bool {
    matches!(role, ActorRole::Admin | ActorRole::Bot)
}

/// Admins move non-technical applications by hand; technical ones belong to the bot.
pub fn ensure_manual_update_allowed(role: ActorRole, role_type: &str) -> Result<(), AppError> {
    if role != ActorRole::Admin {
        return Err(AppError::Forbidden(
            "Only admins can update application status".to_string(),
        ));
    }
    if role_type.parse::<RoleType>().ok() != Some(RoleType::NonTechnical) {
        return Err(AppError::Forbidden(
            "Admin cannot manually update technical applications. Use bot automation.".to_string(),
        ));
    }
    Ok(())
}

/// Application as returned to a particular viewer.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub applicant_id: Uuid,
    pub applicant_name: String,
    pub role_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    pub suggested_skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationView {
    pub fn for_viewer(row: ApplicationRow, role: ActorRole) -> Self {
        let privileged = can_view_match_score(role);
        ApplicationView {
            id: row.id,
            job_id: row.job_id,
            job_title: row.job_title,
            applicant_id: row.applicant_id,
            applicant_name: row.applicant_name,
            role_type: row.role_type,
            status: row.status,
            match_score: row.match_score.filter(|_| privileged),
            extracted_text: row.extracted_text.filter(|_| privileged),
            suggested_skills: row.suggested_skills,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDetailView {
    #[serde(flatten)]
    pub application: ApplicationView,
    pub history: Vec<HistoryEntryRow>,
    pub comments: Vec<CommentRow>,
}

/// Only applicants file applications, always as themselves. Returns the caller's id.
pub fn ensure_can_apply(role: ActorRole, viewer_id: Option<Uuid>) -> Result<Uuid, AppError> {
    if role != ActorRole::Applicant {
        return Err(AppError::Forbidden(
            "Only applicants can submit applications".to_string(),
        ));
    }
    viewer_id.ok_or_else(|| AppError::Forbidden("Applicant identity is required".to_string()))
}

/// A form-supplied applicant id is accepted only when it names the caller.
pub fn ensure_form_applicant(viewer_id: Uuid, form_id: Option<Uuid>) -> Result<(), AppError> {
    match form_id {
        Some(id) if id != viewer_id => Err(AppError::Forbidden(
            "Applications can only be submitted for yourself".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Applicants may only read their own applications; the bot only technical ones.
pub fn ensure_can_read(
    role: ActorRole,
    viewer_id: Option<Uuid>,
    row: &ApplicationRow,
) -> Result<(), AppError> {
    match role {
        ActorRole::Applicant if viewer_id != Some(row.applicant_id) => Err(AppError::Forbidden(
            "You can only view your own applications".to_string(),
        )),
        ActorRole::Bot if row.role_type != RoleType::Technical.as_str() => Err(
            AppError::Forbidden("Bot can only access technical applications".to_string()),
        ),
        _ => Ok(()),
    }
}

/// Validates listing filters and scopes them to what `role` may see.
pub fn scoped_filter(
    role: ActorRole,
    viewer_id: Option<Uuid>,
    job_id: Option<Uuid>,
    role_type: Option<&str>,
    status: Option<&str>,
) -> Result<ApplicationFilter, AppError> {
    let mut role_type = role_type
        .map(|v| v.parse::<RoleType>())
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let status = status
        .map(|v| v.parse::<ApplicationStatus>())
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut applicant_id = None;
    match role {
        ActorRole::Applicant => {
            applicant_id = Some(viewer_id.ok_or_else(|| {
                AppError::Forbidden("Applicants can only list their own applications".to_string())
            })?);
        }
        ActorRole::Bot => {
            if role_type == Some(RoleType::NonTechnical) {
                return Err(AppError::Forbidden(
                    "Bot can only access technical applications".to_string(),
                ));
            }
            role_type = Some(RoleType::Technical);
        }
        ActorRole::Admin => {}
    }

    Ok(ApplicationFilter {
        applicant_id,
        job_id,
        role_type: role_type.map(|r| r.as_str().to_string()),
        status: status.map(|s| s.as_str().to_string()),
    })
}
