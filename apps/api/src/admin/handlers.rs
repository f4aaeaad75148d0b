use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;

use crate::admin::stats::{load_admin_stats, AdminStats};
use crate::applications::access::{ensure_admin, viewer_role};
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/v1/admin/stats
pub async fn handle_admin_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AdminStats>, AppError> {
    ensure_admin(viewer_role(&headers), "view the dashboard")?;
    Ok(Json(load_admin_stats(&state.db, Utc::now()).await?))
}
