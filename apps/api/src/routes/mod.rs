pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::admin::handlers as admin;
use crate::applications::handlers as applications;
use crate::jobs::handlers as jobs;
use crate::progression::handlers as bot;
use crate::state::AppState;

/// Room for the non-file form fields around the résumé.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_resume_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route("/api/v1/jobs", post(jobs::handle_create_job).get(jobs::handle_list_jobs))
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Applications
        .route(
            "/api/v1/applications",
            post(applications::handle_create_application)
                .layer(DefaultBodyLimit::max(upload_limit))
                .get(applications::handle_list_applications),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handle_get_application),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handle_update_status),
        )
        .route(
            "/api/v1/applications/:id/comments",
            post(applications::handle_add_comment),
        )
        // Bot progression
        .route("/api/v1/bot/run", post(bot::handle_run_bot))
        .route("/api/v1/bot/stats", get(bot::handle_bot_stats))
        // Admin dashboard
        .route("/api/v1/admin/stats", get(admin::handle_admin_stats))
        .with_state(state)
}
