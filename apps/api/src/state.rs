use std::sync::Arc;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::matching::MatchScorer;
use crate::progression::seed::DecisionSeed;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Scorer applied once at application creation. Default: TfIdfScorer. Swap via MATCH_SCORER.
    pub scorer: Arc<dyn MatchScorer>,
    /// Draw used by the Interview-stage decision.
    pub seed: Arc<dyn DecisionSeed>,
    /// Cancelled on shutdown; progression batches stop between applications.
    pub shutdown: CancellationToken,
}
