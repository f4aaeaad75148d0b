//! Progression batch: evaluates every candidate once and commits at most one transition each.
//!
//! Items are independent. A skipped or failed item never stops the batch, and a failed commit
//! is not retried within the same run. Cancellation is checked between items only.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::application::{ApplicationStatus, HistorySource, RoleType};
use crate::progression::rules::{decide, effective_score};
use crate::progression::seed::DecisionSeed;
use crate::progression::store::{ApplicationStore, ProgressionCandidate, TransitionCommit};

/// Where a run was triggered from. Only affects the history `source` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationSource {
    /// Carries the internal automation credential.
    Scheduled,
    Manual,
}

impl InvocationSource {
    pub fn history_source(self) -> HistorySource {
        match self {
            InvocationSource::Scheduled => HistorySource::BotCron,
            InvocationSource::Manual => HistorySource::BotManual,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionSummary {
    pub id: Uuid,
    pub prev_status: ApplicationStatus,
    pub new_status: ApplicationStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub updated_count: usize,
    pub transitions: Vec<TransitionSummary>,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub ran_at: DateTime<Utc>,
}

#[derive(Debug, PartialEq)]
enum SkipReason {
    NotTechnical,
    JobMissing,
    JobNotTechnical,
    UnknownStatus,
    Final,
    NoRule,
}

/// Loads pending candidates from `store` and runs them.
pub async fn run_pending<S>(
    store: &S,
    source: InvocationSource,
    seed: &dyn DecisionSeed,
    cancel: &CancellationToken,
) -> Result<BatchReport, StoreError>
where
    S: ApplicationStore + ?Sized,
{
    let candidates = store.progression_candidates().await?;
    Ok(run_progression_batch(store, candidates, source, seed, cancel).await)
}

pub async fn run_progression_batch<S>(
    store: &S,
    candidates: Vec<ProgressionCandidate>,
    source: InvocationSource,
    seed: &dyn DecisionSeed,
    cancel: &CancellationToken,
) -> BatchReport
where
    S: ApplicationStore + ?Sized,
{
    let ran_at = Utc::now();
    let mut report = BatchReport {
        updated_count: 0,
        transitions: Vec::new(),
        skipped: 0,
        failed: 0,
        cancelled: false,
        ran_at,
    };

    info!(
        "Bot progression started: {} candidates ({:?})",
        candidates.len(),
        source
    );

    for candidate in candidates {
        if cancel.is_cancelled() {
            warn!("Bot progression cancelled after {} updates", report.updated_count);
            report.cancelled = true;
            break;
        }

        let prev_status = match eligible_status(&candidate) {
            Ok(status) => status,
            Err(reason) => {
                warn!("Skipping application {}: {:?}", candidate.id, reason);
                report.skipped += 1;
                continue;
            }
        };

        let score = effective_score(candidate.match_score);
        let draw = seed.seed(&candidate.id.to_string());
        let Some(decision) = decide(prev_status, score, draw) else {
            debug!("Skipping application {}: {:?}", candidate.id, SkipReason::NoRule);
            report.skipped += 1;
            continue;
        };

        let commit = TransitionCommit {
            application_id: candidate.id,
            prev_status,
            new_status: decision.next,
            source: source.history_source(),
            note: decision.note.to_string(),
            at: ran_at,
        };

        match store.commit_transition(&commit).await {
            Ok(()) => {
                info!(
                    "Updated application {}: {} → {}",
                    candidate.id, prev_status, decision.next
                );
                report.transitions.push(TransitionSummary {
                    id: candidate.id,
                    prev_status,
                    new_status: decision.next,
                });
            }
            Err(StoreError::StaleStatus { id, expected }) => {
                warn!("Application {id} moved past {expected} during the run; skipped");
                report.skipped += 1;
            }
            Err(e) => {
                error!("Failed to save transition for application {}: {e}", candidate.id);
                report.failed += 1;
            }
        }
    }

    report.updated_count = report.transitions.len();
    info!(
        "Bot progression completed. Updated {} applications ({} skipped, {} failed)",
        report.updated_count, report.skipped, report.failed
    );
    report
}

/// Role and job guards, then status parsing.
fn eligible_status(candidate: &ProgressionCandidate) -> Result<ApplicationStatus, SkipReason> {
    if candidate.role_type.parse::<RoleType>().ok() != Some(RoleType::Technical) {
        return Err(SkipReason::NotTechnical);
    }
    match candidate.job_is_technical {
        None => return Err(SkipReason::JobMissing),
        Some(false) => return Err(SkipReason::JobNotTechnical),
        Some(true) => {}
    }
    let status = candidate
        .status
        .parse::<ApplicationStatus>()
        .map_err(|_| SkipReason::UnknownStatus)?;
    if status.is_final() {
        return Err(SkipReason::Final);
    }
    Ok(status)
}
