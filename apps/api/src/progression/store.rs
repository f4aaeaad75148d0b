//! Persistence seam for the progression batch.
//!
//! `PgProgressionStore` commits each transition in its own transaction, guarded by a
//! compare-and-swap on the stored status so two overlapping runs cannot advance the same
//! application twice.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::application::{ActorRole, ApplicationStatus, HistorySource};

pub const BOT_ACTOR: &str = "Bot";

/// The narrow slice of an application the automaton reads.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProgressionCandidate {
    pub id: Uuid,
    pub status: String,
    pub role_type: String,
    pub match_score: Option<f64>,
    /// `None` when the referenced job no longer resolves.
    pub job_is_technical: Option<bool>,
}

/// Everything written for one bot transition.
#[derive(Debug, Clone)]
pub struct TransitionCommit {
    pub application_id: Uuid,
    pub prev_status: ApplicationStatus,
    pub new_status: ApplicationStatus,
    pub source: HistorySource,
    pub note: String,
    pub at: DateTime<Utc>,
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Technical applications not yet in a final status.
    async fn progression_candidates(&self) -> Result<Vec<ProgressionCandidate>, StoreError>;

    /// Atomically moves `prev_status → new_status` and appends the history record and bot
    /// comment. Fails with `StaleStatus` if the stored status is no longer `prev_status`.
    async fn commit_transition(&self, commit: &TransitionCommit) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgProgressionStore {
    pool: PgPool,
}

impl PgProgressionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationStore for PgProgressionStore {
    async fn progression_candidates(&self) -> Result<Vec<ProgressionCandidate>, StoreError> {
        Ok(sqlx::query_as::<_, ProgressionCandidate>(
            r#"
            SELECT a.id,
                   a.status,
                   a.role_type,
                   a.match_score::float8 AS match_score,
                   j.is_technical AS job_is_technical
            FROM applications a
            LEFT JOIN job_postings j ON j.id = a.job_id
            WHERE a.role_type = 'technical'
              AND a.status NOT IN ('Offer', 'Rejected')
            ORDER BY a.created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn commit_transition(&self, commit: &TransitionCommit) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE applications SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4",
        )
        .bind(commit.new_status.as_str())
        .bind(commit.at)
        .bind(commit.application_id)
        .bind(commit.prev_status.as_str())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::StaleStatus {
                id: commit.application_id,
                expected: commit.prev_status,
            });
        }

        sqlx::query(
            r#"
            INSERT INTO application_history
                (application_id, prev_status, new_status, updated_by, source, note, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(commit.application_id)
        .bind(commit.prev_status.as_str())
        .bind(commit.new_status.as_str())
        .bind(BOT_ACTOR)
        .bind(commit.source.as_str())
        .bind(&commit.note)
        .bind(commit.at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO application_comments (application_id, text, author, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(commit.application_id)
        .bind(&commit.note)
        .bind(BOT_ACTOR)
        .bind(ActorRole::Bot.as_str())
        .bind(commit.at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
