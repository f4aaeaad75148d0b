//! Read-only bot dashboard figures.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::application::HistorySource;

pub const RECENT_ACTIVITY_LIMIT: i64 = 20;

/// History `source` values that mark a bot transition. Display names are user-controlled and
/// never identify the bot.
pub fn bot_source_tags() -> Vec<&'static str> {
    HistorySource::BOT.iter().map(HistorySource::as_str).collect()
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SourceCount {
    pub source: String,
    pub count: i64,
}

/// A bot-written history record joined with the application's current state.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BotActivityEntry {
    pub application_id: Uuid,
    pub job_title: String,
    pub status: String,
    pub prev_status: String,
    pub new_status: String,
    pub source: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BotStats {
    /// Technical applications per status.
    pub total_by_status: Vec<StatusCount>,
    /// Technical applications not yet Offer or Rejected.
    pub ready_for_processing: i64,
    /// Bot transitions in the last 24 hours, per history source.
    pub recent_bot_activity: Vec<SourceCount>,
    pub recent_transitions: Vec<BotActivityEntry>,
    pub generated_at: DateTime<Utc>,
}

pub async fn load_bot_stats(pool: &PgPool, now: DateTime<Utc>) -> Result<BotStats, sqlx::Error> {
    let bot_sources = bot_source_tags();

    let total_by_status: Vec<StatusCount> = sqlx::query_as(
        r#"
        SELECT status, COUNT(*) AS count
        FROM applications
        WHERE role_type = 'technical'
        GROUP BY status
        ORDER BY status
        "#,
    )
    .fetch_all(pool)
    .await?;

    let ready_for_processing: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM applications
        WHERE role_type = 'technical' AND status NOT IN ('Offer', 'Rejected')
        "#,
    )
    .fetch_one(pool)
    .await?;

    let recent_bot_activity: Vec<SourceCount> = sqlx::query_as(
        r#"
        SELECT source, COUNT(*) AS count
        FROM application_history
        WHERE source = ANY($1) AND created_at >= $2
        GROUP BY source
        ORDER BY source
        "#,
    )
    .bind(&bot_sources)
    .bind(now - Duration::hours(24))
    .fetch_all(pool)
    .await?;

    let recent_transitions: Vec<BotActivityEntry> = sqlx::query_as(
        r#"
        SELECT h.application_id, a.job_title, a.status, h.prev_status, h.new_status,
               h.source, h.note, h.created_at
        FROM application_history h
        JOIN applications a ON a.id = h.application_id
        WHERE h.source = ANY($1)
        ORDER BY h.created_at DESC, h.id DESC
        LIMIT $2
        "#,
    )
    .bind(&bot_sources)
    .bind(RECENT_ACTIVITY_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(BotStats {
        total_by_status,
        ready_for_processing,
        recent_bot_activity,
        recent_transitions,
        generated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_source_tags_exclude_manual_history() {
        let tags = bot_source_tags();
        assert_eq!(tags, vec!["bot-cron", "bot-manual"]);
        assert!(!tags.contains(&HistorySource::Manual.as_str()));
    }
}
