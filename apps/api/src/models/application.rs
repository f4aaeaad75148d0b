use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// `prev_status` of the first history record.
pub const HISTORY_ORIGIN: &str = "N/A";

pub const MAX_NOTE_LEN: usize = 200;
pub const MAX_COMMENT_LEN: usize = 500;

#[derive(Debug, Error, PartialEq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Reviewed,
    Interview,
    Offer,
    Rejected,
    Shortlisted,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Shortlisted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Reviewed => "Reviewed",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Shortlisted => "Shortlisted",
        }
    }

    /// Offer and Rejected end the automated pipeline.
    pub fn is_final(&self) -> bool {
        matches!(self, ApplicationStatus::Offer | ApplicationStatus::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "status",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleType {
    Technical,
    NonTechnical,
}

impl RoleType {
    pub fn for_job(is_technical: bool) -> Self {
        if is_technical {
            RoleType::Technical
        } else {
            RoleType::NonTechnical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleType::Technical => "technical",
            RoleType::NonTechnical => "non-technical",
        }
    }
}

impl FromStr for RoleType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technical" => Ok(RoleType::Technical),
            "non-technical" => Ok(RoleType::NonTechnical),
            other => Err(UnknownVariant {
                kind: "role type",
                value: other.to_string(),
            }),
        }
    }
}

/// Who or what wrote a history record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistorySource {
    Manual,
    BotCron,
    BotManual,
}

impl HistorySource {
    /// Sources written by the progression bot.
    pub const BOT: [HistorySource; 2] = [HistorySource::BotCron, HistorySource::BotManual];

    pub fn is_bot(&self) -> bool {
        Self::BOT.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HistorySource::Manual => "manual",
            HistorySource::BotCron => "bot-cron",
            HistorySource::BotManual => "bot-manual",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Applicant,
    Admin,
    Bot,
}

impl ActorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Applicant => "applicant",
            ActorRole::Admin => "admin",
            ActorRole::Bot => "bot",
        }
    }
}

impl FromStr for ActorRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "applicant" => Ok(ActorRole::Applicant),
            "admin" => Ok(ActorRole::Admin),
            "bot" => Ok(ActorRole::Bot),
            other => Err(UnknownVariant {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub applicant_id: Uuid,
    pub applicant_name: String,
    pub role_type: String,
    pub status: String,
    pub match_score: Option<i32>,
    pub extracted_text: Option<String>,
    pub suggested_skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistoryEntryRow {
    pub id: i64,
    pub application_id: Uuid,
    pub prev_status: String,
    pub new_status: String,
    pub updated_by: String,
    pub source: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub application_id: Uuid,
    pub text: String,
    pub author: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// True when `history` is a contiguous chain starting at `N/A` and ending at `current`.
pub fn history_is_contiguous(history: &[HistoryEntryRow], current: &str) -> bool {
    let Some(first) = history.first() else {
        return false;
    };
    first.prev_status == HISTORY_ORIGIN
        && history
            .windows(2)
            .all(|pair| pair[0].new_status == pair[1].prev_status)
        && history.last().map(|h| h.new_status.as_str()) == Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(prev: &str, new: &str) -> HistoryEntryRow {
        HistoryEntryRow {
            id: 0,
            application_id: Uuid::nil(),
            prev_status: prev.to_string(),
            new_status: new.to_string(),
            updated_by: "Bot".to_string(),
            source: "bot-cron".to_string(),
            note: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in ApplicationStatus::ALL {
            assert_eq!(status.as_str().parse::<ApplicationStatus>().unwrap(), status);
        }
        assert!("Hired".parse::<ApplicationStatus>().is_err());
        assert!("applied".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_only_bot_sources_count_as_bot() {
        assert!(HistorySource::BotCron.is_bot());
        assert!(HistorySource::BotManual.is_bot());
        assert!(!HistorySource::Manual.is_bot());
    }

    #[test]
    fn test_final_statuses() {
        assert!(ApplicationStatus::Offer.is_final());
        assert!(ApplicationStatus::Rejected.is_final());
        assert!(!ApplicationStatus::Interview.is_final());
        assert!(!ApplicationStatus::Shortlisted.is_final());
    }

    #[test]
    fn test_role_type_serde_is_kebab_case() {
        let json = serde_json::to_string(&RoleType::NonTechnical).unwrap();
        assert_eq!(json, r#""non-technical""#);
        assert_eq!(RoleType::for_job(true).as_str(), "technical");
    }

    #[test]
    fn test_history_source_labels() {
        assert_eq!(HistorySource::BotCron.as_str(), "bot-cron");
        assert_eq!(
            serde_json::to_string(&HistorySource::BotManual).unwrap(),
            r#""bot-manual""#
        );
    }

    #[test]
    fn test_history_chain_valid() {
        let history = vec![
            entry(HISTORY_ORIGIN, "Applied"),
            entry("Applied", "Reviewed"),
            entry("Reviewed", "Interview"),
        ];
        assert!(history_is_contiguous(&history, "Interview"));
        assert!(!history_is_contiguous(&history, "Reviewed"));
    }

    #[test]
    fn test_history_chain_broken() {
        let history = vec![entry(HISTORY_ORIGIN, "Applied"), entry("Reviewed", "Interview")];
        assert!(!history_is_contiguous(&history, "Interview"));
        assert!(!history_is_contiguous(&[], "Applied"));
    }
}
