//! Bot progression rules for technical applications.
//!
//! Applied   → Rejected when score < 10, otherwise Reviewed
//! Reviewed  → Interview when score ≥ 25, otherwise Rejected
//! Interview → Offer when seed < min(90, round(score) + 20), otherwise Rejected
//!
//! Every other status is left alone. One step per evaluation.

use crate::models::application::ApplicationStatus;

pub const REVIEW_MIN_SCORE: f64 = 10.0;
pub const INTERVIEW_MIN_SCORE: f64 = 25.0;
pub const OFFER_SCORE_BIAS: u32 = 20;
pub const OFFER_THRESHOLD_CAP: u32 = 90;

/// Outcome of one rule evaluation. `note` goes verbatim into history and comments, so it never
/// carries the score or the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub next: ApplicationStatus,
    pub note: &'static str,
}

/// Missing or non-finite stored scores count as 0.
pub fn effective_score(raw: Option<f64>) -> f64 {
    match raw {
        Some(score) if score.is_finite() => score,
        _ => 0.0,
    }
}

/// Seeds strictly below this value receive an offer.
pub fn offer_threshold(score: f64) -> u32 {
    let base = score.round().clamp(0.0, 100.0) as u32;
    (base + OFFER_SCORE_BIAS).min(OFFER_THRESHOLD_CAP)
}

pub fn decide(status: ApplicationStatus, score: f64, seed: u32) -> Option<Decision> {
    let decision = match status {
        ApplicationStatus::Applied if score < REVIEW_MIN_SCORE => Decision {
            next: ApplicationStatus::Rejected,
            note: "Bot: Application did not meet screening requirements",
        },
        ApplicationStatus::Applied => Decision {
            next: ApplicationStatus::Reviewed,
            note: "Bot: Application reviewed and moved to next stage",
        },
        ApplicationStatus::Reviewed if score >= INTERVIEW_MIN_SCORE => Decision {
            next: ApplicationStatus::Interview,
            note: "Bot: Application approved for interview",
        },
        ApplicationStatus::Reviewed => Decision {
            next: ApplicationStatus::Rejected,
            note: "Bot: Application not selected for interview",
        },
        ApplicationStatus::Interview if seed < offer_threshold(score) => Decision {
            next: ApplicationStatus::Offer,
            note: "Bot: Interview successful, extending offer",
        },
        ApplicationStatus::Interview => Decision {
            next: ApplicationStatus::Rejected,
            note: "Bot: Interview did not meet requirements",
        },
        ApplicationStatus::Offer
        | ApplicationStatus::Rejected
        | ApplicationStatus::Shortlisted => return None,
    };
    Some(decision)
}
