//! Builds a new application record from a job posting and the applicant's submission.
//!
//! Flow: extracted résumé text (or skills fallback) → scorer → suggested skills → insert.
//! The score and source text are computed here once and never recomputed.

use uuid::Uuid;

use crate::applications::resume_text::ScoringSource;
use crate::matching::{extract_skills, MatchInput, MatchScorer};
use crate::models::application::RoleType;
use crate::models::job::JobPostingRow;

#[derive(Debug, Clone)]
pub struct ApplicantSubmission {
    pub applicant_id: Uuid,
    pub applicant_name: String,
    /// Free-text skills typed by the applicant; scored when no résumé text is available.
    pub skills: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub job_title: String,
    pub applicant_id: Uuid,
    pub applicant_name: String,
    pub role_type: RoleType,
    pub match_score: u8,
    pub extracted_text: String,
    pub suggested_skills: Vec<String>,
    pub scorer_backend: &'static str,
}

pub fn prepare_application(
    job: &JobPostingRow,
    submission: &ApplicantSubmission,
    source: &ScoringSource,
    scorer: &dyn MatchScorer,
) -> NewApplication {
    let match_score = scorer.score(&MatchInput {
        resume_text: &source.text,
        job_description: &job.description,
        required_skills: job.scoring_skills(),
    });

    NewApplication {
        job_id: job.id,
        job_title: job.title.clone(),
        applicant_id: submission.applicant_id,
        applicant_name: submission.applicant_name.clone(),
        role_type: RoleType::for_job(job.is_technical),
        match_score,
        extracted_text: source.text.clone(),
        suggested_skills: extract_skills(&source.text)
            .into_iter()
            .map(str::to_string)
            .collect(),
        scorer_backend: scorer.backend(),
    }
}

/// Splits a comma- or newline-separated skill list, dropping blanks and duplicates.
pub fn parse_skill_list(raw: &str) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();
    for skill in raw.split([',', '\n']).map(str::trim).filter(|s| !s.is_empty()) {
        if !skills.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            skills.push(skill.to_string());
        }
    }
    skills
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::scorer::{KeywordOverlapScorer, TfIdfScorer};
    use chrono::Utc;

    fn job(is_technical: bool) -> JobPostingRow {
        JobPostingRow {
            id: Uuid::new_v4(),
            title: "Data Engineer".to_string(),
            description: "Build data pipelines in Python with SQL and Docker".to_string(),
            required_skills: vec![],
            required_keywords: vec!["Python".to_string(), "SQL".to_string(), "Java".to_string()],
            is_technical,
            status: "active".to_string(),
            created_at: Utc::now(),
        }
    }

    fn submission(skills: &[&str]) -> ApplicantSubmission {
        ApplicantSubmission {
            applicant_id: Uuid::new_v4(),
            applicant_name: "Sam Rivera".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn source(text: &str) -> ScoringSource {
        ScoringSource {
            text: text.to_string(),
            parse_warning: None,
        }
    }

    #[test]
    fn test_role_type_follows_job() {
        let new = prepare_application(&job(true), &submission(&[]), &source(""), &TfIdfScorer);
        assert_eq!(new.role_type, RoleType::Technical);
        let new = prepare_application(&job(false), &submission(&[]), &source(""), &TfIdfScorer);
        assert_eq!(new.role_type, RoleType::NonTechnical);
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let new = prepare_application(&job(true), &submission(&[]), &source(""), &TfIdfScorer);
        assert_eq!(new.match_score, 0);
        assert!(new.suggested_skills.is_empty());
    }

    #[test]
    fn test_legacy_scorer_uses_keyword_fallback() {
        let new = prepare_application(
            &job(true),
            &submission(&[]),
            &source("python and sql"),
            &KeywordOverlapScorer,
        );
        assert_eq!(new.match_score, 67);
        assert_eq!(new.scorer_backend, "keyword");
    }

    #[test]
    fn test_tfidf_score_and_suggested_skills() {
        let new = prepare_application(
            &job(true),
            &submission(&[]),
            &source("Python developer, SQL and Docker pipelines"),
            &TfIdfScorer,
        );
        assert!(new.match_score > 0);
        assert_eq!(new.suggested_skills, vec!["python", "sql", "docker"]);
        assert_eq!(new.extracted_text, "Python developer, SQL and Docker pipelines");
    }

    #[test]
    fn test_parse_skill_list() {
        assert_eq!(
            parse_skill_list("Python, sql ,\nDocker,, python"),
            vec!["Python", "sql", "Docker"]
        );
        assert!(parse_skill_list("  , ").is_empty());
    }
}
