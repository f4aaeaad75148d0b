//! Match Scoring: pluggable strategies that turn a résumé and a job posting into a 0–100 score.
//!
//! Default: `TfIdfScorer` (vector-space similarity against description + skills).
//! Legacy: `KeywordOverlapScorer` (share of required skills mentioned in the résumé).
//!
//! `AppState` holds an `Arc<dyn MatchScorer>`, chosen at startup via `MATCH_SCORER`.

use std::str::FromStr;

use crate::matching::{compute_legacy_keyword_score, compute_match_score};

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

/// Borrowed view of everything a scorer may look at.
#[derive(Debug, Clone, Copy)]
pub struct MatchInput<'a> {
    pub resume_text: &'a str,
    pub job_description: &'a str,
    pub required_skills: &'a [String],
}

/// Picks the text that gets scored: the résumé when it has content, otherwise the
/// applicant-provided skills joined with spaces, otherwise an empty string (scores 0).
pub fn scoring_text(resume_text: Option<&str>, provided_skills: &[String]) -> String {
    match resume_text.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => provided_skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to add a scoring strategy. Callers pick one explicitly; the strategies are
/// never blended.
pub trait MatchScorer: Send + Sync {
    fn score(&self, input: &MatchInput<'_>) -> u8;

    /// Short label recorded alongside scores: "tfidf" | "keyword".
    fn backend(&self) -> &'static str;
}

/// TF-IDF cosine similarity between the résumé and description + required skills.
pub struct TfIdfScorer;

impl MatchScorer for TfIdfScorer {
    fn score(&self, input: &MatchInput<'_>) -> u8 {
        compute_match_score(input.resume_text, input.job_description, input.required_skills)
    }

    fn backend(&self) -> &'static str {
        "tfidf"
    }
}

/// Percentage of required skills found verbatim in the résumé. Ignores the description.
pub struct KeywordOverlapScorer;

impl MatchScorer for KeywordOverlapScorer {
    fn score(&self, input: &MatchInput<'_>) -> u8 {
        compute_legacy_keyword_score(input.resume_text, input.required_skills)
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Selection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScorerKind {
    #[default]
    TfIdf,
    Keyword,
}

impl ScorerKind {
    pub fn build(self) -> Box<dyn MatchScorer> {
        match self {
            ScorerKind::TfIdf => Box::new(TfIdfScorer),
            ScorerKind::Keyword => Box::new(KeywordOverlapScorer),
        }
    }
}

impl FromStr for ScorerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tfidf" | "tf-idf" => Ok(ScorerKind::TfIdf),
            "keyword" => Ok(ScorerKind::Keyword),
            other => Err(format!("unknown match scorer '{other}' (expected tfidf or keyword)")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scoring_text_prefers_resume() {
        let text = scoring_text(Some("Rust engineer"), &skills(&["python"]));
        assert_eq!(text, "Rust engineer");
    }

    #[test]
    fn test_scoring_text_falls_back_to_skills() {
        assert_eq!(scoring_text(None, &skills(&["python", " sql "])), "python sql");
        assert_eq!(scoring_text(Some("  \n"), &skills(&["go"])), "go");
    }

    #[test]
    fn test_scoring_text_empty_when_nothing_provided() {
        assert_eq!(scoring_text(None, &[]), "");
    }

    #[test]
    fn test_strategies_are_independent() {
        let required = skills(&["Python", "SQL", "Java"]);
        let input = MatchInput {
            resume_text: "python and sql",
            job_description: "Data platform engineer",
            required_skills: &required,
        };
        assert_eq!(KeywordOverlapScorer.score(&input), 67);
        assert_eq!(
            TfIdfScorer.score(&input),
            compute_match_score("python and sql", "Data platform engineer", &required)
        );
    }

    #[test]
    fn test_backend_labels() {
        assert_eq!(TfIdfScorer.backend(), "tfidf");
        assert_eq!(KeywordOverlapScorer.backend(), "keyword");
    }

    #[test]
    fn test_scorer_kind_parse() {
        assert_eq!("tfidf".parse::<ScorerKind>().unwrap(), ScorerKind::TfIdf);
        assert_eq!(" Keyword ".parse::<ScorerKind>().unwrap(), ScorerKind::Keyword);
        assert!("bm25".parse::<ScorerKind>().is_err());
        assert_eq!(ScorerKind::default().build().backend(), "tfidf");
    }
}
