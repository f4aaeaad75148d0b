// Matching engine: résumé vs job posting scoring.
// Pure functions only: no I/O and no shared state.

pub mod keyword;
pub mod scorer;
pub mod skills;
pub mod tfidf;
pub mod tokenize;

pub use keyword::compute_legacy_keyword_score;
pub use scorer::{scoring_text, MatchInput, MatchScorer, ScorerKind};
pub use skills::extract_skills;
pub use tfidf::compute_match_score;
