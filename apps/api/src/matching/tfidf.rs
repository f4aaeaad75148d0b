//! TF-IDF cosine similarity over a two-document corpus: the résumé and the job description
//! (with its required skills appended).

use std::collections::{BTreeSet, HashMap};

use crate::matching::tokenize::{expand_terms, tokenize};

/// Corpus size: résumé + job.
const CORPUS_SIZE: f64 = 2.0;

/// Scores résumé text against a job description and its required skills. Always in `0..=100`.
pub fn compute_match_score(
    resume_text: &str,
    job_description: &str,
    required_skills: &[String],
) -> u8 {
    let skills = required_skills
        .iter()
        .map(|s| s.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let job_text = format!("{job_description} {skills}");

    let resume_terms = expand_terms(&tokenize(resume_text));
    let job_terms = expand_terms(&tokenize(&job_text));

    if resume_terms.is_empty() && job_terms.is_empty() {
        return 0;
    }

    let similarity = cosine_similarity_of(&resume_terms, &job_terms);
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}

fn cosine_similarity_of(resume: &BTreeSet<String>, job: &BTreeSet<String>) -> f64 {
    let tf_resume = term_frequency(resume.iter().map(String::as_str));
    let tf_job = term_frequency(job.iter().map(String::as_str));

    let vocabulary: BTreeSet<&str> = resume
        .iter()
        .chain(job.iter())
        .map(String::as_str)
        .collect();

    let mut resume_vec = Vec::with_capacity(vocabulary.len());
    let mut job_vec = Vec::with_capacity(vocabulary.len());
    for term in vocabulary {
        let df = tf_resume.contains_key(term) as u32 + tf_job.contains_key(term) as u32;
        let idf = smoothed_idf(df);
        resume_vec.push(tf_resume.get(term).copied().unwrap_or(0.0) * idf);
        job_vec.push(tf_job.get(term).copied().unwrap_or(0.0) * idf);
    }

    cosine_similarity(&resume_vec, &job_vec)
}

/// Occurrence count over document length. An empty document divides by 1.
fn term_frequency<'a>(terms: impl Iterator<Item = &'a str>) -> HashMap<&'a str, f64> {
    let mut counts: HashMap<&str, f64> = HashMap::new();
    let mut total = 0usize;
    for term in terms {
        *counts.entry(term).or_insert(0.0) += 1.0;
        total += 1;
    }
    let denominator = total.max(1) as f64;
    for value in counts.values_mut() {
        *value /= denominator;
    }
    counts
}

/// `ln((N + 1) / (df + 1)) + 1`; strictly positive for every df in `1..=N`.
fn smoothed_idf(df: u32) -> f64 {
    ((CORPUS_SIZE + 1.0) / (df as f64 + 1.0)).ln() + 1.0
}

/// Zero when either vector has zero norm.
fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(compute_match_score("", "", &[]), 0);
        assert_eq!(compute_match_score("", "anything", &[]), 0);
        assert_eq!(compute_match_score("rust developer", "", &[]), 0);
    }

    #[test]
    fn test_stop_words_only_scores_zero() {
        assert_eq!(compute_match_score("the and of it", "you were there", &[]), 0);
    }

    #[test]
    fn test_identical_documents_score_100() {
        let text = "rust tokio postgres distributed systems";
        assert_eq!(compute_match_score(text, text, &[]), 100);
    }

    #[test]
    fn test_disjoint_documents_score_zero() {
        assert_eq!(compute_match_score("gardening pottery", "rust kubernetes", &[]), 0);
    }

    #[test]
    fn test_required_skills_count_toward_job_document() {
        let without = compute_match_score("python sql", "data engineer", &[]);
        let with = compute_match_score("python sql", "data engineer", &skills(&["Python", "SQL"]));
        assert!(with > without, "with={with} without={without}");
    }

    #[test]
    fn test_alias_spellings_score_equally() {
        let a = compute_match_score("I know reactjs", "needs react", &[]);
        let b = compute_match_score("I know react.js", "needs react", &[]);
        assert_eq!(a, b);
        assert!(a > 0);
    }

    #[test]
    fn test_canonical_name_does_not_match_unrelated_alias_class() {
        assert_eq!(compute_match_score("react", "javascript", &[]), 0);
        assert_eq!(compute_match_score("node", "js", &[]), 0);
    }

    #[test]
    fn test_alias_reaches_canonical() {
        assert!(compute_match_score("js", "javascript", &[]) > 0);
        assert!(compute_match_score("mongo", "mongodb", &[]) > 0);
    }

    #[test]
    fn test_score_is_deterministic() {
        let resume = "Senior engineer: Node.js, MongoDB, Docker, AWS, CI/CD pipelines";
        let job = "Backend role using node, mongo and docker on aws";
        let required = skills(&["Docker", "AWS"]);
        let first = compute_match_score(resume, job, &required);
        for _ in 0..10 {
            assert_eq!(compute_match_score(resume, job, &required), first);
        }
    }

    #[test]
    fn test_score_always_within_range() {
        let vocabulary = [
            "rust", "go", "react.js", "the", "and", "c++", "c#", "node.js", "mongo", "k8s", "-",
            ".", "sql", "ünïcode", "42", "python3", "js", "ts",
        ];
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut soup = || {
            let mut next = || {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                state
            };
            let len = next() % 40;
            (0..len)
                .map(|_| vocabulary[(next() % vocabulary.len() as u64) as usize])
                .collect::<Vec<_>>()
                .join(" ")
        };

        for _ in 0..200 {
            let resume = soup();
            let job = soup();
            let score = compute_match_score(&resume, &job, &[]);
            assert!(score <= 100, "score {score} for {resume:?} vs {job:?}");
        }

        let long = "rust ".repeat(20_000);
        assert!(compute_match_score(&long, "rust engineer", &[]) <= 100);
    }

    #[test]
    fn test_term_frequency_empty_document() {
        let tf = term_frequency(std::iter::empty());
        assert!(tf.is_empty());
    }

    #[test]
    fn test_idf_positive_when_term_in_every_document() {
        assert!((smoothed_idf(2) - 1.0).abs() < f64::EPSILON);
        assert!(smoothed_idf(1) > smoothed_idf(2));
    }

    #[test]
    fn test_cosine_zero_norm_guard() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }
}
