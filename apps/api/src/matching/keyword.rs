/// Legacy keyword-overlap score: percentage of required keywords that appear (case-insensitive
/// substring) in the résumé text. Zero when no keywords are required.
pub fn compute_legacy_keyword_score(resume_text: &str, required_keywords: &[String]) -> u8 {
    if required_keywords.is_empty() {
        return 0;
    }

    let text = resume_text.to_lowercase();
    let matched = required_keywords
        .iter()
        .filter(|keyword| text.contains(&keyword.to_lowercase()))
        .count();

    ((matched as f64 / required_keywords.len() as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_keywords_score_zero() {
        assert_eq!(compute_legacy_keyword_score("python and sql", &[]), 0);
    }

    #[test]
    fn test_partial_match_rounds() {
        let score =
            compute_legacy_keyword_score("python and sql", &keywords(&["Python", "SQL", "Java"]));
        assert_eq!(score, 67);
    }

    #[test]
    fn test_full_and_no_match() {
        let required = keywords(&["Docker", "AWS"]);
        assert_eq!(compute_legacy_keyword_score("Docker on AWS", &required), 100);
        assert_eq!(compute_legacy_keyword_score("", &required), 0);
    }

    #[test]
    fn test_substring_semantics() {
        // "java" is a substring of "javascript"
        assert_eq!(compute_legacy_keyword_score("javascript", &keywords(&["Java"])), 100);
    }
}
