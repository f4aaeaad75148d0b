/// Catalog scanned by `extract_skills`, in output order.
pub const SKILL_CATALOG: &[&str] = &[
    "javascript",
    "python",
    "java",
    "react",
    "node.js",
    "mongodb",
    "sql",
    "html",
    "css",
    "git",
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "machine learning",
    "artificial intelligence",
    "data analysis",
    "project management",
    "agile",
    "scrum",
    "leadership",
    "communication",
];

/// Returns the catalog skills found in `text` (case-insensitive substring match), in catalog
/// order, without duplicates.
pub fn extract_skills(text: &str) -> Vec<&'static str> {
    let text = text.to_lowercase();
    SKILL_CATALOG
        .iter()
        .copied()
        .filter(|skill| text.contains(skill))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_skills_catalog_order() {
        let found = extract_skills("Showed leadership in an Agile team shipping Docker images; fluent in Python.");
        assert_eq!(found, vec!["python", "docker", "agile", "leadership"]);
    }

    #[test]
    fn test_extract_skills_multi_word_phrases() {
        let found = extract_skills("Background in Machine Learning and data analysis");
        assert_eq!(found, vec!["machine learning", "data analysis"]);
    }

    #[test]
    fn test_extract_skills_no_duplicates() {
        let found = extract_skills("sql SQL Sql");
        assert_eq!(found, vec!["sql"]);
    }

    #[test]
    fn test_extract_skills_empty_text() {
        assert!(extract_skills("").is_empty());
    }
}
