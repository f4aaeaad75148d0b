use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPostingRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    /// Older postings only carry keywords.
    pub required_keywords: Vec<String>,
    pub is_technical: bool,
    /// active | inactive | closed
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl JobPostingRow {
    /// Skills used for scoring: `required_skills`, or `required_keywords` when that is empty.
    pub fn scoring_skills(&self) -> &[String] {
        if self.required_skills.is_empty() {
            &self.required_keywords
        } else {
            &self.required_skills
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(skills: &[&str], keywords: &[&str]) -> JobPostingRow {
        JobPostingRow {
            id: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            description: "Build services".to_string(),
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            required_keywords: keywords.iter().map(|s| s.to_string()).collect(),
            is_technical: true,
            status: "active".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_scoring_skills_prefers_required_skills() {
        let j = job(&["rust"], &["java"]);
        assert_eq!(j.scoring_skills(), ["rust".to_string()]);
    }

    #[test]
    fn test_scoring_skills_falls_back_to_keywords() {
        let j = job(&[], &["java", "sql"]);
        assert_eq!(j.scoring_skills(), ["java".to_string(), "sql".to_string()]);
    }

    #[test]
    fn test_is_active() {
        let mut j = job(&[], &[]);
        assert!(j.is_active());
        j.status = "closed".to_string();
        assert!(!j.is_active());
    }
}
