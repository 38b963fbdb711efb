use serde::{Deserialize, Serialize};

use super::BlockStatus;

/// Parsed job-description block used for relevance scoring.
///
/// Only the keyword inventory matters to the reducer; `skills` is merged in
/// because some upstream parsers split the two lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JdBlock {
    #[serde(default)]
    pub status: BlockStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl JdBlock {
    /// Ordered, lowercased, deduplicated keyword list for relevance scoring.
    pub fn keyword_list(&self) -> Vec<String> {
        if !self.status.is_success() {
            return Vec::new();
        }
        let mut seen = Vec::new();
        for kw in self.keywords.iter().chain(self.skills.iter()) {
            let lower = kw.trim().to_lowercase();
            if !lower.is_empty() && !seen.contains(&lower) {
                seen.push(lower);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_list_merges_and_dedupes() {
        let jd: JdBlock = serde_json::from_str(
            r#"{"keywords": ["Rust", "SQL"], "skills": ["rust", "Kafka"]}"#,
        )
        .unwrap();
        assert_eq!(jd.keyword_list(), vec!["rust", "sql", "kafka"]);
    }

    #[test]
    fn test_errored_jd_yields_no_keywords() {
        let jd: JdBlock =
            serde_json::from_str(r#"{"status": "error", "keywords": ["Rust"]}"#).unwrap();
        assert!(jd.keyword_list().is_empty());
    }
}
