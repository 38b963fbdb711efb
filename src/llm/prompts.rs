// Prompt constants and builders for the advisory removal ranking.

use serde_json::json;

use crate::errors::AppError;
use crate::models::{ContentSet, JdBlock};

/// System prompt enforcing JSON-only ranking output.
pub const REMOVAL_RANKING_SYSTEM: &str = "You are a precise, structured assistant. \
    You rank resume content by how expendable it is for a given job description. \
    You MUST respond with valid JSON only: \
    {\"suggestions\": [{\"kind\": \"bullet|project|skill|education_entry\", \
    \"item\": string, \"rationale\": string}]}. \
    Order suggestions least-valuable first. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Builds the user prompt from the current content and JD keywords.
pub fn build_removal_prompt(content: &ContentSet, jd: &JdBlock) -> Result<String, AppError> {
    let payload = json!({
        "jd_keywords": jd.keyword_list(),
        "summary": content.summary_text(),
        "experiences": content.experience_entries(),
        "projects": content.project_entries(),
        "skills": content.skill_entries(),
        "education": content.education_entries(),
    });
    let payload = serde_json::to_string_pretty(&payload)?;

    Ok(format!(
        "The resume content below is over its page budget. Rank up to 10 removable \
         units (experience bullets, whole projects, individual skills, education \
         entries), least valuable to this job description first.\n\n{payload}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExperienceEntry;

    #[test]
    fn test_prompt_includes_keywords_and_content() {
        let mut content = ContentSet::default();
        content.experiences.selected_experiences.push(ExperienceEntry {
            title: "Engineer".to_string(),
            bullets: vec!["Shipped things".to_string()],
            ..Default::default()
        });
        let jd = JdBlock {
            keywords: vec!["Rust".to_string()],
            ..Default::default()
        };

        let prompt = build_removal_prompt(&content, &jd).unwrap();
        assert!(prompt.contains("rust"));
        assert!(prompt.contains("Shipped things"));
    }
}
