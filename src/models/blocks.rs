use serde::{Deserialize, Serialize};

/// Status discriminator carried by every persisted block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStatus {
    #[default]
    Success,
    Error,
}

impl BlockStatus {
    pub fn is_success(self) -> bool {
        self == BlockStatus::Success
    }
}

/// Summary block: `{status, message, summary}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryBlock {
    #[serde(default)]
    pub status: BlockStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub summary: String,
}

/// One work-experience entry with an ordered bullet list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

/// Experience block: `{status, message, selected_experiences}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceBlock {
    #[serde(default)]
    pub status: BlockStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub selected_experiences: Vec<ExperienceEntry>,
}

/// Skills block. Both `skills` and `selected_skills` are accepted on read;
/// `skills` is always written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillsBlock {
    #[serde(default)]
    pub status: BlockStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "selected_skills")]
    pub skills: Vec<String>,
}

/// One project entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

/// Projects block: `{status, message, selected_projects}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectsBlock {
    #[serde(default)]
    pub status: BlockStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub selected_projects: Vec<ProjectEntry>,
}

/// One education entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub location: String,
}

/// Education block: `{status, message, education}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationBlock {
    #[serde(default)]
    pub status: BlockStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
}

/// All structured content blocks for one pipeline run, loaded together.
///
/// The typed accessors return empty views for blocks whose status is not
/// `success`, so callers never consume errored content by accident.
#[derive(Debug, Clone, Default)]
pub struct ContentSet {
    pub summary: SummaryBlock,
    pub experiences: ExperienceBlock,
    pub skills: SkillsBlock,
    pub projects: ProjectsBlock,
    pub education: EducationBlock,
}

impl ContentSet {
    pub fn summary_text(&self) -> &str {
        if self.summary.status.is_success() {
            &self.summary.summary
        } else {
            ""
        }
    }

    pub fn experience_entries(&self) -> &[ExperienceEntry] {
        if self.experiences.status.is_success() {
            &self.experiences.selected_experiences
        } else {
            &[]
        }
    }

    pub fn skill_entries(&self) -> &[String] {
        if self.skills.status.is_success() {
            &self.skills.skills
        } else {
            &[]
        }
    }

    pub fn project_entries(&self) -> &[ProjectEntry] {
        if self.projects.status.is_success() {
            &self.projects.selected_projects
        } else {
            &[]
        }
    }

    pub fn education_entries(&self) -> &[EducationEntry] {
        if self.education.status.is_success() {
            &self.education.education
        } else {
            &[]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_status_defaults_to_success() {
        let block: SummaryBlock = serde_json::from_str(r#"{"summary": "text"}"#).unwrap();
        assert_eq!(block.status, BlockStatus::Success);
        assert_eq!(block.summary, "text");
    }

    #[test]
    fn test_errored_block_content_is_ignored() {
        let mut content = ContentSet::default();
        content.summary.summary = "should not be visible".to_string();
        content.summary.status = BlockStatus::Error;
        assert_eq!(content.summary_text(), "");

        content.experiences.selected_experiences.push(ExperienceEntry::default());
        content.experiences.status = BlockStatus::Error;
        assert!(content.experience_entries().is_empty());
    }

    #[test]
    fn test_skills_accepts_selected_skills_synonym() {
        let block: SkillsBlock = serde_json::from_str(
            r#"{"status": "success", "selected_skills": ["Rust", "SQL"]}"#,
        )
        .unwrap();
        assert_eq!(block.skills, vec!["Rust", "SQL"]);
    }

    #[test]
    fn test_skills_serializes_canonical_key() {
        let block = SkillsBlock {
            skills: vec!["Rust".to_string()],
            ..Default::default()
        };
        let json = serde_json::to_string(&block).unwrap();
        assert!(json.contains(r#""skills""#));
        assert!(!json.contains("selected_skills"));
    }

    #[test]
    fn test_experience_block_roundtrip() {
        let json = r#"{
            "status": "success",
            "message": "",
            "selected_experiences": [{
                "organization": "Acme",
                "title": "Engineer",
                "start": "2020",
                "end": "2023",
                "description": "Backend work",
                "bullets": ["Built services", "Ran migrations"]
            }]
        }"#;
        let block: ExperienceBlock = serde_json::from_str(json).unwrap();
        assert_eq!(block.selected_experiences.len(), 1);
        assert_eq!(block.selected_experiences[0].bullets.len(), 2);
    }
}
