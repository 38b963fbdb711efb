//! File-backed artifact store.
//!
//! Every pipeline stage reads and writes named JSON artifacts under a single
//! output directory. Absent or unparseable block files degrade to an empty
//! default with a warning rather than aborting the run; real I/O failures
//! still propagate.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::errors::AppError;
use crate::latex::sections::RemovalSet;
use crate::models::{
    ContentSet, EducationBlock, ExperienceBlock, JdBlock, ProjectsBlock, SkillsBlock, SummaryBlock,
};

pub const SUMMARY_FILE: &str = "summary.json";
pub const EXPERIENCES_FILE: &str = "selected_experiences.json";
pub const SKILLS_FILE: &str = "selected_skills.json";
pub const PROJECTS_FILE: &str = "selected_projects.json";
pub const EDUCATION_FILE: &str = "education.json";
pub const JD_FILE: &str = "parsed_jd.json";
pub const REMOVAL_FILE: &str = "section_removal.json";
pub const RENDERED_TEX_FILE: &str = "rendered_resume.tex";

/// Handle on one run's artifact directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Reads a JSON artifact, returning the default value when the file is
    /// missing or does not parse. Upstream stages that failed leave behind
    /// either nothing or malformed output; both mean "no content here".
    pub fn read_json_or_default<T>(&self, name: &str) -> Result<T, AppError>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path_of(name);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(artifact = name, "artifact missing, using empty default");
                return Ok(T::default());
            }
            Err(e) => return Err(AppError::Io(e)),
        };
        match serde_json::from_str(strip_fences(&raw)) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(artifact = name, error = %e, "artifact unparseable, using empty default");
                Ok(T::default())
            }
        }
    }

    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<(), AppError> {
        std::fs::create_dir_all(&self.root)?;
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(self.path_of(name), json)?;
        Ok(())
    }

    pub fn read_text(&self, name: &str) -> Result<String, AppError> {
        std::fs::read_to_string(self.path_of(name)).map_err(AppError::Io)
    }

    pub fn write_text(&self, name: &str, content: &str) -> Result<(), AppError> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.path_of(name), content)?;
        Ok(())
    }

    // ── typed artifact accessors ──────────────────────────────────────────

    pub fn load_content(&self) -> Result<ContentSet, AppError> {
        Ok(ContentSet {
            summary: self.read_json_or_default::<SummaryBlock>(SUMMARY_FILE)?,
            experiences: self.read_json_or_default::<ExperienceBlock>(EXPERIENCES_FILE)?,
            skills: self.read_json_or_default::<SkillsBlock>(SKILLS_FILE)?,
            projects: self.read_json_or_default::<ProjectsBlock>(PROJECTS_FILE)?,
            education: self.read_json_or_default::<EducationBlock>(EDUCATION_FILE)?,
        })
    }

    pub fn save_content(&self, content: &ContentSet) -> Result<(), AppError> {
        self.write_json(SUMMARY_FILE, &content.summary)?;
        self.write_json(EXPERIENCES_FILE, &content.experiences)?;
        self.write_json(SKILLS_FILE, &content.skills)?;
        self.write_json(PROJECTS_FILE, &content.projects)?;
        self.write_json(EDUCATION_FILE, &content.education)?;
        Ok(())
    }

    pub fn load_jd(&self) -> Result<JdBlock, AppError> {
        self.read_json_or_default(JD_FILE)
    }

    pub fn load_removal_set(&self) -> Result<RemovalSet, AppError> {
        self.read_json_or_default(REMOVAL_FILE)
    }

    pub fn save_removal_set(&self, set: &RemovalSet) -> Result<(), AppError> {
        self.write_json(REMOVAL_FILE, set)
    }
}

/// Strips a single surrounding markdown code fence, if present. Upstream
/// tools occasionally persist LLM output verbatim, fences included.
pub fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}
