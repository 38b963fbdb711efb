//! Logical section names, synonym resolution, and section removal.
//!
//! Removal is persisted as a set of section names and applied at render
//! time by rewriting the document text. Content JSON is never touched; a
//! restored section reappears on the next render.

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Canonical logical sections of a rendered résumé.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SectionName {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Achievements,
    #[serde(rename = "Additional Info")]
    AdditionalInfo,
    Header,
}

impl SectionName {
    pub const ALL: [SectionName; 8] = [
        SectionName::Summary,
        SectionName::Experience,
        SectionName::Education,
        SectionName::Skills,
        SectionName::Projects,
        SectionName::Achievements,
        SectionName::AdditionalInfo,
        SectionName::Header,
    ];

    /// Heading text as it appears in `\section*{..}`.
    pub fn display_name(self) -> &'static str {
        match self {
            SectionName::Summary => "Summary",
            SectionName::Experience => "Experience",
            SectionName::Education => "Education",
            SectionName::Skills => "Skills",
            SectionName::Projects => "Projects",
            SectionName::Achievements => "Achievements",
            SectionName::AdditionalInfo => "Additional Info",
            SectionName::Header => "Header",
        }
    }

    /// Marker tag used in `% BEGIN:<TAG>` / `% END:<TAG>` comments.
    pub fn marker_tag(self) -> &'static str {
        match self {
            SectionName::Summary => "SUMMARY",
            SectionName::Experience => "EXPERIENCE",
            SectionName::Education => "EDUCATION",
            SectionName::Skills => "SKILLS",
            SectionName::Projects => "PROJECTS",
            SectionName::Achievements => "ACHIEVEMENTS",
            SectionName::AdditionalInfo => "ADDITIONAL",
            SectionName::Header => "HEADER",
        }
    }

    /// Resolves a user-supplied name (any casing, common synonyms) to a
    /// canonical section.
    pub fn resolve(name: &str) -> Option<SectionName> {
        match name.trim().to_lowercase().as_str() {
            "summary" | "professional summary" | "profile summary" => Some(SectionName::Summary),
            "experience" | "work" | "employment" | "work experience" => {
                Some(SectionName::Experience)
            }
            "education" | "degree" | "degrees" => Some(SectionName::Education),
            "skills" | "skill" => Some(SectionName::Skills),
            "projects" | "project" => Some(SectionName::Projects),
            "achievements" | "achievement" => Some(SectionName::Achievements),
            "additional info" | "additional information" => Some(SectionName::AdditionalInfo),
            "header" | "contact" => Some(SectionName::Header),
            _ => None,
        }
    }
}

impl std::fmt::Display for SectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Persisted set of sections excluded from the rendered document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalSet {
    #[serde(default)]
    pub removed_sections: BTreeSet<SectionName>,
}

impl RemovalSet {
    pub fn mark(&mut self, section: SectionName) -> bool {
        self.removed_sections.insert(section)
    }

    pub fn unmark(&mut self, section: SectionName) -> bool {
        self.removed_sections.remove(&section)
    }

    pub fn contains(&self, section: SectionName) -> bool {
        self.removed_sections.contains(&section)
    }

    pub fn is_empty(&self) -> bool {
        self.removed_sections.is_empty()
    }
}

/// Rewrites the document so every section in `set` is absent.
///
/// Per section, progressively looser patterns are tried and the first match
/// wins: heading followed by the full marker block, heading and marker
/// opening on one line, then the marker block alone. No match means the
/// section was already absent, which is not an error.
pub fn apply_section_removals(document: &str, set: &RemovalSet) -> Result<String, AppError> {
    let mut doc = document.to_string();
    for section in &set.removed_sections {
        doc = remove_section(&doc, *section)?;
    }
    Ok(doc)
}

fn remove_section(document: &str, section: SectionName) -> Result<String, AppError> {
    let heading = regex::escape(section.display_name());
    let tag = regex::escape(section.marker_tag());

    let patterns = [
        // Heading line, then the full marker block.
        format!(
            r"(?s)\\section\*\{{{heading}\}}[ \t]*\n\s*% BEGIN:{tag}\b.*?% END:{tag}[ \t]*\n?"
        ),
        // Heading and marker opening share a line.
        format!(r"(?s)\\section\*\{{{heading}\}}[^\n]*% BEGIN:{tag}\b.*?% END:{tag}[ \t]*\n?"),
        // Marker block alone, heading already gone.
        format!(r"(?s)% BEGIN:{tag}\b.*?% END:{tag}[ \t]*\n?"),
    ];

    for pattern in &patterns {
        let re = compile(pattern)?;
        if re.is_match(document) {
            return Ok(re.replace(document, "").into_owned());
        }
    }
    Ok(document.to_string())
}

fn compile(pattern: &str) -> Result<Regex, AppError> {
    Regex::new(pattern).map_err(|e| AppError::Internal(anyhow::anyhow!("bad pattern: {e}")))
}
