//! Rendered-length estimation.
//!
//! A deterministic heuristic over structured content, tuned conservatively
//! for wrapped text. The constants are fixed configuration so two calls on
//! identical content always agree, which lets the reducer re-estimate on
//! every iteration for free.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::latex::SectionName;
use crate::models::ContentSet;

/// Rendered lines assumed per page, conservative for wrapped text.
pub const TARGET_LINES_PER_PAGE: u32 = 25;

/// Point-in-time length estimate. Recomputed on demand, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct PageEstimate {
    pub estimated_lines: u32,
    pub estimated_pages: f64,
    pub per_section_lines: BTreeMap<SectionName, u32>,
}

impl PageEstimate {
    pub fn within(&self, target_pages: f64) -> bool {
        self.estimated_pages <= target_pages
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimates total rendered lines for the content set.
pub fn estimate_lines(content: &ContentSet) -> u32 {
    estimate(content).estimated_lines
}

/// Full estimate with the per-section breakdown.
pub fn estimate(content: &ContentSet) -> PageEstimate {
    let mut per_section = BTreeMap::new();

    // Header plus summary. The heading cost rides along with the body cost
    // for each populated section.
    let summary = content.summary_text();
    let summary_body = (word_count(summary) / 8).max(2) as f64;
    let summary_lines = 14.0 + summary_body + 3.0;

    let mut experience_lines = 0.0;
    for exp in content.experience_entries() {
        experience_lines += 6.0; // title, organization, dates, spacing
        for bullet in &exp.bullets {
            experience_lines += (word_count(bullet) / 10 + 1).max(1) as f64;
        }
    }
    if experience_lines > 0.0 {
        experience_lines += 3.0;
    }

    // Projects render inline, roughly half a line per bullet.
    let mut project_lines = 0.0;
    for proj in content.project_entries() {
        project_lines += 3.0;
        if proj.bullets.is_empty() {
            if !proj.description.is_empty() {
                project_lines +=
                    ((word_count(&proj.description) / 15) as f64 + 0.5).max(0.5);
            }
        } else {
            for bullet in &proj.bullets {
                project_lines += ((word_count(bullet) / 15) as f64 + 0.5).max(0.5);
            }
        }
    }
    if project_lines > 0.0 {
        project_lines += 3.0;
    }

    let skill_count = content.skill_entries().len();
    let mut skills_lines = 0.0;
    if skill_count > 0 {
        skills_lines = if skill_count <= 15 {
            8.0
        } else {
            12.0 + ((skill_count - 15) / 5) as f64
        };
        skills_lines += 3.0;
    }

    let education_count = content.education_entries().len();
    let mut education_lines = (education_count * 5) as f64;
    if education_lines > 0.0 {
        education_lines += 3.0;
    }

    let total = (summary_lines + experience_lines + project_lines + skills_lines
        + education_lines) as u32;

    per_section.insert(SectionName::Summary, summary_lines as u32);
    per_section.insert(SectionName::Experience, experience_lines as u32);
    per_section.insert(SectionName::Projects, project_lines as u32);
    per_section.insert(SectionName::Skills, skills_lines as u32);
    per_section.insert(SectionName::Education, education_lines as u32);

    PageEstimate {
        estimated_lines: total,
        estimated_pages: f64::from(total) / f64::from(TARGET_LINES_PER_PAGE),
        per_section_lines: per_section,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EducationEntry, ExperienceEntry, ProjectEntry};

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    fn sample_content() -> ContentSet {
        let mut content = ContentSet::default();
        content.summary.summary = words(80);
        for _ in 0..3 {
            content.experiences.selected_experiences.push(ExperienceEntry {
                organization: "Acme".to_string(),
                title: "Engineer".to_string(),
                bullets: vec![words(18), words(25), words(12)],
                ..Default::default()
            });
        }
        content.projects.selected_projects.push(ProjectEntry {
            name: "cvforge".to_string(),
            bullets: vec![words(20)],
            ..Default::default()
        });
        content.skills.skills = (0..18).map(|i| format!("skill{i}")).collect();
        content.education.education.push(EducationEntry::default());
        content
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let content = sample_content();
        assert_eq!(estimate_lines(&content), estimate_lines(&content));
    }

    #[test]
    fn test_empty_content_is_cheap() {
        let content = ContentSet::default();
        let est = estimate(&content);
        // Header block plus minimum summary body plus its heading.
        assert_eq!(est.estimated_lines, 19);
        assert!(est.estimated_pages < 1.0);
    }

    #[test]
    fn test_removing_a_bullet_never_increases_estimate() {
        let content = sample_content();
        let before = estimate_lines(&content);
        let mut after = content.clone();
        after.experiences.selected_experiences[0].bullets.pop();
        assert!(estimate_lines(&after) <= before);
    }

    #[test]
    fn test_removing_any_unit_is_monotonic() {
        let content = sample_content();
        let before = estimate_lines(&content);

        let mut no_project = content.clone();
        no_project.projects.selected_projects.pop();
        assert!(estimate_lines(&no_project) <= before);

        let mut no_skill = content.clone();
        no_skill.skills.skills.pop();
        assert!(estimate_lines(&no_skill) <= before);

        let mut no_edu = content.clone();
        no_edu.education.education.pop();
        assert!(estimate_lines(&no_edu) <= before);

        let mut no_exp = content.clone();
        no_exp.experiences.selected_experiences.pop();
        assert!(estimate_lines(&no_exp) <= before);
    }

    #[test]
    fn test_skill_wrap_threshold() {
        let mut content = ContentSet::default();
        content.skills.skills = (0..15).map(|i| format!("s{i}")).collect();
        let few = estimate_lines(&content);
        content.skills.skills = (0..25).map(|i| format!("s{i}")).collect();
        let many = estimate_lines(&content);
        assert!(many > few);
    }

    #[test]
    fn test_per_section_breakdown_tracks_content() {
        let content = sample_content();
        let est = estimate(&content);
        assert!(est.per_section_lines[&SectionName::Experience] > 0);
        assert!(est.per_section_lines[&SectionName::Skills] > 0);
        let sum: u32 = est.per_section_lines.values().sum();
        assert!(sum <= est.estimated_lines + SectionName::ALL.len() as u32);
    }

    #[test]
    fn test_pages_derived_from_lines() {
        let content = sample_content();
        let est = estimate(&content);
        assert!(
            (est.estimated_pages
                - f64::from(est.estimated_lines) / f64::from(TARGET_LINES_PER_PAGE))
            .abs()
                < 1e-9
        );
    }
}
