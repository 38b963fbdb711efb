//! Cap-based length budget enforcement.
//!
//! A deterministic trim pass applied to the content blocks before the
//! iterative reducer runs. Each step re-estimates and returns early once
//! the content fits, so later (more destructive) steps only fire when the
//! earlier ones were not enough.

use serde::Serialize;
use tracing::info;

use crate::estimate::{estimate_lines, TARGET_LINES_PER_PAGE};
use crate::models::ContentSet;

pub const MAX_EXPERIENCES: usize = 4;
pub const MAX_EXPERIENCE_BULLETS: usize = 3;
pub const MAX_PROJECTS: usize = 3;
pub const MAX_PROJECT_BULLETS: usize = 2;
pub const MAX_SKILLS: usize = 16;
pub const MAX_SUMMARY_WORDS: usize = 100;
pub const MAX_EDUCATION_ENTRIES: usize = 2;

/// What the trim pass removed, by category.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrimReport {
    pub trimmed_experiences: usize,
    pub trimmed_experience_bullets: usize,
    pub trimmed_projects: usize,
    pub trimmed_project_bullets: usize,
    pub trimmed_skills: usize,
    pub trimmed_summary_words: usize,
    pub trimmed_education: usize,
    pub estimated_lines_before: u32,
    pub estimated_lines_after: u32,
    pub estimated_pages_before: f64,
    pub estimated_pages_after: f64,
}

impl TrimReport {
    pub fn anything_trimmed(&self) -> bool {
        self.trimmed_experiences
            + self.trimmed_experience_bullets
            + self.trimmed_projects
            + self.trimmed_project_bullets
            + self.trimmed_skills
            + self.trimmed_summary_words
            + self.trimmed_education
            > 0
    }
}

/// Keeps the first `max` bullets, dropping the rest. Bullets are assumed
/// ordered by importance by the upstream selection stage.
pub fn truncate_bullets(bullets: &mut Vec<String>, max: usize) -> usize {
    if bullets.len() <= max {
        return 0;
    }
    let removed = bullets.len() - max;
    bullets.truncate(max);
    removed
}

/// Truncates to a word budget, appending an ellipsis when anything is cut.
pub fn truncate_summary(text: &str, max_words: usize) -> (String, usize) {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return (text.to_string(), 0);
    }
    let removed = words.len() - max_words;
    let mut truncated = words[..max_words].join(" ");
    truncated.push_str("...");
    (truncated, removed)
}

/// Trims `content` in place until it fits `max_pages`, in fixed priority
/// order: summary words, experience bullets, project bullets, experience
/// entries, project entries, skills, education entries.
pub fn enforce_budget(content: &mut ContentSet, max_pages: u32) -> TrimReport {
    let mut report = TrimReport::default();
    let max_total_lines = TARGET_LINES_PER_PAGE * max_pages;

    let before = estimate_lines(content);
    report.estimated_lines_before = before;
    report.estimated_pages_before = f64::from(before) / f64::from(TARGET_LINES_PER_PAGE);

    let finish = |report: &mut TrimReport, content: &ContentSet| {
        let after = estimate_lines(content);
        report.estimated_lines_after = after;
        report.estimated_pages_after = f64::from(after) / f64::from(TARGET_LINES_PER_PAGE);
    };

    if before <= max_total_lines {
        info!("content already within length budget, no trimming needed");
        finish(&mut report, content);
        return report;
    }

    // Errored blocks are invisible to the estimator, so trimming them
    // would mutate content the render never shows. Each step checks the
    // block status before touching the raw vectors.

    // 1. Summary word cap.
    if content.summary.status.is_success() {
        let (truncated, removed) = truncate_summary(&content.summary.summary, MAX_SUMMARY_WORDS);
        if removed > 0 {
            info!(words_removed = removed, "truncated summary");
            content.summary.summary = truncated;
            report.trimmed_summary_words = removed;
            if estimate_lines(content) <= max_total_lines {
                finish(&mut report, content);
                return report;
            }
        }
    }

    // 2. Experience bullet cap, per entry.
    if content.experiences.status.is_success() {
        for exp in &mut content.experiences.selected_experiences {
            let removed = truncate_bullets(&mut exp.bullets, MAX_EXPERIENCE_BULLETS);
            if removed > 0 {
                info!(title = %exp.title, removed, "truncated experience bullets");
                report.trimmed_experience_bullets += removed;
            }
        }
        if report.trimmed_experience_bullets > 0 && estimate_lines(content) <= max_total_lines {
            finish(&mut report, content);
            return report;
        }
    }

    // 3. Project bullet cap, per entry.
    if content.projects.status.is_success() {
        for proj in &mut content.projects.selected_projects {
            let removed = truncate_bullets(&mut proj.bullets, MAX_PROJECT_BULLETS);
            if removed > 0 {
                info!(name = %proj.name, removed, "truncated project bullets");
                report.trimmed_project_bullets += removed;
            }
        }
        if report.trimmed_project_bullets > 0 && estimate_lines(content) <= max_total_lines {
            finish(&mut report, content);
            return report;
        }
    }

    // 4. Experience entry cap.
    if content.experiences.status.is_success() {
        let exps = &mut content.experiences.selected_experiences;
        if exps.len() > MAX_EXPERIENCES {
            let removed = exps.len() - MAX_EXPERIENCES;
            exps.truncate(MAX_EXPERIENCES);
            info!(removed, "truncated experience entries");
            report.trimmed_experiences = removed;
            if estimate_lines(content) <= max_total_lines {
                finish(&mut report, content);
                return report;
            }
        }
    }

    // 5. Project entry cap.
    if content.projects.status.is_success() {
        let projs = &mut content.projects.selected_projects;
        if projs.len() > MAX_PROJECTS {
            let removed = projs.len() - MAX_PROJECTS;
            projs.truncate(MAX_PROJECTS);
            info!(removed, "truncated project entries");
            report.trimmed_projects = removed;
            if estimate_lines(content) <= max_total_lines {
                finish(&mut report, content);
                return report;
            }
        }
    }

    // 6. Skills cap.
    if content.skills.status.is_success() {
        let skills = &mut content.skills.skills;
        if skills.len() > MAX_SKILLS {
            let removed = skills.len() - MAX_SKILLS;
            skills.truncate(MAX_SKILLS);
            info!(removed, "truncated skills");
            report.trimmed_skills = removed;
            if estimate_lines(content) <= max_total_lines {
                finish(&mut report, content);
                return report;
            }
        }
    }

    // 7. Education entry cap, last resort.
    if content.education.status.is_success() {
        let edus = &mut content.education.education;
        if edus.len() > MAX_EDUCATION_ENTRIES {
            let removed = edus.len() - MAX_EDUCATION_ENTRIES;
            edus.truncate(MAX_EDUCATION_ENTRIES);
            info!(removed, "truncated education entries");
            report.trimmed_education = removed;
        }
    }

    finish(&mut report, content);
    report
}

/// Single-line human summary for the run log.
pub fn format_trim_summary(report: &TrimReport) -> String {
    if !report.anything_trimmed() {
        return "no trimming needed".to_string();
    }
    let mut parts = Vec::new();
    if report.trimmed_summary_words > 0 {
        parts.push(format!("{} summary words", report.trimmed_summary_words));
    }
    if report.trimmed_experience_bullets > 0 {
        parts.push(format!("{} experience bullets", report.trimmed_experience_bullets));
    }
    if report.trimmed_project_bullets > 0 {
        parts.push(format!("{} project bullets", report.trimmed_project_bullets));
    }
    if report.trimmed_experiences > 0 {
        parts.push(format!("{} experiences", report.trimmed_experiences));
    }
    if report.trimmed_projects > 0 {
        parts.push(format!("{} projects", report.trimmed_projects));
    }
    if report.trimmed_skills > 0 {
        parts.push(format!("{} skills", report.trimmed_skills));
    }
    if report.trimmed_education > 0 {
        parts.push(format!("{} education entries", report.trimmed_education));
    }
    format!("trimmed {}", parts.join(", "))
}
