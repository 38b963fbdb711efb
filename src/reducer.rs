//! Iterative page reducer.
//!
//! The control loop: estimate, stop if within target, otherwise remove the
//! single least-valuable unit of content, persist, and re-estimate. One
//! unit per iteration keeps the removal log auditable and bounds overshoot.
//!
//! Removal priority is fixed: experience bullets down to a per-entry floor,
//! then whole projects, then skills, then education entries. Relevance is
//! keyword overlap against the parsed job description; ties go to the
//! earliest item so reruns are reproducible.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::estimate::estimate;
use crate::models::ContentSet;
use crate::store::ArtifactStore;

/// Minimum bullets kept per experience entry.
pub const BULLET_FLOOR: usize = 1;

/// Category of a removed unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalKind {
    Bullet,
    Project,
    Skill,
    EducationEntry,
}

/// One entry in the audit log, in removal order.
#[derive(Debug, Clone, Serialize)]
pub struct RemovalLogEntry {
    pub iteration: u32,
    #[serde(rename = "type")]
    pub kind: RemovalKind,
    pub item: String,
    pub reason: String,
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionStatus {
    /// Estimate reached the target.
    Converged,
    /// Nothing removable remained while still over target.
    ContentExhausted,
    /// Iteration cap reached while still over target.
    IterationLimit,
}

/// Outcome of one reducer run. Immutable once returned.
#[derive(Debug, Clone, Serialize)]
pub struct ReductionResult {
    pub run_id: Uuid,
    pub status: ReductionStatus,
    pub message: String,
    pub iterations: u32,
    pub initial_estimated_pages: f64,
    pub final_estimated_pages: f64,
    pub target_met: bool,
    pub items_removed: Vec<RemovalLogEntry>,
    pub finished_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Victim {
    Bullet { exp_idx: usize, bullet_idx: usize },
    Project { idx: usize },
    Skill { idx: usize },
    Education { idx: usize },
}

/// Keyword-overlap relevance: how many JD keywords the text mentions.
fn relevance(text: &str, keywords: &[String]) -> usize {
    let lower = text.to_lowercase();
    keywords.iter().filter(|kw| lower.contains(kw.as_str())).count()
}

/// Index of the least relevant item; strict `<` keeps the earliest on ties.
fn least_relevant(texts: impl Iterator<Item = String>, keywords: &[String]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (idx, text) in texts.enumerate() {
        let score = relevance(&text, keywords);
        match best {
            Some((_, best_score)) if score >= best_score => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}

fn project_text(proj: &crate::models::ProjectEntry) -> String {
    let mut text = format!("{} {}", proj.name, proj.description);
    for bullet in &proj.bullets {
        text.push(' ');
        text.push_str(bullet);
    }
    text
}

/// Picks the next unit to remove, or `None` when content is exhausted.
///
/// Experience entries are ordered most-relevant first upstream, so the
/// bullet victim comes from the last entry still above the floor.
fn select_victim(content: &ContentSet, keywords: &[String]) -> Option<Victim> {
    for (exp_idx, exp) in content.experience_entries().iter().enumerate().rev() {
        if exp.bullets.len() > BULLET_FLOOR {
            let bullet_idx = least_relevant(exp.bullets.iter().cloned(), keywords)?;
            return Some(Victim::Bullet { exp_idx, bullet_idx });
        }
    }

    let projects = content.project_entries();
    if !projects.is_empty() {
        let idx = least_relevant(projects.iter().map(project_text), keywords)?;
        return Some(Victim::Project { idx });
    }

    let skills = content.skill_entries();
    if !skills.is_empty() {
        let idx = least_relevant(skills.iter().cloned(), keywords)?;
        return Some(Victim::Skill { idx });
    }

    let education = content.education_entries();
    if !education.is_empty() {
        return Some(Victim::Education { idx: education.len() - 1 });
    }

    None
}

/// Removes the victim from the content and describes it for the log.
fn apply_victim(content: &mut ContentSet, victim: &Victim) -> (RemovalKind, String) {
    match *victim {
        Victim::Bullet { exp_idx, bullet_idx } => {
            let exp = &mut content.experiences.selected_experiences[exp_idx];
            let bullet = exp.bullets.remove(bullet_idx);
            let item = format!("{}: {}", exp.title, bullet);
            (RemovalKind::Bullet, item)
        }
        Victim::Project { idx } => {
            let proj = content.projects.selected_projects.remove(idx);
            (RemovalKind::Project, proj.name)
        }
        Victim::Skill { idx } => {
            let skill = content.skills.skills.remove(idx);
            (RemovalKind::Skill, skill)
        }
        Victim::Education { idx } => {
            let entry = content.education.education.remove(idx);
            let item = format!("{} ({})", entry.degree, entry.school);
            (RemovalKind::EducationEntry, item)
        }
    }
}

/// Runs the reduction loop against the persisted content blocks.
///
/// Each removal is written back to the store before the next estimate, so
/// an interrupted run leaves consistent state behind. Failing to reach the
/// target is not an error: the result reports `target_met=false` with a
/// status distinguishing exhausted content from the iteration cap.
pub fn iteratively_reduce_pages(
    store: &ArtifactStore,
    target_pages: f64,
    max_iterations: u32,
) -> Result<ReductionResult, AppError> {
    let mut content = store.load_content()?;
    let keywords = store.load_jd()?.keyword_list();

    let initial = estimate(&content);
    info!(
        estimated_pages = initial.estimated_pages,
        target_pages, "starting page reduction"
    );

    let mut items_removed = Vec::new();
    let mut iterations = 0u32;
    let mut current = initial.estimated_pages;

    let status = loop {
        if current <= target_pages {
            break ReductionStatus::Converged;
        }
        if iterations >= max_iterations {
            break ReductionStatus::IterationLimit;
        }
        let Some(victim) = select_victim(&content, &keywords) else {
            break ReductionStatus::ContentExhausted;
        };

        iterations += 1;
        let (kind, item) = apply_victim(&mut content, &victim);
        info!(iteration = iterations, ?kind, item = %item, "removed content unit");
        items_removed.push(RemovalLogEntry {
            iteration: iterations,
            kind,
            item,
            reason: format!(
                "over target ({current:.2} > {target_pages:.2} pages), lowest relevance in tier"
            ),
        });

        store.save_content(&content)?;
        current = estimate(&content).estimated_pages;
    };

    let target_met = current <= target_pages;
    let message = match status {
        ReductionStatus::Converged if iterations == 0 => {
            "content already within target, no removals needed".to_string()
        }
        ReductionStatus::Converged => {
            format!("converged after {iterations} removals")
        }
        ReductionStatus::ContentExhausted => format!(
            "nothing left to remove at {current:.2} pages (target {target_pages:.2})"
        ),
        ReductionStatus::IterationLimit => format!(
            "iteration cap {max_iterations} reached at {current:.2} pages (target {target_pages:.2})"
        ),
    };
    info!(?status, iterations, final_pages = current, "page reduction finished");

    Ok(ReductionResult {
        run_id: Uuid::new_v4(),
        status,
        message,
        iterations,
        initial_estimated_pages: initial.estimated_pages,
        final_estimated_pages: current,
        target_met,
        items_removed,
        finished_at: Utc::now(),
    })
}
