//! End-to-end assembly: trim, reduce, render, strip removed sections,
//! and fall back to the compact layout when the estimate is still over
//! target. Each stage persists its output so a rerun picks up where the
//! last one left off.

use tracing::{info, warn};

use crate::budget::{enforce_budget, format_trim_summary, TrimReport};
use crate::errors::AppError;
use crate::estimate::{estimate, PageEstimate};
use crate::latex::{
    apply_section_removals, inject_compact_layout, render_document, scan_control_words,
    section_is_empty, RemovalSet, SectionName, DEFAULT_TEMPLATE,
};
use crate::reducer::{iteratively_reduce_pages, ReductionResult};
use crate::store::{ArtifactStore, RENDERED_TEX_FILE};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub target_pages: f64,
    pub max_iterations: u32,
    /// Custom template text; the built-in template is used when `None`.
    pub template: Option<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            target_pages: 2.0,
            max_iterations: 5,
            template: None,
        }
    }
}

/// What one pipeline run did, stage by stage.
#[derive(Debug)]
pub struct PipelineReport {
    pub trim: TrimReport,
    pub reduction: ReductionResult,
    pub removed_sections: RemovalSet,
    pub final_estimate: PageEstimate,
    pub compact_applied: bool,
    pub document: String,
}

/// Runs the full pipeline against one artifact directory.
pub fn run(store: &ArtifactStore, options: &PipelineOptions) -> Result<PipelineReport, AppError> {
    // Stage 1: deterministic cap-based trim, persisted before the loop.
    let mut content = store.load_content()?;
    let max_pages = options.target_pages.ceil().max(1.0) as u32;
    let trim = enforce_budget(&mut content, max_pages);
    info!("length budget: {}", format_trim_summary(&trim));
    store.save_content(&content)?;

    // Stage 2: iterative one-unit-per-step reduction.
    let reduction = iteratively_reduce_pages(store, options.target_pages, options.max_iterations)?;

    // Stage 3: render from the post-reduction blocks.
    let content = store.load_content()?;
    let template = options.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
    let mut document = render_document(&content, template);

    // Stage 4: drop removed sections, plus any that rendered empty.
    let mut removals = store.load_removal_set()?;
    for section in SectionName::ALL {
        if section_is_empty(&content, section) && !removals.contains(section) {
            info!(section = %section, "section rendered empty, omitting");
            removals.mark(section);
        }
    }
    if !removals.is_empty() {
        document = apply_section_removals(&document, &removals)?;
    }

    let violations = scan_control_words(&document);
    if !violations.is_empty() {
        // Never expected: an edit path stripped a backslash.
        return Err(AppError::Validation(format!(
            "control word integrity violation: {violations:?}"
        )));
    }

    // Stage 5: compact layout when the estimate still exceeds the target.
    let final_estimate = estimate(&content);
    let compact_applied = !final_estimate.within(options.target_pages);
    if compact_applied {
        warn!(
            estimated_pages = final_estimate.estimated_pages,
            target_pages = options.target_pages,
            "still over target after reduction, applying compact layout"
        );
        document = inject_compact_layout(&document);
    }

    store.write_text(RENDERED_TEX_FILE, &document)?;
    info!(artifact = RENDERED_TEX_FILE, "rendered document written");

    Ok(PipelineReport {
        trim,
        reduction,
        removed_sections: removals,
        final_estimate,
        compact_applied,
        document,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentSet, ExperienceEntry, JdBlock};
    use crate::reducer::ReductionStatus;
    use crate::store::JD_FILE;

    fn words(n: usize) -> String {
        vec!["filler"; n].join(" ")
    }

    fn make_store(content: &ContentSet) -> (tempfile::TempDir, ArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.save_content(content).unwrap();
        store.write_json(JD_FILE, &JdBlock::default()).unwrap();
        (dir, store)
    }

    fn modest_content() -> ContentSet {
        let mut content = ContentSet::default();
        content.summary.summary = "Backend engineer.".to_string();
        content.experiences.selected_experiences.push(ExperienceEntry {
            title: "Engineer".to_string(),
            organization: "Acme".to_string(),
            bullets: vec!["Shipped the platform".to_string()],
            ..Default::default()
        });
        content.skills.skills = vec!["Rust".to_string()];
        content
    }

    #[test]
    fn test_fitting_content_renders_without_compact_layout() {
        let (_dir, store) = make_store(&modest_content());
        let report = run(&store, &PipelineOptions::default()).unwrap();

        assert_eq!(report.reduction.status, ReductionStatus::Converged);
        assert!(report.reduction.target_met);
        assert!(!report.compact_applied);
        assert!(!report.document.contains("\\compactresumelayout"));
        assert!(report.document.contains("Shipped the platform"));

        let on_disk = store.read_text(RENDERED_TEX_FILE).unwrap();
        assert_eq!(on_disk, report.document);
    }

    #[test]
    fn test_empty_sections_are_omitted_from_output() {
        let (_dir, store) = make_store(&modest_content());
        let report = run(&store, &PipelineOptions::default()).unwrap();

        // No projects or education in the content.
        assert!(!report.document.contains("\\section*{Projects}"));
        assert!(!report.document.contains("\\section*{Education}"));
        assert!(report.document.contains("\\section*{Skills}"));
        assert!(report.removed_sections.contains(SectionName::Projects));
    }

    #[test]
    fn test_persisted_removal_drops_populated_section() {
        let (_dir, store) = make_store(&modest_content());
        let mut set = RemovalSet::default();
        set.mark(SectionName::Skills);
        store.save_removal_set(&set).unwrap();

        let report = run(&store, &PipelineOptions::default()).unwrap();
        assert!(!report.document.contains("\\section*{Skills}"));
        assert!(!report.document.contains("Rust,"));
    }

    #[test]
    fn test_unmarking_restores_section_on_next_run() {
        let (_dir, store) = make_store(&modest_content());
        let mut set = RemovalSet::default();
        set.mark(SectionName::Skills);
        store.save_removal_set(&set).unwrap();
        run(&store, &PipelineOptions::default()).unwrap();

        set.unmark(SectionName::Skills);
        store.save_removal_set(&set).unwrap();
        let report = run(&store, &PipelineOptions::default()).unwrap();
        assert!(report.document.contains("\\section*{Skills}"));
        assert!(report.document.contains("Rust"));
    }

    #[test]
    fn test_over_budget_content_gets_compact_layout() {
        let mut content = ContentSet::default();
        content.summary.summary = words(100);
        for i in 0..4 {
            content.experiences.selected_experiences.push(ExperienceEntry {
                title: format!("Role {i}"),
                bullets: (0..3).map(|_| words(25)).collect(),
                ..Default::default()
            });
        }
        let (_dir, store) = make_store(&content);

        let options = PipelineOptions {
            target_pages: 1.0,
            max_iterations: 2,
            template: None,
        };
        let report = run(&store, &options).unwrap();

        assert!(!report.reduction.target_met);
        assert!(report.compact_applied);
        assert!(report.document.contains("\\newcommand{\\compactresumelayout}"));
        assert!(report.document.contains("\\begin{document}\n\\compactresumelayout"));
        assert!(scan_control_words(&report.document).is_empty());
    }

    #[test]
    fn test_custom_template_is_used() {
        let (_dir, store) = make_store(&modest_content());
        let template = "\\documentclass{article}\n\\begin{document}\n\
            \\section*{Skills}\n% BEGIN:SKILLS\n% END:SKILLS\n\
            \\end{document}\n"
            .to_string();
        let options = PipelineOptions {
            template: Some(template),
            ..Default::default()
        };
        let report = run(&store, &options).unwrap();
        assert!(report.document.contains("Rust"));
        assert!(!report.document.contains("\\usepackage[margin=1in]{geometry}"));
    }
}
