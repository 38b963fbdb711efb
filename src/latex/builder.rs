//! Document rendering from structured content.
//!
//! The template carries one marker block per logical section; rendering is
//! just a batch marker edit, so a custom template only needs to place the
//! same markers to take full control of the layout.

use crate::latex::editor::{apply_edits, EditRequest};
use crate::latex::escape::escape_latex;
use crate::latex::sections::SectionName;
use crate::models::ContentSet;

pub const DEFAULT_TEMPLATE: &str = "\\documentclass[11pt,a4paper]{article}\n\
\\usepackage[margin=1in]{geometry}\n\
\\usepackage{enumitem}\n\
\\pagestyle{empty}\n\
\n\
\\begin{document}\n\
\n\
\\section*{Summary}\n\
% BEGIN:SUMMARY\n\
% END:SUMMARY\n\
\n\
\\section*{Experience}\n\
% BEGIN:EXPERIENCE\n\
% END:EXPERIENCE\n\
\n\
\\section*{Projects}\n\
% BEGIN:PROJECTS\n\
% END:PROJECTS\n\
\n\
\\section*{Skills}\n\
% BEGIN:SKILLS\n\
% END:SKILLS\n\
\n\
\\section*{Education}\n\
% BEGIN:EDUCATION\n\
% END:EDUCATION\n\
\n\
\\end{document}\n";

/// Renders the content set into the template's marker blocks.
pub fn render_document(content: &ContentSet, template: &str) -> String {
    let mut request = EditRequest::default();
    request.markers.insert(
        SectionName::Summary.marker_tag().to_string(),
        escape_latex(content.summary_text()),
    );
    request.markers.insert(
        SectionName::Experience.marker_tag().to_string(),
        experience_body(content),
    );
    request.markers.insert(
        SectionName::Projects.marker_tag().to_string(),
        projects_body(content),
    );
    request
        .markers
        .insert(SectionName::Skills.marker_tag().to_string(), skills_body(content));
    request.markers.insert(
        SectionName::Education.marker_tag().to_string(),
        education_body(content),
    );

    apply_edits(template, &request).document
}

/// True when the section renders to an empty body for this content, which
/// makes it a candidate for removal at assembly time.
pub fn section_is_empty(content: &ContentSet, section: SectionName) -> bool {
    match section {
        SectionName::Summary => content.summary_text().trim().is_empty(),
        SectionName::Experience => content.experience_entries().is_empty(),
        SectionName::Projects => content.project_entries().is_empty(),
        SectionName::Skills => content.skill_entries().is_empty(),
        SectionName::Education => content.education_entries().is_empty(),
        _ => false,
    }
}

fn experience_body(content: &ContentSet) -> String {
    let mut out = String::new();
    for exp in content.experience_entries() {
        if !out.is_empty() {
            out.push_str("\\medskip\n");
        }
        out.push_str(&format!(
            "\\textbf{{{}}}, {} \\hfill {} -- {}\n",
            escape_latex(&exp.title),
            escape_latex(&exp.organization),
            escape_latex(&exp.start),
            escape_latex(&exp.end),
        ));
        if !exp.description.trim().is_empty() {
            out.push_str(&escape_latex(&exp.description));
            out.push('\n');
        }
        if !exp.bullets.is_empty() {
            out.push_str("\\begin{itemize}\n");
            for bullet in &exp.bullets {
                out.push_str(&format!("  \\item {}\n", escape_latex(bullet)));
            }
            out.push_str("\\end{itemize}\n");
        }
    }
    out
}

// Projects use an inline format instead of itemize lists; it reads denser
// and saves a couple of rendered lines per entry.
fn projects_body(content: &ContentSet) -> String {
    let mut out = String::new();
    for proj in content.project_entries() {
        let mut line = format!("\\textbf{{{}}}", escape_latex(&proj.name));
        if !proj.description.trim().is_empty() {
            line.push_str(": ");
            line.push_str(&escape_latex(&proj.description));
        }
        if !proj.bullets.is_empty() {
            let joined = proj
                .bullets
                .iter()
                .map(|b| escape_latex(b))
                .collect::<Vec<_>>()
                .join("; ");
            line.push_str(" -- ");
            line.push_str(&joined);
        }
        out.push_str(&line);
        out.push_str("\\par\n");
    }
    out
}

fn skills_body(content: &ContentSet) -> String {
    content
        .skill_entries()
        .iter()
        .map(|s| escape_latex(s))
        .collect::<Vec<_>>()
        .join(", ")
}

fn education_body(content: &ContentSet) -> String {
    let mut out = String::new();
    for entry in content.education_entries() {
        out.push_str(&format!(
            "\\textbf{{{}}}, {} \\hfill {}\n",
            escape_latex(&entry.degree),
            escape_latex(&entry.school),
            escape_latex(&entry.dates),
        ));
        if !entry.location.trim().is_empty() {
            out.push_str(&escape_latex(&entry.location));
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latex::integrity::scan_control_words;
    use crate::models::{EducationEntry, ExperienceEntry, ProjectEntry};

    fn sample_content() -> ContentSet {
        let mut content = ContentSet::default();
        content.summary.summary = "Engineer focused on storage & streaming.".to_string();
        content.experiences.selected_experiences.push(ExperienceEntry {
            organization: "Acme Corp".to_string(),
            title: "Staff Engineer".to_string(),
            start: "2020".to_string(),
            end: "2024".to_string(),
            description: "Platform team".to_string(),
            bullets: vec!["Cut p99 latency by 40%".to_string()],
        });
        content.projects.selected_projects.push(ProjectEntry {
            name: "forge_cli".to_string(),
            description: "CLI for templating".to_string(),
            bullets: vec!["100k downloads".to_string()],
        });
        content.skills.skills = vec!["Rust".to_string(), "C#".to_string()];
        content.education.education.push(EducationEntry {
            school: "State University".to_string(),
            degree: "BSc Computer Science".to_string(),
            dates: "2012 -- 2016".to_string(),
            location: "Springfield".to_string(),
        });
        content
    }

    #[test]
    fn test_render_fills_every_marker_block() {
        let doc = render_document(&sample_content(), DEFAULT_TEMPLATE);
        assert!(doc.contains("Engineer focused on storage \\& streaming."));
        assert!(doc.contains("\\textbf{Staff Engineer}, Acme Corp \\hfill 2020 -- 2024"));
        assert!(doc.contains("\\item Cut p99 latency by 40\\%"));
        assert!(doc.contains("\\textbf{forge\\_cli}: CLI for templating -- 100k downloads"));
        assert!(doc.contains("Rust, C\\#"));
        assert!(doc.contains("\\textbf{BSc Computer Science}, State University"));
    }

    #[test]
    fn test_markers_survive_render_for_re_edit() {
        let doc = render_document(&sample_content(), DEFAULT_TEMPLATE);
        for tag in ["SUMMARY", "EXPERIENCE", "PROJECTS", "SKILLS", "EDUCATION"] {
            assert!(doc.contains(&format!("% BEGIN:{tag}")), "missing {tag}");
            assert!(doc.contains(&format!("% END:{tag}")), "missing {tag}");
        }
    }

    #[test]
    fn test_rendered_document_passes_integrity_scan() {
        let doc = render_document(&sample_content(), DEFAULT_TEMPLATE);
        assert!(scan_control_words(&doc).is_empty());
    }

    #[test]
    fn test_empty_sections_detected() {
        let content = ContentSet::default();
        assert!(section_is_empty(&content, SectionName::Projects));
        assert!(section_is_empty(&content, SectionName::Summary));
        assert!(!section_is_empty(&sample_content(), SectionName::Projects));
        assert!(!section_is_empty(&content, SectionName::Header));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let content = sample_content();
        assert_eq!(
            render_document(&content, DEFAULT_TEMPLATE),
            render_document(&content, DEFAULT_TEMPLATE)
        );
    }
}
