//! Targeted document editing.
//!
//! Four edit modes, applied in a fixed order: wholesale replacement, marker
//! block bodies, section bodies, then literal substitutions. Edits that
//! find no target are reported in the result rather than aborting the
//! remaining edits, and text outside a targeted region is never touched.

use std::collections::BTreeMap;

use tracing::debug;

/// One batch of edits against a LaTeX document.
#[derive(Debug, Clone, Default)]
pub struct EditRequest {
    /// Replace the whole document. Block-level edits are skipped when set;
    /// substitutions still apply to the new content.
    pub full_content: Option<String>,
    /// Marker name to new block body (`% BEGIN:<name>` .. `% END:<name>`).
    pub markers: BTreeMap<String, String>,
    /// Heading name to new section body (`\section*{<name>}` up to the
    /// next heading or document end).
    pub sections: BTreeMap<String, String>,
    /// Literal token to replacement, applied last over the whole document.
    pub substitutions: BTreeMap<String, String>,
    /// Append absent markers/sections before `\end{document}` instead of
    /// skipping them.
    pub append_missing_blocks: bool,
}

/// Edited document plus which targets were hit and which were absent.
#[derive(Debug, Clone)]
pub struct EditReport {
    pub document: String,
    pub applied: Vec<String>,
    pub not_found: Vec<String>,
}

/// Applies one batch of edits and reports per-target outcomes.
pub fn apply_edits(document: &str, request: &EditRequest) -> EditReport {
    let mut doc = match &request.full_content {
        Some(content) => content.clone(),
        None => document.to_string(),
    };
    let mut applied = Vec::new();
    let mut not_found = Vec::new();

    if request.full_content.is_some() {
        applied.push("full_content".to_string());
    } else {
        for (name, body) in &request.markers {
            match replace_marker_block(&doc, name, body) {
                Some(next) => {
                    doc = next;
                    applied.push(format!("marker:{name}"));
                }
                None if request.append_missing_blocks => {
                    doc = append_before_end(
                        &doc,
                        &format!("% BEGIN:{name}\n{body}\n% END:{name}\n"),
                    );
                    applied.push(format!("marker:{name} (appended)"));
                }
                None => {
                    debug!(marker = %name, "marker pair not found, skipping");
                    not_found.push(format!("marker:{name}"));
                }
            }
        }

        for (name, body) in &request.sections {
            match replace_section_body(&doc, name, body) {
                Some(next) => {
                    doc = next;
                    applied.push(format!("section:{name}"));
                }
                None if request.append_missing_blocks => {
                    doc = append_before_end(&doc, &format!("\\section*{{{name}}}\n{body}\n"));
                    applied.push(format!("section:{name} (appended)"));
                }
                None => {
                    debug!(section = %name, "section heading not found, skipping");
                    not_found.push(format!("section:{name}"));
                }
            }
        }
    }

    for (token, value) in &request.substitutions {
        if doc.contains(token.as_str()) {
            doc = doc.replace(token.as_str(), value);
            applied.push(format!("substitution:{token}"));
        } else {
            not_found.push(format!("substitution:{token}"));
        }
    }

    EditReport { document: doc, applied, not_found }
}

/// Replaces the body between `% BEGIN:<name>` and `% END:<name>`, keeping
/// both marker lines.
fn replace_marker_block(document: &str, name: &str, body: &str) -> Option<String> {
    let begin = format!("% BEGIN:{name}");
    let end = format!("% END:{name}");

    let begin_at = document.find(&begin)?;
    let body_start = begin_at + begin.len();
    // Body starts after the BEGIN marker's line.
    let body_start = match document[body_start..].find('\n') {
        Some(nl) => body_start + nl + 1,
        None => return None,
    };
    let end_at = body_start + document[body_start..].find(&end)?;

    let mut out = String::with_capacity(document.len());
    out.push_str(&document[..body_start]);
    out.push_str(body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&document[end_at..]);
    Some(out)
}

/// Replaces the body between `\section*{<name>}` and the next heading or
/// `\end{document}`, keeping the heading itself.
fn replace_section_body(document: &str, name: &str, body: &str) -> Option<String> {
    let heading = format!("\\section*{{{name}}}");
    let heading_at = document.find(&heading)?;
    let body_start = heading_at + heading.len();
    let body_start = match document[body_start..].find('\n') {
        Some(nl) => body_start + nl + 1,
        None => document.len(),
    };

    let rest = &document[body_start..];
    let body_end = body_start
        + rest
            .find("\\section*{")
            .or_else(|| rest.find("\\end{document}"))
            .unwrap_or(rest.len());

    let mut out = String::with_capacity(document.len());
    out.push_str(&document[..body_start]);
    out.push_str(body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&document[body_end..]);
    Some(out)
}

fn append_before_end(document: &str, block: &str) -> String {
    match document.rfind("\\end{document}") {
        Some(at) => {
            let mut out = String::with_capacity(document.len() + block.len());
            out.push_str(&document[..at]);
            out.push_str(block);
            out.push_str(&document[at..]);
            out
        }
        None => {
            let mut out = document.to_string();
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(block);
            out
        }
    }
}
