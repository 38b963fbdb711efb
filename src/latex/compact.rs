//! Compact-layout injection.
//!
//! When a rendered document is still over the page target, a spacing
//! macro is injected into the preamble and called right after
//! `\begin{document}`. Running the injector on its own output is a no-op;
//! presence of the definition or the call is checked before either insert.

use tracing::info;

const COMPACT_COMMAND: &str = "\\compactresumelayout";

/// Preamble block defining the toggle and spacing macro.
const COMPACT_DEFINITION: &str = "\n% Compact layout toggle for page budget enforcement\n\
\\newif\\ifcompactresume\n\
\\compactresumefalse\n\
\n\
\\newcommand{\\compactresumelayout}{%\n\
\x20 \\compactresumetrue\n\
\x20 \\setlength{\\itemsep}{0.2em}\n\
\x20 \\setlength{\\parskip}{0.15em}\n\
\x20 \\setlist[itemize]{leftmargin=*, labelsep=0.4em, topsep=0.1em, itemsep=0.1em, parsep=0em}\n\
\x20 \\setlist[enumerate]{leftmargin=*, labelsep=0.4em, topsep=0.1em, itemsep=0.1em, parsep=0em}\n\
}\n";

fn has_definition(document: &str) -> bool {
    document.contains("\\newcommand{\\compactresumelayout}")
        || document.contains("\\newcommand*{\\compactresumelayout}")
        || document.contains("\\def\\compactresumelayout")
}

fn has_call(document: &str) -> bool {
    match document.find("\\begin{document}") {
        Some(at) => document[at..].contains(COMPACT_COMMAND),
        None => false,
    }
}

/// Ensures the compact-layout macro is defined and invoked.
///
/// The definition lands directly before `\begin{document}`, pulling in
/// `enumitem` if the preamble does not already load it; the call lands
/// directly after. A document without `\begin{document}` is returned
/// unchanged.
pub fn inject_compact_layout(document: &str) -> String {
    let Some(begin_at) = document.find("\\begin{document}") else {
        return document.to_string();
    };

    let mut doc = document.to_string();

    if !has_definition(&doc) {
        let mut definition = String::new();
        if !doc.contains("\\usepackage{enumitem}") {
            definition.push_str("\\usepackage{enumitem}\n");
        }
        definition.push_str(COMPACT_DEFINITION);
        doc.insert_str(begin_at, &definition);
        info!("injected compact layout definition into preamble");
    }

    if !has_call(&doc) {
        // Re-locate: the insert above shifted offsets.
        if let Some(at) = doc.find("\\begin{document}") {
            let after = at + "\\begin{document}".len();
            doc.insert_str(after, &format!("\n{COMPACT_COMMAND}"));
            info!("injected compact layout call after document begin");
        }
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latex::integrity::scan_control_words;

    const BARE_DOC: &str = "\\documentclass[11pt,a4paper]{article}\n\
        \\begin{document}\n\
        \\section*{Skills}\nRust\n\
        \\end{document}\n";

    #[test]
    fn test_injects_definition_and_call() {
        let out = inject_compact_layout(BARE_DOC);
        assert!(out.contains("\\newif\\ifcompactresume"));
        assert!(out.contains("\\newcommand{\\compactresumelayout}"));
        assert!(out.contains("\\usepackage{enumitem}"));
        assert!(out.contains("\\begin{document}\n\\compactresumelayout"));

        let def_at = out.find("\\newcommand{\\compactresumelayout}").unwrap();
        let begin_at = out.find("\\begin{document}").unwrap();
        assert!(def_at < begin_at);
    }

    #[test]
    fn test_injection_is_idempotent() {
        let once = inject_compact_layout(BARE_DOC);
        let twice = inject_compact_layout(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_existing_enumitem_not_duplicated() {
        let doc = BARE_DOC.replace(
            "\\documentclass[11pt,a4paper]{article}\n",
            "\\documentclass[11pt,a4paper]{article}\n\\usepackage{enumitem}\n",
        );
        let out = inject_compact_layout(&doc);
        assert_eq!(out.matches("\\usepackage{enumitem}").count(), 1);
    }

    #[test]
    fn test_existing_definition_only_gets_call() {
        let doc = format!(
            "\\documentclass{{article}}\n{COMPACT_DEFINITION}\\begin{{document}}\nbody\n\\end{{document}}\n"
        );
        let out = inject_compact_layout(&doc);
        assert_eq!(out.matches("\\newcommand{\\compactresumelayout}").count(), 1);
        assert!(out.contains("\\begin{document}\n\\compactresumelayout"));
    }

    #[test]
    fn test_document_without_begin_is_unchanged() {
        let fragment = "\\section*{Skills}\nRust\n";
        assert_eq!(inject_compact_layout(fragment), fragment);
    }

    #[test]
    fn test_no_control_word_loses_its_backslash() {
        let out = inject_compact_layout(BARE_DOC);
        assert!(scan_control_words(&out).is_empty());
        assert!(!out.contains("\newcommand"));
        assert!(!out.replace("\\newif", "").contains("newif\\"));
    }
}
