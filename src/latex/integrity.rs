//! Control-word integrity scanning.
//!
//! A previously observed corruption class stripped the leading backslash
//! from commands during string edits, leaving text like `ewcommand{..}` or
//! `section*{..}` in the output. Any hit from this scan is a programming
//! defect in an edit path, never a recoverable runtime condition.

use serde::Serialize;

/// Command names that must only ever appear with a leading backslash.
const CONTROL_WORDS: &[&str] = &[
    "documentclass",
    "usepackage",
    "newcommand",
    "newif",
    "section",
    "subsection",
    "textbf",
    "textit",
    "itemize",
    "enumerate",
    "item",
    "setlength",
    "setlist",
    "compactresumelayout",
    "begin",
    "end",
];

/// One suspected stripped-backslash occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityViolation {
    pub line: usize,
    pub word: String,
    pub context: String,
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Scans for control words that lost their leading backslash.
///
/// A hit is a control word followed by `{`, `*{`, or `[` whose preceding
/// character is neither a backslash nor part of a longer word. Comment
/// lines are skipped; prose legitimately mentions command names there.
pub fn scan_control_words(document: &str) -> Vec<IntegrityViolation> {
    let mut violations = Vec::new();

    for (line_idx, line) in document.lines().enumerate() {
        let code = match line.find('%') {
            // A literal \% is not a comment start.
            Some(at) if at == 0 || line.as_bytes()[at - 1] != b'\\' => &line[..at],
            _ => line,
        };

        for word in CONTROL_WORDS {
            let mut search_from = 0;
            while let Some(rel) = code[search_from..].find(word) {
                let at = search_from + rel;
                search_from = at + word.len();

                let before = code[..at].chars().next_back();
                if matches!(before, Some('\\')) || matches!(before, Some(c) if is_word_char(c)) {
                    continue;
                }
                let after = &code[at + word.len()..];
                let called = after.starts_with('{')
                    || after.starts_with("*{")
                    || after.starts_with('[');
                if !called {
                    continue;
                }
                violations.push(IntegrityViolation {
                    line: line_idx + 1,
                    word: (*word).to_string(),
                    context: line.trim().to_string(),
                });
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_document_passes() {
        let doc = "\\documentclass{article}\n\
            \\usepackage{enumitem}\n\
            \\begin{document}\n\
            \\section*{Skills}\n\
            \\textbf{Rust}\n\
            \\end{document}\n";
        assert!(scan_control_words(doc).is_empty());
    }

    #[test]
    fn test_stripped_backslash_detected() {
        let doc = "\\documentclass{article}\nnewcommand{\\x}{1}\n";
        let violations = scan_control_words(doc);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].word, "newcommand");
        assert_eq!(violations[0].line, 2);
    }

    #[test]
    fn test_starred_and_bracket_forms_detected() {
        let violations = scan_control_words("section*{Skills}\n");
        assert_eq!(violations.len(), 1);

        let violations = scan_control_words("usepackage[margin=1in]{geometry}\n");
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_prose_mention_not_flagged() {
        // No brace follows, so this is prose, not a stripped command.
        assert!(scan_control_words("the section about skills\n").is_empty());
        // Part of a longer word.
        assert!(scan_control_words("resection{x}\n").is_empty());
    }

    #[test]
    fn test_comment_lines_skipped() {
        assert!(scan_control_words("% section{not real}\n").is_empty());
        let doc = "\\section*{A} % newcommand{mentioned}\n";
        assert!(scan_control_words(doc).is_empty());
    }
}
