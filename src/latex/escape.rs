/// Escapes LaTeX special characters in user-supplied text.
///
/// Single pass over the input, so an escape sequence emitted for one
/// character is never re-escaped by a later rule.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str(r"\textbackslash{}"),
            '&' => out.push_str(r"\&"),
            '%' => out.push_str(r"\%"),
            '$' => out.push_str(r"\$"),
            '#' => out.push_str(r"\#"),
            '_' => out.push_str(r"\_"),
            '{' => out.push_str(r"\{"),
            '}' => out.push_str(r"\}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_each_special_character() {
        assert_eq!(escape_latex("a & b"), r"a \& b");
        assert_eq!(escape_latex("95%"), r"95\%");
        assert_eq!(escape_latex("C# & F#"), r"C\# \& F\#");
        assert_eq!(escape_latex("snake_case"), r"snake\_case");
        assert_eq!(escape_latex("{x}"), r"\{x\}");
        assert_eq!(escape_latex("~/dir"), r"\textasciitilde{}/dir");
        assert_eq!(escape_latex("2^10"), r"2\textasciicircum{}10");
    }

    #[test]
    fn test_backslash_escapes_without_cascading() {
        // A naive ordered replace would mangle the braces emitted for the
        // backslash itself.
        assert_eq!(escape_latex(r"a\b"), r"a\textbackslash{}b");
        assert_eq!(escape_latex(r"\{"), r"\textbackslash{}\{");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_latex("Rust engineer, 2020-2024"), "Rust engineer, 2020-2024");
    }
}
