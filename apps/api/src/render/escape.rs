//! LaTeX field escaping.
//!
//! Every user-supplied value passes through [`escape_latex`] exactly once
//! before it reaches a skeleton. Markup the engine builds itself (`\href`,
//! `\cvtag`, list scaffolds) is never escaped, only its text payload.

/// Escapes `text` for inclusion in LaTeX body text.
///
/// Precedence: backslash first, then `& % $ # _ { }`, then tilde, then caret.
/// Mapping each source character once means the braces introduced by
/// `\textbackslash{}` are never re-escaped.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str(r"\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            _ => out.push(ch),
        }
    }
    out
}

/// Absent values escape to the empty string.
pub fn escape_opt(text: Option<&str>) -> String {
    text.map(escape_latex).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_unchanged() {
        assert_eq!(escape_latex("Senior Engineer, Berlin"), "Senior Engineer, Berlin");
    }

    #[test]
    fn test_reserved_characters_are_prefixed() {
        assert_eq!(escape_latex("R&D 50% $5 #1 a_b {x}"), r"R\&D 50\% \$5 \#1 a\_b \{x\}");
    }

    #[test]
    fn test_backslash_braces_not_reescaped() {
        assert_eq!(escape_latex(r"C:\dir"), r"C:\textbackslash{}dir");
    }

    #[test]
    fn test_tilde_and_caret() {
        assert_eq!(
            escape_latex("~2x^3"),
            r"\textasciitilde{}2x\textasciicircum{}3"
        );
    }

    #[test]
    fn test_every_reserved_character_once() {
        let escaped = escape_latex(r"\&%$#_{}~^");
        assert_eq!(
            escaped,
            r"\textbackslash{}\&\%\$\#\_\{\}\textasciitilde{}\textasciicircum{}"
        );
    }

    #[test]
    fn test_non_ascii_passes_through() {
        assert_eq!(escape_latex("Zürich – café"), "Zürich – café");
    }

    #[test]
    fn test_absent_is_empty() {
        assert_eq!(escape_opt(None), "");
        assert_eq!(escape_opt(Some("a&b")), r"a\&b");
    }
}
