//! Placeholder substitution.
//!
//! A placeholder token is `{{` followed by one or more of `[A-Z0-9_]` and
//! `}}`. Any other brace run (`{{\bf x}}`, `{{{NAME}}}`'s outer braces) is
//! literal text. Substitution is a single left-to-right scan over the
//! skeleton: replacement text is appended to the output and never scanned
//! again, so a value that looks like a placeholder stays literal.

use std::collections::{BTreeMap, BTreeSet};

/// Result of one substitution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Substituted {
    pub text: String,
    /// Placeholder names found in the skeleton with no value, in first-seen order.
    pub unresolved: Vec<String>,
}

/// Finds the next placeholder token at or after `from`.
/// Returns the byte range of the whole token and the range of its name.
fn next_token(text: &str, from: usize) -> Option<(usize, usize, usize, usize)> {
    let mut search = from;
    while let Some(offset) = text[search..].find("{{") {
        let start = search + offset;
        let name_start = start + 2;
        let name_len = text.as_bytes()[name_start..]
            .iter()
            .take_while(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || **b == b'_')
            .count();
        let name_end = name_start + name_len;
        if name_len > 0 && text[name_end..].starts_with("}}") {
            return Some((start, name_end + 2, name_start, name_end));
        }
        search = start + 1;
    }
    None
}

/// Every placeholder name referenced by `skeleton`.
pub fn placeholder_names(skeleton: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut cursor = 0;
    while let Some((_, end, name_start, name_end)) = next_token(skeleton, cursor) {
        names.insert(skeleton[name_start..name_end].to_string());
        cursor = end;
    }
    names
}

/// Replaces every occurrence of every known placeholder in one pass.
/// Unknown placeholders are copied through verbatim and reported.
pub fn substitute(skeleton: &str, values: &BTreeMap<&str, String>) -> Substituted {
    let mut text = String::with_capacity(skeleton.len() + values.values().map(String::len).sum::<usize>());
    let mut unresolved: Vec<String> = Vec::new();
    let mut cursor = 0;

    while let Some((start, end, name_start, name_end)) = next_token(skeleton, cursor) {
        text.push_str(&skeleton[cursor..start]);
        let name = &skeleton[name_start..name_end];
        match values.get(name) {
            Some(value) => text.push_str(value),
            None => {
                text.push_str(&skeleton[start..end]);
                if !unresolved.iter().any(|n| n == name) {
                    unresolved.push(name.to_string());
                }
            }
        }
        cursor = end;
    }
    text.push_str(&skeleton[cursor..]);

    Substituted { text, unresolved }
}
