use kb_export_core::normalize_whitespace;

const MAX_LEN: usize = 100;
const FALLBACK: &str = "unnamed";

/// Filesystem-safe path segment for arbitrary text.
///
/// Forbidden characters become `_`, whitespace runs become a single `-`, and
/// the result is capped at 100 characters with no leading or trailing
/// separators. Never empty, and `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize<'a>(text: impl Into<Option<&'a str>>) -> String {
    let Some(text) = text.into().filter(|t| !t.is_empty()) else {
        return FALLBACK.to_string();
    };

    let replaced: String = text
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let dashed = normalize_whitespace(&replaced).replace(' ', "-");

    let mut name = trim_separators(&dashed).to_string();
    if name.chars().count() > MAX_LEN {
        let truncated: String = name.chars().take(MAX_LEN).collect();
        name = trim_separators(&truncated).to_string();
    }

    if name.is_empty() {
        FALLBACK.to_string()
    } else {
        name
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
        || (c.is_control() && !c.is_whitespace())
}

fn trim_separators(name: &str) -> &str {
    name.trim_matches(|c: char| c == '_' || c == '-' || c.is_whitespace())
}
