//! Escaping for text written into Markdown link text and HTML.

/// Backslash-escape characters that would break link text: `\ [ ] ( )`.
///
/// # Examples
///
/// ```
/// use fns_embed::escape_markdown_text;
///
/// assert_eq!(escape_markdown_text("notes [draft] (v2)"), r"notes \[draft\] \(v2\)");
/// ```
#[must_use]
pub fn escape_markdown_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '[' | ']' | '(' | ')') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// Escape HTML special characters for text and attribute values.
///
/// Shared by the sized-image embed and both renderer backends.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
