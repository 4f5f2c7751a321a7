//! Drive v3 search query construction.

use crate::types::DocumentKind;

/// Escape a value for use inside a single-quoted query literal.
pub fn escape_query_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Name-substring filter restricted to the allow-listed MIME types.
pub fn build_search_query(query_text: &str) -> String {
    let mime_filter = DocumentKind::ALL
        .iter()
        .map(|kind| format!("mimeType='{}'", kind.mime_type()))
        .collect::<Vec<_>>()
        .join(" or ");

    format!(
        "name contains '{}' and ({})",
        escape_query_value(query_text),
        mime_filter
    )
}
