//! Markup stripping for free-text fields.

use scraper::Html;
use serde_json::Value;

/// Strip tags and return the text nodes, each trimmed, joined by single spaces.
///
/// Entities are decoded. Plain text comes back unchanged apart from trimming.
pub fn html_to_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`html_to_text`] for a JSON cell. Absent or non-string input maps to `""`.
pub fn cell_to_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => html_to_text(s),
        _ => String::new(),
    }
}
