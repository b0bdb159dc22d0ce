//! Response formatting: media URLs, rich text and relation renaming.
use serde::Serialize;
use serde_json::Value;

use crate::strapi::Entry;

/// Resolve a stored media path against the CMS origin.
///
/// Absolute (`http://`, `https://`, `//host`) and `data:` URLs are returned
/// unchanged, so applying this twice is the same as applying it once.
pub fn media_url(origin: &str, path: &str) -> String {
    let path = path.trim();
    if path.is_empty() || is_absolute(path) {
        return path.to_string();
    }
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn is_absolute(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("//")
        || lower.starts_with("data:")
}

/// URL of a single media relation, optionally preferring a named format
/// (`thumbnail`, `small`, `medium`, `large`).
pub fn media_of(entry: &Entry, field: &str, origin: &str, format: Option<&str>) -> Option<String> {
    let media = entry.relation(field)?;
    media_entry_url(&media, origin, format)
}

fn media_entry_url(media: &Entry, origin: &str, format: Option<&str>) -> Option<String> {
    let sized = format.and_then(|name| {
        media
            .value("formats")
            .and_then(|f| f.get(name))
            .and_then(|f| f.get("url"))
            .and_then(Value::as_str)
    });
    let raw = sized.or_else(|| media.str("url"))?;
    let url = media_url(origin, raw);
    (!url.is_empty()).then_some(url)
}

/// Flatten Strapi rich text into plain text.
///
/// Accepts the blocks editor format (arrays of `{type, children}` nodes) and
/// passes legacy markdown/plain strings through.
pub fn rich_text_plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(blocks) => blocks
            .iter()
            .map(block_text)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(_) => block_text(value).trim().to_string(),
        _ => String::new(),
    }
}

fn block_text(node: &Value) -> String {
    if let Some(text) = node.get("text").and_then(Value::as_str) {
        return text.to_string();
    }
    let Some(children) = node.get("children").and_then(Value::as_array) else {
        return String::new();
    };
    let separator = match node.get("type").and_then(Value::as_str) {
        Some("list") => "\n",
        _ => "",
    };
    children
        .iter()
        .map(block_text)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Truncate to at most `max_chars` characters, cutting at a word boundary
/// when one is close enough, and append `...`.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let cut: String = collapsed.chars().take(max_chars).collect();
    let trimmed = match cut.rfind(' ') {
        Some(idx) if idx >= cut.len() / 2 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}...", trimmed.trim_end())
}

/// A relation reduced to what the frontend shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
}

impl NamedRef {
    pub fn from_entry(entry: &Entry) -> Option<NamedRef> {
        let name = entry.text("name").or_else(|| entry.text("title"))?;
        Some(NamedRef { id: entry.id, name })
    }
}
