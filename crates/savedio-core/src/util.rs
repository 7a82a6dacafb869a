//! Shared utility functions used across multiple modules.

use url::Url;

const PROTOCOL_SEPARATOR: &str = "://";

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check if a string starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Truncate text to at most 180 characters for error messages.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

/// Current Unix timestamp in milliseconds.
pub fn unix_millis_now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Make sure a user-typed URL carries a scheme, defaulting to `http://`.
///
/// Returns an empty string for blank input.
pub fn process_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        String::new()
    } else if raw.contains(PROTOCOL_SEPARATOR) {
        raw.to_string()
    } else {
        format!("http://{raw}")
    }
}

/// Infer the conventional favicon location of a bookmarked page.
pub fn favicon_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?;
    Some(format!("{}://{host}/favicon.ico", url.scheme()))
}
