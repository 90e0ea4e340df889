//! JSON output formatting.

/// Format a value as compact JSON. Unserializable values yield an empty string.
pub fn format_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
