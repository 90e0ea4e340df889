//! Pure pattern matching functions for cache keys.
//!
//! Patterns are glob-style: `*` matches any sequence of characters,
//! including the empty one. Every other character matches itself.

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use registrar_core::cache::pattern_matches;
///
/// // Exact match
/// assert!(pattern_matches("users", "users"));
///
/// // Wildcard at end
/// assert!(pattern_matches("users:search:*", "users:search:Jane"));
///
/// // The empty search term still has a key
/// assert!(pattern_matches("users:search:*", "users:search:"));
///
/// // No match
/// assert!(!pattern_matches("users:search:*", "users"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == key;
    }

    let mut segments = pattern.split('*');

    // Text before the first wildcard anchors at the start of the key.
    let head = segments.next().unwrap_or_default();
    let Some(mut remaining) = key.strip_prefix(head) else {
        return false;
    };

    // The split always yields at least two items here, the last one being the
    // text after the final wildcard, which anchors at the end of the key.
    let segments: Vec<&str> = segments.collect();
    let Some((tail, middle)) = segments.split_last() else {
        return true;
    };

    for segment in middle.iter().filter(|s| !s.is_empty()) {
        match remaining.find(segment) {
            Some(pos) => remaining = &remaining[pos + segment.len()..],
            None => return false,
        }
    }

    remaining.ends_with(tail)
}
