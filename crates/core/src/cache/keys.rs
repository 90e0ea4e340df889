/// Cache key of the full user list.
pub const USERS_KEY: &str = "users";

/// Prefix shared by every search result key.
const SEARCH_PREFIX: &str = "users:search:";

/// Returns the cache key for the full user list.
pub fn users_key() -> String {
    USERS_KEY.to_string()
}

/// Returns the cache key for the results of searching `term`.
///
/// The term is used verbatim, so `""` and `" "` are different keys.
pub fn users_search_key(term: &str) -> String {
    format!("{}{}", SEARCH_PREFIX, term)
}

/// Returns the pattern matching every search result key.
pub fn users_search_pattern() -> String {
    format!("{}*", SEARCH_PREFIX)
}
