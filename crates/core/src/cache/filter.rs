use super::pattern_matches;

/// Selects which cached queries an invalidation applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyFilter {
    /// A single key.
    Exact(String),
    /// Every key matching a glob pattern.
    Pattern(String),
}

impl KeyFilter {
    pub fn exact(key: impl Into<String>) -> Self {
        KeyFilter::Exact(key.into())
    }

    pub fn pattern(pattern: impl Into<String>) -> Self {
        KeyFilter::Pattern(pattern.into())
    }

    /// Returns true if `key` is selected by this filter.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyFilter::Exact(exact) => exact == key,
            KeyFilter::Pattern(pattern) => pattern_matches(pattern, key),
        }
    }
}

impl std::fmt::Display for KeyFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyFilter::Exact(key) => f.write_str(key),
            KeyFilter::Pattern(pattern) => f.write_str(pattern),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{users_key, users_search_key, users_search_pattern};

    #[test]
    fn test_exact_does_not_treat_star_as_wildcard() {
        let filter = KeyFilter::exact("users:search:*");
        assert!(filter.matches("users:search:*"));
        assert!(!filter.matches("users:search:Jane"));
    }

    #[test]
    fn test_users_filter_leaves_search_keys_alone() {
        let filter = KeyFilter::exact(users_key());
        assert!(filter.matches("users"));
        assert!(!filter.matches(&users_search_key("")));
    }

    #[test]
    fn test_search_family_filter() {
        let filter = KeyFilter::pattern(users_search_pattern());
        assert!(filter.matches(&users_search_key("")));
        assert!(filter.matches(&users_search_key("Jane")));
        assert!(!filter.matches(&users_key()));
    }
}
