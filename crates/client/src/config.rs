use std::{env, time::Duration};

use crate::query::QueryOptions;

/// Default users API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Users API base URL (default: "http://localhost:3000/api")
    pub base_url: String,
    /// HTTP request timeout in seconds (default: 10)
    pub http_timeout_seconds: u64,
    /// How long a fetched query counts as fresh, in milliseconds (default: 0)
    pub stale_time_ms: u64,
    /// Refetch active queries when the console regains focus (default: true)
    pub refetch_on_focus: bool,
    /// Maximum number of cached query results (default: 256)
    pub cache_max_entries: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `REGISTRAR_URL` - Users API base URL
    /// - `REGISTRAR_HTTP_TIMEOUT_SECONDS` - HTTP timeout (default: 10)
    /// - `REGISTRAR_STALE_TIME_MS` - Query stale time (default: 0)
    /// - `REGISTRAR_REFETCH_ON_FOCUS` - `true`/`false` (default: true)
    /// - `REGISTRAR_CACHE_MAX_ENTRIES` - Cache capacity (default: 256)
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("REGISTRAR_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            http_timeout_seconds: env::var("REGISTRAR_HTTP_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            stale_time_ms: env::var("REGISTRAR_STALE_TIME_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            refetch_on_focus: env::var("REGISTRAR_REFETCH_ON_FOCUS")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
            cache_max_entries: env::var("REGISTRAR_CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256),
        }
    }

    /// Overrides the base URL (e.g. from a CLI flag).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Get HTTP timeout as a Duration.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    /// Query layer options derived from this configuration.
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            stale_time: Duration::from_millis(self.stale_time_ms),
            refetch_on_focus: self.refetch_on_focus,
            max_keys: self.cache_max_entries,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
