use chrono::{DateTime, Utc};

/// Lifecycle of one cached query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Snapshot of a query: its status plus the last data it produced.
///
/// `data` survives a refetch and a failed refetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState<T> {
    pub status: QueryStatus,
    pub data: Option<T>,
    pub error: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            fetched_at: None,
        }
    }
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

/// Snapshot of a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationStatus {
    pub pending: bool,
    /// Message of the most recent failure, cleared on the next success.
    pub last_error: Option<String>,
}

impl MutationStatus {
    /// Label for the mutation's trigger control.
    pub fn label<'a>(&self, idle: &'a str, busy: &'a str) -> &'a str {
        if self.pending {
            busy
        } else {
            idle
        }
    }
}
