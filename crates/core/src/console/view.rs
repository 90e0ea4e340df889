use crate::users::User;

use super::{ConfirmPrompt, FormMode, FormState, MutationStatus, QueryState};

/// What occupies the table area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewBody {
    Loading,
    /// The full-list query failed; replaces the table.
    Error(String),
    Table(Vec<User>),
}

/// Everything the console renders, as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleView {
    pub body: ViewBody,
    pub form: FormState,
    pub mode: FormMode,
    pub submit_label: String,
    pub search_input: String,
    pub search_term: String,
    pub prompt: ConfirmPrompt,
    pub create: MutationStatus,
    pub update: MutationStatus,
    pub delete: MutationStatus,
}

impl ConsoleView {
    /// Rows currently displayed; empty unless the table is shown.
    pub fn rows(&self) -> &[User] {
        match &self.body {
            ViewBody::Table(rows) => rows,
            _ => &[],
        }
    }
}

/// Decides what the table area shows.
///
/// Loading wins if either query is loading. Only a failed full-list query is
/// shown as an error; a failed search just yields no rows. With an empty
/// committed term the full list is shown.
pub fn compose_body(
    list: &QueryState<Vec<User>>,
    search: &QueryState<Vec<User>>,
    committed_term: &str,
) -> ViewBody {
    if list.is_loading() || search.is_loading() {
        return ViewBody::Loading;
    }
    if list.is_error() {
        let message = list
            .error
            .clone()
            .unwrap_or_else(|| "Failed to load users".to_string());
        return ViewBody::Error(message);
    }

    let rows = if committed_term.is_empty() {
        list.data.as_ref().or(search.data.as_ref())
    } else {
        search.data.as_ref()
    };
    ViewBody::Table(rows.cloned().unwrap_or_default())
}
