use crate::cache::users_search_key;

/// Separates what is typed in the search box from what is queried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchController {
    input: String,
    committed: String,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live value of the search box.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The term actually used to query.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    /// Updates the live input. Never affects the committed term.
    pub fn type_text(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Commits the live input (search button or Enter).
    ///
    /// Returns true if the committed term changed.
    pub fn commit(&mut self) -> bool {
        if self.committed == self.input {
            return false;
        }
        self.committed = self.input.clone();
        true
    }

    /// Cache key of the query for the committed term.
    pub fn query_key(&self) -> String {
        users_search_key(&self.committed)
    }
}
