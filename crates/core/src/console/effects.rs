//! Completion steps run after a successful mutation.
//!
//! Each operation declares its own effects; a call site may append more.
//! The console runs them in order: operation effects first, then call-site
//! effects, each list in declaration order.

use crate::cache::{users_key, users_search_pattern, KeyFilter};

/// One completion step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Mark matching cached queries stale; active ones refetch.
    Invalidate(KeyFilter),
    /// Clear the form fields.
    ResetForm,
    /// Leave edit mode.
    ExitEditMode,
}

/// Effects of a successful create.
pub fn create_effects() -> Vec<Effect> {
    vec![
        Effect::Invalidate(KeyFilter::exact(users_key())),
        Effect::ResetForm,
    ]
}

/// Effects of a successful update.
pub fn update_effects() -> Vec<Effect> {
    vec![Effect::Invalidate(KeyFilter::exact(users_key()))]
}

/// Effects the form's submit adds on top of [`update_effects`].
pub fn update_call_site_effects() -> Vec<Effect> {
    vec![Effect::ExitEditMode, Effect::ResetForm]
}

/// Effects of a successful delete.
///
/// A deletion can change the full list and any search result.
pub fn delete_effects() -> Vec<Effect> {
    vec![
        Effect::Invalidate(KeyFilter::exact(users_key())),
        Effect::Invalidate(KeyFilter::pattern(users_search_pattern())),
    ]
}
