//! State machines behind the registration console.
//!
//! Everything here is synchronous and side-effect free. The client crate's
//! `RegistrationConsole` drives these types and performs the I/O they ask for.

mod deletion;
mod effects;
mod form;
mod search;
mod status;
mod view;

pub use deletion::{ConfirmPrompt, DeletionGate, GateState};
pub use effects::{
    create_effects, delete_effects, update_call_site_effects, update_effects, Effect,
};
pub use form::{FormController, FormField, FormMode, FormState, Submission};
pub use search::SearchController;
pub use status::{MutationStatus, QueryState, QueryStatus};
pub use view::{compose_body, ConsoleView, ViewBody};
