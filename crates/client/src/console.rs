//! The registration console: form, search, deletion gate, queries and
//! mutations wired together.
//!
//! Control flow: input updates local state; a submit runs a mutation; the
//! mutation's effects invalidate cached queries, and active queries are
//! refetched right away.
//!
//! A [`ConsoleMonitor`] renders the same screen from a published snapshot,
//! so it can draw loading and pending states while a command is in flight.

use std::sync::Arc;

use registrar_core::api::{self, UsersApi};
use registrar_core::cache::{users_key, KeyFilter, USERS_KEY};
use registrar_core::console::{
    compose_body, create_effects, delete_effects, update_call_site_effects, update_effects,
    ConsoleView, DeletionGate, Effect, FormController, FormField, FormMode, MutationStatus,
    QueryState, SearchController, Submission,
};
use registrar_core::users::User;
use tokio::sync::watch;

use crate::mutation::{Mutation, MutationMonitor};
use crate::query::QueryClient;

/// Labels of the form's submit control, idle and in flight.
const CREATE_LABELS: (&str, &str) = ("Add user", "Adding...");
const UPDATE_LABELS: (&str, &str) = ("Save changes", "Saving...");

/// Local input state, as last published by the console.
#[derive(Debug, Clone, Default)]
struct UiState {
    form: FormController,
    search: SearchController,
    gate: DeletionGate,
}

/// Single-component front end over a [`UsersApi`].
///
/// The query client is injected so several consoles (or tests) can share,
/// or isolate, one cache.
pub struct RegistrationConsole {
    api: Arc<dyn UsersApi>,
    queries: Arc<QueryClient>,
    form: FormController,
    search: SearchController,
    gate: DeletionGate,
    create: Mutation,
    update: Mutation,
    delete: Mutation,
    ui: watch::Sender<UiState>,
}

impl std::fmt::Debug for RegistrationConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationConsole")
            .field("form", &self.form)
            .field("search", &self.search)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl RegistrationConsole {
    pub fn new(api: Arc<dyn UsersApi>, queries: Arc<QueryClient>) -> Self {
        Self {
            api,
            queries,
            form: FormController::new(),
            search: SearchController::new(),
            gate: DeletionGate::new(),
            create: Mutation::new("create", create_effects()),
            update: Mutation::new("update", update_effects()),
            delete: Mutation::new("delete", delete_effects()),
            ui: watch::Sender::new(UiState::default()),
        }
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn gate(&self) -> &DeletionGate {
        &self.gate
    }

    pub fn queries(&self) -> &Arc<QueryClient> {
        &self.queries
    }

    /// A handle that renders this console while it is busy with a command.
    pub fn monitor(&self) -> ConsoleMonitor {
        ConsoleMonitor {
            queries: self.queries.clone(),
            ui: self.ui.subscribe(),
            create: self.create.monitor(),
            update: self.update.monitor(),
            delete: self.delete.monitor(),
        }
    }

    /// Initial load of both active queries.
    pub async fn mount(&self) {
        self.fetch_list().await;
        self.fetch_search().await;
    }

    /// Window focus regained. Returns false if focus refetching is disabled.
    pub async fn on_focus(&self) -> bool {
        if !self.queries.options().refetch_on_focus {
            return false;
        }
        tracing::debug!("Focus regained, refetching active queries");
        self.mount().await;
        true
    }

    // Form

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set_field(field, value);
        self.publish();
    }

    /// Loads `user` into the form in edit mode.
    pub fn edit(&mut self, user: &User) {
        tracing::debug!(user_id = %user.id, "Editing user");
        self.form.begin_edit(user);
        self.publish();
    }

    /// Clears the form and returns to create mode.
    pub fn cancel(&mut self) {
        self.form.cancel();
        self.publish();
    }

    /// Creates or updates from the form, depending on mode.
    ///
    /// On failure the form is left as it was.
    pub async fn submit(&mut self) -> api::Result<User> {
        let (user, effects) = match self.form.submission() {
            Submission::Create(input) => {
                self.create
                    .run(self.api.create_user(input), Vec::new())
                    .await?
            }
            Submission::Update { id, patch } => {
                self.update
                    .run(
                        self.api.update_user(&id, patch),
                        update_call_site_effects(),
                    )
                    .await?
            }
        };
        self.apply(effects).await;
        Ok(user)
    }

    // Search

    /// Updates the live search input. Nothing is queried.
    pub fn type_search(&mut self, text: impl Into<String>) {
        self.search.type_text(text);
        self.publish();
    }

    /// Commits the live input and, if the term changed, runs the new query.
    pub async fn commit_search(&mut self) -> bool {
        let changed = self.search.commit();
        self.publish();
        if changed {
            tracing::debug!(term = %self.search.committed(), "Search term committed");
            self.fetch_search().await;
        }
        changed
    }

    /// Types `text` and commits it in one step (the Enter-key path).
    pub async fn search_for(&mut self, text: impl Into<String>) -> bool {
        self.type_search(text);
        self.commit_search().await
    }

    // Deletion

    /// Opens the confirmation prompt for `id`.
    pub fn request_delete(&mut self, id: impl Into<String>) {
        let id = id.into();
        if let Some(replaced) = self.gate.request(id.clone()) {
            tracing::debug!(user_id = %id, replaced = %replaced, "Replaced pending deletion target");
        }
        self.publish();
    }

    /// Closes the prompt without deleting. Returns false if it was not open.
    pub fn dismiss_delete(&mut self) -> bool {
        let dismissed = self.gate.cancel().is_some();
        self.publish();
        dismissed
    }

    /// Deletes the pending target. Returns the deleted id, or `None` if
    /// nothing awaited confirmation.
    ///
    /// The prompt is closed even if the delete fails.
    pub async fn confirm_delete(&mut self) -> api::Result<Option<String>> {
        let Some(target) = self.gate.confirm() else {
            return Ok(None);
        };
        self.publish();
        let ((), effects) = self
            .delete
            .run(self.api.delete_user(&target), Vec::new())
            .await?;
        self.apply(effects).await;
        Ok(Some(target))
    }

    // Rendering

    /// Snapshot of everything the console shows.
    pub async fn view(&self) -> ConsoleView {
        compose_view(
            &self.queries,
            &self.ui_state(),
            [
                self.create.status(),
                self.update.status(),
                self.delete.status(),
            ],
        )
        .await
    }

    fn ui_state(&self) -> UiState {
        UiState {
            form: self.form.clone(),
            search: self.search.clone(),
            gate: self.gate.clone(),
        }
    }

    fn publish(&self) {
        self.ui.send_replace(self.ui_state());
    }

    async fn fetch_list(&self) -> QueryState<Vec<User>> {
        self.queries.fetch(USERS_KEY, self.api.get_users()).await
    }

    /// An empty committed term fetches the full list under the search key.
    async fn fetch_search(&self) -> QueryState<Vec<User>> {
        let key = self.search.query_key();
        let term = self.search.committed();
        if term.is_empty() {
            self.queries.fetch(&key, self.api.get_users()).await
        } else {
            self.queries.fetch(&key, self.api.search_user(term)).await
        }
    }

    /// Refetches the active queries selected by `filter`.
    async fn refetch_matching(&self, filter: &KeyFilter) {
        if filter.matches(&users_key()) {
            self.fetch_list().await;
        }
        if filter.matches(&self.search.query_key()) {
            self.fetch_search().await;
        }
    }

    async fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Invalidate(filter) => {
                    self.queries.invalidate(&filter).await;
                    self.refetch_matching(&filter).await;
                }
                Effect::ResetForm => self.form.reset(),
                Effect::ExitEditMode => self.form.exit_edit_mode(),
            }
        }
        self.publish();
    }
}

/// Renders a console from outside while the console itself is borrowed.
#[derive(Debug, Clone)]
pub struct ConsoleMonitor {
    queries: Arc<QueryClient>,
    ui: watch::Receiver<UiState>,
    create: MutationMonitor,
    update: MutationMonitor,
    delete: MutationMonitor,
}

impl ConsoleMonitor {
    /// The screen as of the console's last published input state, with live
    /// query and mutation status.
    pub async fn view(&self) -> ConsoleView {
        let ui = self.ui.borrow().clone();
        compose_view(
            &self.queries,
            &ui,
            [
                self.create.status(),
                self.update.status(),
                self.delete.status(),
            ],
        )
        .await
    }
}

/// Mutation statuses in create, update, delete order.
async fn compose_view(
    queries: &QueryClient,
    ui: &UiState,
    [create, update, delete]: [MutationStatus; 3],
) -> ConsoleView {
    let list: QueryState<Vec<User>> = queries.state(USERS_KEY).await;
    let search: QueryState<Vec<User>> = queries.state(&ui.search.query_key()).await;
    let body = compose_body(&list, &search, ui.search.committed());

    let label = ui.gate.target().and_then(|target| {
        list.data
            .iter()
            .chain(search.data.iter())
            .flatten()
            .find(|user| user.id == target)
            .map(User::full_name)
    });

    let (in_flight, (idle, busy)) = match ui.form.mode() {
        FormMode::Create => (&create, CREATE_LABELS),
        FormMode::Edit { .. } => (&update, UPDATE_LABELS),
    };
    let submit_label = in_flight.label(idle, busy).to_string();

    ConsoleView {
        body,
        form: ui.form.state().clone(),
        mode: ui.form.mode().clone(),
        submit_label,
        search_input: ui.search.input().to_string(),
        search_term: ui.search.committed().to_string(),
        prompt: ui.gate.prompt(label.as_deref()),
        create,
        update,
        delete,
    }
}
