/// Title shown on the deletion prompt.
const PROMPT_TITLE: &str = "Delete user";

/// Where the deletion gate is in its `Idle -> AwaitingConfirmation -> Idle` cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GateState {
    #[default]
    Idle,
    AwaitingConfirmation { target: String },
}

/// Display contract of the confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub open: bool,
    pub title: String,
    pub message: String,
}

/// Requires explicit confirmation before a delete is issued.
///
/// There is a single target slot: requesting a second deletion while one is
/// awaiting confirmation replaces the first.
#[derive(Debug, Clone, Default)]
pub struct DeletionGate {
    state: GateState,
}

impl DeletionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, GateState::AwaitingConfirmation { .. })
    }

    /// The identifier awaiting confirmation, if any.
    pub fn target(&self) -> Option<&str> {
        match &self.state {
            GateState::Idle => None,
            GateState::AwaitingConfirmation { target } => Some(target),
        }
    }

    /// Records a target and opens the prompt.
    ///
    /// Returns the target this request replaced, if one was pending.
    pub fn request(&mut self, id: impl Into<String>) -> Option<String> {
        let previous = self.take();
        self.state = GateState::AwaitingConfirmation { target: id.into() };
        previous
    }

    /// Closes the prompt and hands back the target to delete.
    ///
    /// Returns `None` when nothing was awaiting confirmation.
    pub fn confirm(&mut self) -> Option<String> {
        self.take()
    }

    /// Closes the prompt without deleting. Returns the discarded target.
    pub fn cancel(&mut self) -> Option<String> {
        self.take()
    }

    /// Builds the prompt contract. `label` names the target when known.
    pub fn prompt(&self, label: Option<&str>) -> ConfirmPrompt {
        let message = match (self.target(), label) {
            (Some(_), Some(label)) => format!(
                "Are you sure you want to delete {}? This cannot be undone.",
                label
            ),
            (Some(target), None) => format!(
                "Are you sure you want to delete user {}? This cannot be undone.",
                target
            ),
            (None, _) => String::new(),
        };
        ConfirmPrompt {
            open: self.is_open(),
            title: PROMPT_TITLE.to_string(),
            message,
        }
    }

    fn take(&mut self) -> Option<String> {
        match std::mem::take(&mut self.state) {
            GateState::Idle => None,
            GateState::AwaitingConfirmation { target } => Some(target),
        }
    }
}
