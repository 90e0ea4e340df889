use crate::users::{CreateUserInput, User, UserPatch};

/// Fields of the create/edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    FirstName,
    LastName,
}

/// Client-owned copy of the form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub first_name: String,
    pub last_name: String,
}

impl FormState {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_empty() && self.last_name.is_empty()
    }

    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
        }
    }
}

/// Whether submitting creates a new user or updates an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    Edit { user_id: String },
}

/// The write a submit should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(CreateUserInput),
    Update { id: String, patch: UserPatch },
}

/// Owns the form fields and the create/edit mode.
#[derive(Debug, Clone, Default)]
pub struct FormController {
    state: FormState,
    mode: FormMode,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Returns the identifier being edited, if any.
    pub fn editing(&self) -> Option<&str> {
        match &self.mode {
            FormMode::Create => None,
            FormMode::Edit { user_id } => Some(user_id),
        }
    }

    /// Sets one field, leaving the other untouched.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        *self.state.field_mut(field) = value.into();
    }

    /// Loads a user into the form and switches to edit mode.
    pub fn begin_edit(&mut self, user: &User) {
        self.state = FormState {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        };
        self.mode = FormMode::Edit {
            user_id: user.id.clone(),
        };
    }

    /// Clears the fields without changing mode.
    pub fn reset(&mut self) {
        self.state = FormState::default();
    }

    /// Returns to create mode without touching the fields.
    pub fn exit_edit_mode(&mut self) {
        self.mode = FormMode::Create;
    }

    /// Clears the fields and returns to create mode.
    pub fn cancel(&mut self) {
        self.reset();
        self.exit_edit_mode();
    }

    /// Builds the write for the current mode from the current fields.
    ///
    /// In edit mode both fields are sent as the partial payload.
    pub fn submission(&self) -> Submission {
        match &self.mode {
            FormMode::Create => Submission::Create(CreateUserInput::new(
                self.state.first_name.clone(),
                self.state.last_name.clone(),
            )),
            FormMode::Edit { user_id } => Submission::Update {
                id: user_id.clone(),
                patch: UserPatch::default()
                    .with_first_name(self.state.first_name.clone())
                    .with_last_name(self.state.last_name.clone()),
            },
        }
    }
}
