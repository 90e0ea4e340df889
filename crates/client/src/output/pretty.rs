//! Pretty output formatting.

use registrar_core::console::{ConsoleView, FormMode, MutationStatus, ViewBody};
use registrar_core::users::User;

/// Format a user for display.
pub fn format_user(user: &User) -> String {
    format!("{}\n  ID: {}", user.full_name(), user.id)
}

/// Format users as a numbered table.
pub fn format_users(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let id_width = column_width("ID", users.iter().map(|u| u.id.as_str()));
    let first_width = column_width("FIRST NAME", users.iter().map(|u| u.first_name.as_str()));
    let index_width = users.len().to_string().len().max(1);

    let mut output = format!("USERS ({})\n", users.len());
    output.push_str(&format!(
        "{:>index_width$}  {:<id_width$}  {:<first_width$}  LAST NAME\n",
        "#", "ID", "FIRST NAME"
    ));
    output.push_str(&"-".repeat(40));
    for (i, user) in users.iter().enumerate() {
        output.push_str(&format!(
            "\n{:>index_width$}  {:<id_width$}  {:<first_width$}  {}",
            i + 1,
            user.id,
            user.first_name,
            user.last_name
        ));
    }
    output
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|v| v.chars().count())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

/// Render the whole console screen.
pub fn format_view(view: &ConsoleView) -> String {
    let mut output = match &view.body {
        ViewBody::Loading => "Loading...".to_string(),
        ViewBody::Error(message) => format!("Error: {}", message),
        ViewBody::Table(rows) => format_users(rows),
    };

    output.push_str("\n\n");
    if view.search_term.is_empty() {
        output.push_str(&format!("Search: \"{}\"", view.search_input));
    } else {
        output.push_str(&format!(
            "Search: \"{}\" (showing \"{}\")",
            view.search_input, view.search_term
        ));
    }

    let mode = match &view.mode {
        FormMode::Create => "new user".to_string(),
        FormMode::Edit { user_id } => format!("editing {}", user_id),
    };
    output.push_str(&format!(
        "\nForm ({}): first \"{}\", last \"{}\"  [{}]",
        mode, view.form.first_name, view.form.last_name, view.submit_label
    ));

    if view.prompt.open {
        output.push_str(&format!(
            "\n\n{}\n  {}\n  (confirm / dismiss)",
            view.prompt.title, view.prompt.message
        ));
    }
    output
}

/// Pending and failure state of each mutation.
pub fn format_status(view: &ConsoleView) -> String {
    [
        ("create", &view.create),
        ("update", &view.update),
        ("delete", &view.delete),
    ]
    .iter()
    .map(|(name, status)| format!("{}: {}", name, describe(status)))
    .collect::<Vec<_>>()
    .join("\n")
}

fn describe(status: &MutationStatus) -> String {
    match (&status.pending, &status.last_error) {
        (true, _) => "pending".to_string(),
        (false, Some(error)) => format!("failed ({})", error),
        (false, None) => "idle".to_string(),
    }
}
