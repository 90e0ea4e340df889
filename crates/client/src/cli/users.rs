//! User CLI commands.

use clap::{Parser, Subcommand};
use dialoguer::Confirm;

use crate::error::Result;

/// User management commands.
#[derive(Debug, Parser)]
pub struct UsersCommand {
    #[command(subcommand)]
    pub action: UsersAction,
}

/// Available user actions.
#[derive(Debug, Subcommand)]
pub enum UsersAction {
    /// List all users.
    List,
    /// Search users by name.
    Search {
        /// Case-insensitive substring of the first or last name.
        term: String,
    },
    /// Create a new user.
    Create {
        /// First name.
        #[arg(long)]
        first_name: String,
        /// Last name.
        #[arg(long)]
        last_name: String,
    },
    /// Update a user's names.
    Update {
        /// User ID.
        id: String,
        /// New first name.
        #[arg(long)]
        first_name: Option<String>,
        /// New last name.
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Delete user by ID.
    Delete {
        /// User ID.
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

/// Asks on the terminal whether to go ahead with a deletion. Defaults to no.
pub fn confirm_deletion(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()?;
    Ok(confirmed)
}
