//! CLI command definitions.

pub mod repl;
pub mod users;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::DEFAULT_BASE_URL;

/// Registration console and CLI client for the registrar users API.
#[derive(Debug, Parser)]
#[command(name = "registrar")]
#[command(about = "Registration console for the registrar users API", long_about = None)]
pub struct Cli {
    /// Users API base URL.
    #[arg(long, env = "REGISTRAR_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    /// Use an in-memory API seeded with sample users instead of HTTP.
    #[arg(long)]
    pub demo: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// One-shot user operations.
    Users(users::UsersCommand),
    /// Interactive registration console.
    Console,
}
