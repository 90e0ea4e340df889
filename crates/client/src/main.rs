//! registrar CLI entry point.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use registrar_client::cache::MemoryQueryCache;
use registrar_client::cli::users::{confirm_deletion, UsersAction};
use registrar_client::cli::{repl, Cli, Commands, OutputFormat};
use registrar_client::output::{json, pretty};
use registrar_client::query::QueryClient;
use registrar_client::{Config, InMemoryUsersApi, RegistrarClient, RegistrationConsole};
use registrar_core::api::{ApiError, UsersApi};
use registrar_core::console::{FormField, ViewBody};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output on stdout stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "registrar_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env().with_base_url(&cli.base_url);

    let api: Arc<dyn UsersApi> = if cli.demo {
        tracing::info!("Using in-memory users API with sample data");
        Arc::new(InMemoryUsersApi::seeded())
    } else {
        tracing::info!(base_url = %config.base_url, "Using HTTP users API");
        Arc::new(RegistrarClient::from_config(&config).context("Failed to build HTTP client")?)
    };

    let queries = Arc::new(QueryClient::new(
        Arc::new(MemoryQueryCache::new(config.cache_max_entries)),
        config.query_options(),
    ));
    let mut console = RegistrationConsole::new(api, queries);

    match cli.command {
        Commands::Console => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            repl::run(&mut console, stdin, &mut anstream::stdout(), cli.format).await?;
        }
        Commands::Users(users_cmd) => match users_cmd.action {
            UsersAction::List => {
                console.mount().await;
                let users = displayed_rows(&console).await?;
                print_users(&users, cli.format);
            }
            UsersAction::Search { term } => {
                // An unchanged (empty) term triggers no query; load everything instead.
                if !console.search_for(term).await {
                    console.mount().await;
                }
                let users = displayed_rows(&console).await?;
                print_users(&users, cli.format);
            }
            UsersAction::Create {
                first_name,
                last_name,
            } => {
                console.set_field(FormField::FirstName, first_name);
                console.set_field(FormField::LastName, last_name);
                let user = console.submit().await?;
                match cli.format {
                    OutputFormat::Json => anstream::println!("{}", json::format_json(&user)),
                    OutputFormat::Pretty => {
                        anstream::println!("Created:\n{}", pretty::format_user(&user))
                    }
                }
            }
            UsersAction::Update {
                id,
                first_name,
                last_name,
            } => {
                if first_name.is_none() && last_name.is_none() {
                    bail!("Nothing to update: pass --first-name and/or --last-name");
                }

                console.mount().await;
                let current = displayed_rows(&console)
                    .await?
                    .into_iter()
                    .find(|user| user.id == id)
                    .ok_or(ApiError::NotFound { id })?;

                console.edit(&current);
                if let Some(first_name) = first_name {
                    console.set_field(FormField::FirstName, first_name);
                }
                if let Some(last_name) = last_name {
                    console.set_field(FormField::LastName, last_name);
                }
                let user = console.submit().await?;
                match cli.format {
                    OutputFormat::Json => anstream::println!("{}", json::format_json(&user)),
                    OutputFormat::Pretty => {
                        anstream::println!("Updated:\n{}", pretty::format_user(&user))
                    }
                }
            }
            UsersAction::Delete { id, yes } => {
                console.mount().await;
                console.request_delete(id);

                if !yes {
                    let prompt = console.view().await.prompt;
                    if !confirm_deletion(&prompt.message)? {
                        console.dismiss_delete();
                        if !cli.quiet {
                            anstream::println!("Cancelled.");
                        }
                        return Ok(());
                    }
                }

                if let Some(deleted) = console.confirm_delete().await? {
                    if !cli.quiet {
                        anstream::println!("Deleted user {}", deleted);
                    }
                }
            }
        },
    }

    Ok(())
}

/// Rows the console currently shows, or the list error as a failure.
async fn displayed_rows(console: &RegistrationConsole) -> Result<Vec<registrar_core::users::User>> {
    match console.view().await.body {
        ViewBody::Table(rows) => Ok(rows),
        ViewBody::Error(message) => bail!("Failed to load users: {}", message),
        ViewBody::Loading => bail!("Users are still loading"),
    }
}

fn print_users(users: &[registrar_core::users::User], format: OutputFormat) {
    match format {
        OutputFormat::Json => anstream::println!("{}", json::format_json(users)),
        OutputFormat::Pretty => anstream::println!("{}", pretty::format_users(users)),
    }
}
