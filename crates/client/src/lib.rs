//! registrar_client - registration console and CLI client for the users API.
//!
//! The imperative shell around `registrar_core`: an injected query cache,
//! the query and mutation layers, the `RegistrationConsole` controller, and
//! two `UsersApi` implementations (HTTP and in-memory).

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod inmemory;
pub mod mutation;
pub mod output;
pub mod query;

pub use client::RegistrarClient;
pub use config::Config;
pub use console::RegistrationConsole;
pub use error::{ClientError, Result};
pub use inmemory::InMemoryUsersApi;
