//! registrar_core - pure domain types and state machines for the registration console.
//!
//! Following the Functional Core pattern, nothing in this crate performs I/O.
//! The imperative shell (HTTP, caching, terminal) lives in `registrar_client`.

pub mod api;
pub mod cache;
pub mod console;
pub mod users;
