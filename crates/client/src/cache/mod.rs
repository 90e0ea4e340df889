//! Query store implementations.
//!
//! This module provides the concrete implementation of the `QueryStore`
//! trait defined in `registrar_core::cache`. The store is created once and
//! injected into the query client, never reached through a global.

mod memory;

pub use memory::MemoryQueryCache;
