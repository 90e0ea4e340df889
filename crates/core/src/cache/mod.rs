//! Query cache keys, key matching and the storage contract.
//!
//! Concrete stores live in `registrar_client::cache`.

mod error;
mod filter;
mod keys;
mod patterns;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use filter::KeyFilter;
pub use keys::{users_key, users_search_key, users_search_pattern, USERS_KEY};
pub use patterns::pattern_matches;
pub use serialization::{deserialize_value, serialize_value, SerializationError};
pub use traits::{CachedValue, QueryStore};
