//! Pure functions for serializing query results to/from cache bytes.
//!
//! These functions use JSON, keeping cached values human-readable.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes any query result to JSON bytes.
pub fn serialize_value<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to any query result.
pub fn deserialize_value<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::User;

    #[test]
    fn test_roundtrip_users() {
        let users = vec![
            User::new("1", "Ada", "Lovelace"),
            User::new("2", "Grace", "Hopper"),
        ];
        let bytes = serialize_value(&users).expect("serialize should succeed");
        let decoded: Vec<User> = deserialize_value(&bytes).expect("deserialize");
        assert_eq!(decoded, users);
    }

    #[test]
    fn test_cached_bytes_are_camel_case_json() {
        let bytes = serialize_value(&[User::new("1", "Ada", "Lovelace")]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"[{"id":"1","firstName":"Ada","lastName":"Lovelace"}]"#
        );
    }

    #[test]
    fn test_deserialize_invalid_bytes() {
        let result = deserialize_value::<Vec<User>>(b"not json");
        assert!(matches!(
            result,
            Err(SerializationError::DeserializeFailed(_))
        ));
    }
}
