//! API request types for user operations.
//!
//! These types are shared by every `UsersApi` implementation.
//! Following the Functional Core pattern, these are pure data types with no I/O.

use serde::{Deserialize, Serialize};

/// Request payload for creating a new user. The backend assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub first_name: String,
    pub last_name: String,
}

impl CreateUserInput {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// Partial update for a user. Fields left as `None` are not touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl UserPatch {
    /// Set the first name.
    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Set the last name.
    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_input_json_shape() {
        let input = CreateUserInput::new("Ada", "Lovelace");
        assert_eq!(
            serde_json::to_string(&input).unwrap(),
            r#"{"firstName":"Ada","lastName":"Lovelace"}"#
        );
    }

    #[test]
    fn test_patch_omits_absent_fields() {
        let patch = UserPatch::default().with_last_name("Byron");
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"lastName":"Byron"}"#
        );
    }

    #[test]
    fn test_patch_deserializes_missing_fields_as_none() {
        let patch: UserPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }
}
