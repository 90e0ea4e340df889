//! HTTP client for the users API.

mod users;

use registrar_core::api::{self, status_code_to_api_error, ApiError};

use crate::config::Config;
use crate::error::Result;

/// HTTP implementation of `UsersApi`.
#[derive(Debug, Clone)]
pub struct RegistrarClient {
    client: reqwest::Client,
    base_url: String,
}

impl RegistrarClient {
    /// Create a new client with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Create a client with the base URL and timeout from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: normalize_base_url(config.base_url.clone()),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a JSON body, or map the error status.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        resource_id: &str,
    ) -> api::Result<T> {
        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ApiError::InvalidResponse(e.to_string()))
        } else {
            Err(error_from_response(response, resource_id).await)
        }
    }

    /// URL of a single user. The id is percent-encoded as one path segment.
    fn user_url(&self, id: &str) -> String {
        self.url(&format!("/users/{}", urlencoding::encode(id)))
    }

    /// Handle responses where no body is expected.
    async fn handle_empty_response(
        &self,
        response: reqwest::Response,
        resource_id: &str,
    ) -> api::Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response, resource_id).await)
        }
    }
}

async fn error_from_response(response: reqwest::Response, resource_id: &str) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    status_code_to_api_error(status, resource_id, body)
}

/// Maps a failed send to a transport error.
fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = RegistrarClient::new("http://localhost:3000/api/");
        assert_eq!(client.base_url(), "http://localhost:3000/api");
        assert_eq!(client.url("/users"), "http://localhost:3000/api/users");
    }

    #[test]
    fn test_user_url_encodes_id() {
        let client = RegistrarClient::new("http://localhost:3000/api");
        assert_eq!(
            client.user_url("a?b#c/d e"),
            "http://localhost:3000/api/users/a%3Fb%23c%2Fd%20e"
        );
        assert_eq!(client.user_url("u-1"), "http://localhost:3000/api/users/u-1");
    }
}
