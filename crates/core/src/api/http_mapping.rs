//! Pure functions for mapping HTTP error statuses to [`ApiError`].

use super::ApiError;

/// Maps a non-success HTTP status to an [`ApiError`].
///
/// - 404 -> `NotFound` for `resource_id`
/// - anything else -> `Server` carrying the status and response body
///
/// # Examples
///
/// ```
/// use registrar_core::api::{status_code_to_api_error, ApiError};
///
/// let error = status_code_to_api_error(404, "u-1", String::new());
/// assert_eq!(error, ApiError::NotFound { id: "u-1".to_string() });
/// ```
pub fn status_code_to_api_error(status: u16, resource_id: &str, body: String) -> ApiError {
    match status {
        404 => ApiError::NotFound {
            id: resource_id.to_string(),
        },
        _ => {
            let message = if body.trim().is_empty() {
                "Unknown error".to_string()
            } else {
                body
            };
            ApiError::Server { status, message }
        }
    }
}
