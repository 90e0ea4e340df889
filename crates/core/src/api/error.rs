use thiserror::Error;

/// Errors returned by a `UsersApi` implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("User not found: {id}")]
    NotFound { id: String },
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for users API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let error = ApiError::NotFound {
            id: "u-1".to_string(),
        };
        assert_eq!(error.to_string(), "User not found: u-1");
    }

    #[test]
    fn test_server_display() {
        let error = ApiError::Server {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(error.to_string(), "Server returned 500: boom");
    }

    #[test]
    fn test_transport_display() {
        let error = ApiError::Transport("connection refused".to_string());
        assert_eq!(error.to_string(), "Transport error: connection refused");
    }
}
