//! Error types.

use thiserror::Error;

/// The main error type for vyzio-chat operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-related error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The marketplace API returned an error response.
    #[error("API error [{status}]: {message}")]
    Api { status: u16, message: String },

    /// Operation requires authentication but none was provided.
    #[error("Authentication required")]
    AuthRequired,

    /// A required field was missing in the response or local state.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Invalid argument passed to an API method.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A send for this session is already in flight.
    #[error("A send is already in flight")]
    SendInFlight,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing(field: impl Into<String>) -> Self {
        Error::MissingField(field.into())
    }

    /// Create an invalid argument error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Check if this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::AuthRequired => true,
            Error::Api { status, .. } => *status == 401 || *status == 403,
            _ => false,
        }
    }
}

/// Result type alias for vyzio-chat operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::api(404, "chat not found");
        assert_eq!(format!("{}", e), "API error [404]: chat not found");
    }

    #[test]
    fn test_retryable() {
        assert!(Error::api(503, "unavailable").is_retryable());
        assert!(Error::api(429, "slow down").is_retryable());
        assert!(!Error::api(400, "bad request").is_retryable());
    }

    #[test]
    fn test_auth_error() {
        assert!(Error::api(401, "no token").is_auth_error());
        assert!(Error::AuthRequired.is_auth_error());
        assert!(!Error::api(500, "oops").is_auth_error());
    }
}
