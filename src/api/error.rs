//! API error types for the Clubhouse client.

use thiserror::Error;

/// Errors that can occur when interacting with the Clubhouse API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication failed - invalid or revoked API token.
    #[error("Authentication failed: check your API token")]
    Unauthorized,

    /// Permission denied - the token lacks access to the resource.
    #[error("Permission denied: you don't have access to this resource")]
    Forbidden,

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limited by the Clubhouse API.
    #[error("Rate limited: please wait before retrying")]
    RateLimited,

    /// The request was rejected by the API (validation failures, 422 and friends).
    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Clubhouse server error (5xx).
    #[error("Clubhouse server error (HTTP {status}): {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Error message from the API, or the request path.
        message: String,
    },

    /// Network or HTTP error. Never carries the request URL.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid response from the API.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// A required field was missing or mistyped under strict decoding.
    #[error("Failed to decode {entity}: field '{field}' {reason}")]
    Decode {
        /// The entity being decoded.
        entity: &'static str,
        /// The wire key of the offending field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// Keyring error when storing/retrieving tokens.
    #[error("Keyring error: {0}")]
    Keyring(String),
}

// The request URL holds the API token in its query, so it is stripped
// before the error can be displayed or logged.
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.without_url())
    }
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: reqwest::StatusCode, context: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound(context.to_string()),
            429 => ApiError::RateLimited,
            code @ 500..=599 => ApiError::ServerError {
                status: code,
                message: context.to_string(),
            },
            code => ApiError::Rejected {
                status: code,
                message: context.to_string(),
            },
        }
    }

    /// The HTTP status behind this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::RateLimited => Some(429),
            ApiError::Rejected { status, .. } | ApiError::ServerError { status, .. } => {
                Some(*status)
            }
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
