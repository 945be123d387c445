//! Centralized error types for the Clubhouse client.
//!
//! API calls return [`ApiError`] and configuration returns [`ConfigError`].
//! [`Error`] aggregates both for callers (and the command-line tool) that
//! want a single type with user-facing messages.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::ConfigError;

/// The crate-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Recover a crate error from an `anyhow` chain.
    ///
    /// Returns the original error when it holds none of this crate's types.
    pub fn from_anyhow(err: anyhow::Error) -> std::result::Result<Self, anyhow::Error> {
        let err = match err.downcast::<Error>() {
            Ok(e) => return Ok(e),
            Err(err) => err,
        };
        let err = match err.downcast::<ApiError>() {
            Ok(e) => return Ok(Error::Api(e)),
            Err(err) => err,
        };
        match err.downcast::<ConfigError>() {
            Ok(e) => Ok(Error::Config(e)),
            Err(err) => Err(err),
        }
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            Error::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError(_) => {
                    "Could not create configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read settings file. Please check the file is readable.".to_string()
                }
                ConfigError::WriteError(_) => {
                    "Could not save settings. Please check file permissions.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Settings file is invalid. Please check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save settings. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
                ConfigError::MissingToken => "No Clubhouse API token was provided.".to_string(),
                ConfigError::AlreadyConfigured => {
                    "The Clubhouse client is already configured.".to_string()
                }
            },
            Error::Api(e) => match e {
                ApiError::Unauthorized => {
                    "Authentication failed. Please check your API token.".to_string()
                }
                ApiError::Forbidden => {
                    "Access denied. You don't have permission to access this resource.".to_string()
                }
                ApiError::NotFound(resource) => format!("'{}' was not found.", resource),
                ApiError::RateLimited => {
                    "Too many requests. Please wait a moment and try again.".to_string()
                }
                ApiError::Rejected { message, .. } => {
                    format!("Clubhouse rejected the request: {}", message)
                }
                ApiError::ServerError { .. } => {
                    "Clubhouse server error. Please try again later.".to_string()
                }
                ApiError::Network(_) => {
                    "Connection failed. Please check your internet connection.".to_string()
                }
                ApiError::InvalidUrl(_) => "Invalid Clubhouse URL in configuration.".to_string(),
                ApiError::InvalidResponse(_) => {
                    "Unexpected response from Clubhouse. Please try again.".to_string()
                }
                ApiError::Decode { entity, field, .. } => {
                    format!("Clubhouse returned a {} without a valid '{}'.", entity, field)
                }
                ApiError::Keyring(_) => {
                    "Could not access secure storage. Please log in again.".to_string()
                }
            },
            Error::Io(_) => "A file operation failed. Please check file permissions.".to_string(),
            Error::Other(msg) => msg.clone(),
        }
    }

    /// Check if this error is recoverable.
    ///
    /// Recoverable errors can be retried without changing configuration.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Api(ApiError::RateLimited)
                | Error::Api(ApiError::ServerError { .. })
                | Error::Api(ApiError::Network(_))
                | Error::Api(ApiError::NotFound(_))
        )
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            Error::Config(ConfigError::MissingToken) | Error::Api(ApiError::Keyring(_)) => {
                Some("Run 'clubhouse auth login' or set CLUBHOUSE_API_TOKEN.")
            }
            Error::Api(ApiError::Unauthorized) => {
                Some("Generate a new API token under Settings > API Tokens in Clubhouse.")
            }
            Error::Api(ApiError::RateLimited) => Some("Wait a few seconds and try again."),
            Error::Api(ApiError::Network(_)) => {
                Some("Check your internet connection and the configured base_url.")
            }
            _ => None,
        }
    }
}

/// Result type for crate-level operations.
pub type Result<T> = std::result::Result<T, Error>;
