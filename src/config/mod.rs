//! Configuration management for the Clubhouse client.
//!
//! [`Config`] is what a client is built from: the API token, the base URL
//! and the decoding policy. [`Settings`] is the optional on-disk file the
//! command-line tool reads its defaults from.

mod client;
mod settings;

use thiserror::Error;

pub use client::{Config, DEFAULT_BASE_URL};
pub use settings::Settings;

/// Errors that can occur while building or loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("Could not determine the configuration directory")]
    NoConfigDir,

    /// Creating the configuration directory failed.
    #[error("Failed to create configuration directory: {0}")]
    CreateDirError(#[source] std::io::Error),

    /// Reading the settings file failed.
    #[error("Failed to read settings file: {0}")]
    ReadError(#[source] std::io::Error),

    /// Writing the settings file failed.
    #[error("Failed to write settings file: {0}")]
    WriteError(#[source] std::io::Error),

    /// The settings file is not valid TOML.
    #[error("Failed to parse settings file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Settings could not be serialized.
    #[error("Failed to serialize settings: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// No API token was provided.
    #[error("An API token is required")]
    MissingToken,

    /// The shared client was already configured.
    #[error("The shared Clubhouse client has already been configured")]
    AlreadyConfigured,
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
