//! Client configuration: API token, base URL and decoding policy.

use std::fmt;

use reqwest::Url;
use tracing::warn;

use super::{ConfigError, Result, Settings};
use crate::api::auth::mask_token;
use crate::api::DecodePolicy;

/// The public Clubhouse API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.clubhouse.io/api/v1/";

/// Everything a client needs to build requests.
///
/// A `Config` always holds a non-empty token, so a client built from one
/// can never issue an unauthenticated request.
#[derive(Clone)]
pub struct Config {
    api_token: String,
    base_url: Url,
    decode_policy: DecodePolicy,
}

impl Config {
    /// Create a configuration for the public API.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingToken` if the token is empty.
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into().trim().to_string();
        if api_token.is_empty() {
            return Err(ConfigError::MissingToken);
        }

        Ok(Self {
            api_token,
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            decode_policy: DecodePolicy::default(),
        })
    }

    /// Build a configuration from a token and on-disk settings.
    pub fn from_settings(api_token: impl Into<String>, settings: &Settings) -> Result<Self> {
        let config = Self::new(api_token)?.with_decode_policy(settings.decode_policy());
        match settings.base_url.as_deref() {
            Some(url) => config.with_base_url(url),
            None => Ok(config),
        }
    }

    /// Point the client at a different API root.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the URL is not a valid
    /// http(s) URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Choose how strictly responses are decoded.
    #[must_use]
    pub fn with_decode_policy(mut self, decode_policy: DecodePolicy) -> Self {
        self.decode_policy = decode_policy;
        self
    }

    /// The API token, sent as the `token` query parameter.
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    /// The API root; always ends with a slash.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn decode_policy(&self) -> DecodePolicy {
        self.decode_policy
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &mask_token(&self.api_token))
            .field("base_url", &self.base_url.as_str())
            .field("decode_policy", &self.decode_policy)
            .finish()
    }
}

/// Parse a base URL, normalizing it to exactly one trailing slash so
/// relative paths join beneath it.
fn parse_base_url(url: &str) -> Result<Url> {
    let normalized = normalize_base_url(url);

    if !normalized.starts_with("https://") && !normalized.starts_with("http://") {
        return Err(ConfigError::ValidationError(format!(
            "base URL must start with http:// or https://, got: {}",
            url
        )));
    }

    // Warn if not HTTPS (but don't enforce for localhost/testing)
    if !normalized.starts_with("https://")
        && !normalized.contains("localhost")
        && !normalized.contains("127.0.0.1")
    {
        warn!("Base URL does not use HTTPS: {}. The API token would be sent in the clear.", normalized);
    }

    Url::parse(&normalized)
        .map_err(|e| ConfigError::ValidationError(format!("invalid base URL '{}': {}", url, e)))
}

fn normalize_base_url(url: &str) -> String {
    format!("{}/", url.trim().trim_end_matches('/'))
}
