//! On-disk settings for the command-line tool.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ConfigError, Result};
use crate::api::DecodePolicy;

/// Settings read from `<config dir>/clubhouse/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Override for the API root (self-hosted proxies, testing).
    pub base_url: Option<String>,
    /// Fail on missing or mistyped required fields instead of defaulting them.
    pub strict_decoding: bool,
    /// HTTP request timeout in seconds. No timeout when unset.
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// The default settings file location.
    pub fn path() -> Result<PathBuf> {
        let base_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base_dir.join("clubhouse").join("config.toml"))
    }

    /// Load settings from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load settings from `path`, returning defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let settings: Settings = toml::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Write settings to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(ConfigError::WriteError)
    }

    /// Check values that TOML parsing alone can't.
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.base_url {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(ConfigError::ValidationError(format!(
                    "base_url must start with http:// or https://, got: {}",
                    url
                )));
            }
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn decode_policy(&self) -> DecodePolicy {
        if self.strict_decoding {
            DecodePolicy::Strict
        } else {
            DecodePolicy::Lenient
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.decode_policy(), DecodePolicy::Lenient);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let settings = Settings {
            base_url: Some("http://localhost:8080/api/v1/".to_string()),
            strict_decoding: true,
            timeout_secs: Some(15),
        };

        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.decode_policy(), DecodePolicy::Strict);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "strict_decoding = true\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert!(settings.strict_decoding);
        assert!(settings.base_url.is_none());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "strict_decoding = \"maybe\"").unwrap();

        assert!(matches!(Settings::load_from(&path), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validation() {
        let settings = Settings {
            base_url: Some("api.clubhouse.io".to_string()),
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::ValidationError(_))));

        let settings = Settings {
            timeout_secs: Some(0),
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_path_ends_with_expected_structure() {
        if let Ok(path) = Settings::path() {
            assert!(path.ends_with("clubhouse/config.toml"));
        }
    }
}
