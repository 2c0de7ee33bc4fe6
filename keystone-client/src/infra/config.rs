use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "KEYSTONE_API_URL";

/// Local development endpoint used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<ConfigError> for crate::infra::errors::ApiError {
    fn from(err: ConfigError) -> Self {
        crate::infra::errors::ApiError::Config(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    /// Overrides the platform data directory for the key-value store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_path: None,
        }
    }
}

impl Config {
    /// Resolve configuration from the config file and environment.
    ///
    /// An unreadable config file is logged and skipped; the environment
    /// variable always wins over the file for the API URL.
    pub fn load() -> Self {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => match Self::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("[Config] {}, using defaults", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        };

        if let Ok(api_url) = std::env::var(API_URL_ENV)
            && !api_url.trim().is_empty()
        {
            config.api_url = api_url;
        }

        config
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(path) = Self::default_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            std::fs::write(path, content)?;
        }
        Ok(())
    }

    /// Check that `api_url` is an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_url(&self.api_url)
    }

    pub fn validate_url(api_url: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: api_url.to_string(),
            reason,
        };

        let parsed =
            url::Url::parse(api_url).map_err(|e| invalid(e.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }

    fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("keystone").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_point_at_local_development() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8000/api");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"storage_path": "/tmp/keystone"}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.storage_path, Some(PathBuf::from("/tmp/keystone")));
    }

    #[test]
    fn malformed_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "api_url = nope").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_non_http_urls() {
        let config = Config {
            api_url: "ftp://example.com".into(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { .. })
        ));

        let config = Config {
            api_url: "not a url".into(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
