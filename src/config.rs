use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::data::REST_COUNTRIES_URL;
use crate::error::{PassportError, Result};
use crate::filter::FilterMode;

const APP_DIR: &str = "passport";
const CONFIG_FILE: &str = "config.toml";

/// Settings read from `~/.config/passport/config.toml`. Every key is optional.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_url: String,
    pub fetch_timeout_secs: u64,
    pub filter_mode: FilterMode,
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: REST_COUNTRIES_URL.to_string(),
            fetch_timeout_secs: 30,
            filter_mode: FilterMode::default(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Loads the user config, falling back to defaults when it is missing or invalid.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            tracing::warn!("no config directory on this platform, using defaults");
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("no config at {}", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| PassportError::config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::parse(&text).map_err(|e| match e {
            PassportError::Config { message } => {
                PassportError::config(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| PassportError::config(e.to_string()))?;
        if config.fetch_timeout_secs == 0 {
            return Err(PassportError::config("fetch_timeout_secs must be at least 1"));
        }
        Ok(config)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Directory holding `storage.json`.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn reads_every_key() {
        let config = Config::parse(
            r#"
            api_url = "http://localhost:8080/all"
            fetch_timeout_secs = 5
            filter_mode = "combined"
            data_dir = "/tmp/passport"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_url, "http://localhost:8080/all");
        assert_eq!(config.fetch_timeout_secs, 5);
        assert_eq!(config.filter_mode, FilterMode::Combined);
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/passport"));
    }

    #[test]
    fn rejects_unknown_keys_and_zero_timeout() {
        assert!(matches!(
            Config::parse("colour = \"red\""),
            Err(PassportError::Config { .. })
        ));
        assert!(matches!(
            Config::parse("fetch_timeout_secs = 0"),
            Err(PassportError::Config { .. })
        ));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn invalid_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "filter_mode = \"sideways\"").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
