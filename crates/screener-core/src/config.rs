use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const API_URL_ENV: &str = "SCREENER_API_URL";

/// Persisted settings, all optional
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// Values given on the command line, taking precedence over everything else
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// Settings resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Collaborator base address, without a trailing slash
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("resume-screener").join("config.json"))
    }

    /// Resolve against the CLI and the process environment
    pub fn resolve(&self, overrides: &Overrides) -> Result<Settings> {
        self.resolve_with_env(overrides, std::env::var(API_URL_ENV).ok())
    }

    /// Precedence: CLI, environment, config file, defaults
    pub fn resolve_with_env(
        &self,
        overrides: &Overrides,
        env_api_url: Option<String>,
    ) -> Result<Settings> {
        let api_url = overrides
            .api_url
            .clone()
            .or(env_api_url)
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        reqwest::Url::parse(&api_url).with_context(|| format!("invalid API URL: {api_url}"))?;

        let timeout_secs = overrides
            .request_timeout_secs
            .or(self.request_timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            bail!("request timeout must be at least one second");
        }

        Ok(Settings {
            base_url: api_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Settings {
    /// Persistable form of these settings
    pub fn to_config(&self) -> Config {
        Config {
            api_url: Some(self.base_url.clone()),
            request_timeout_secs: Some(self.request_timeout.as_secs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Config::new()
            .resolve_with_env(&Overrides::default(), None)
            .unwrap();
        assert_eq!(settings.base_url, DEFAULT_API_URL);
        assert_eq!(settings.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_precedence() {
        let config = Config {
            api_url: Some("http://file:1".to_string()),
            request_timeout_secs: Some(5),
        };

        let from_file = config.resolve_with_env(&Overrides::default(), None).unwrap();
        assert_eq!(from_file.base_url, "http://file:1");
        assert_eq!(from_file.request_timeout, Duration::from_secs(5));

        let from_env = config
            .resolve_with_env(&Overrides::default(), Some("http://env:2/".to_string()))
            .unwrap();
        assert_eq!(from_env.base_url, "http://env:2");

        let overrides = Overrides {
            api_url: Some("http://cli:3".to_string()),
            request_timeout_secs: Some(9),
        };
        let from_cli = config
            .resolve_with_env(&overrides, Some("http://env:2".to_string()))
            .unwrap();
        assert_eq!(from_cli.base_url, "http://cli:3");
        assert_eq!(from_cli.request_timeout, Duration::from_secs(9));
    }

    #[test]
    fn test_rejects_bad_values() {
        let overrides = Overrides {
            api_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(Config::new().resolve_with_env(&overrides, None).is_err());

        let overrides = Overrides {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(Config::new().resolve_with_env(&overrides, None).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        assert_eq!(Config::load_from(&path).unwrap(), Config::new());

        let settings = Config::new()
            .resolve_with_env(&Overrides::default(), Some("http://10.0.0.2:8000".to_string()))
            .unwrap();
        settings.to_config().save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_url.as_deref(), Some("http://10.0.0.2:8000"));
        assert_eq!(loaded.request_timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
    }
}
