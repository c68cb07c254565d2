use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::provider::weatherapi::DEFAULT_ENDPOINT;

/// Environment variable that supplies the API key, overriding the config file.
pub const API_KEY_ENV: &str = "ATMOSYNC_API_KEY";

const DEFAULT_LOG_LEVEL: &str = "warn";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// WeatherAPI.com key.
    pub api_key: Option<String>,

    /// Base URL of the provider API; defaults to WeatherAPI.com v1.
    pub endpoint: Option<String>,

    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: Option<String>,

    /// Transport timeout. No timeout when absent.
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// API key from the environment if set, otherwise from this config.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.api_key_from(env::var(API_KEY_ENV).ok())
    }

    pub(crate) fn api_key_from(&self, env_value: Option<String>) -> Result<String> {
        env_value
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `atmosync configure` or set {API_KEY_ENV}."
                )
            })
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "atmosync", "atmosync")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key_from(None).unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("atmosync configure"));
    }

    #[test]
    fn environment_overrides_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        assert_eq!(cfg.api_key_from(Some("ENV_KEY".into())).unwrap(), "ENV_KEY");
        assert_eq!(cfg.api_key_from(None).unwrap(), "FILE_KEY");
    }

    #[test]
    fn blank_keys_are_ignored() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());

        assert!(cfg.api_key_from(Some(String::new())).is_err());

        cfg.set_api_key("FILE_KEY".into());
        assert_eq!(cfg.api_key_from(Some(" ".into())).unwrap(), "FILE_KEY");
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = Config::default();

        assert_eq!(cfg.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(cfg.log_level(), "warn");
        assert_eq!(cfg.timeout_secs, None);
    }

    #[test]
    fn parses_toml() {
        let cfg = Config::from_toml(
            r#"
            api_key = "KEY"
            endpoint = "http://localhost:9000/v1"
            log_level = "debug"
            timeout_secs = 10
            "#,
        )
        .unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.endpoint(), "http://localhost:9000/v1");
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.timeout_secs, Some(10));
    }

    #[test]
    fn empty_toml_is_default() {
        let cfg = Config::from_toml("").unwrap();
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn toml_roundtrip_keeps_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back = Config::from_toml(&text).unwrap();
        assert_eq!(back.api_key.as_deref(), Some("KEY"));
    }
}
