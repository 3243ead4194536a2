use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

/// Default request URL. Minute-level data is excluded and temperatures are
/// requested in the service's native `us` unit system.
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://api.darksky.net/forecast/{key}/{latitude},{longitude}?exclude=minutely&units=us";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Transport options for the forecast service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Request URL with `{key}`, `{latitude}` and `{longitude}` placeholders.
    pub url_template: String,
    pub timeout_secs: u64,
    pub keep_alive_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            keep_alive_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
///
/// [service]
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,

    #[serde(default)]
    pub service: ServiceConfig,
}

impl Config {
    /// The configured API key, or an error telling the user how to set one.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `forecast configure` and enter your API key."
            )
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-cli")
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
        let err = cfg.api_key().unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("Hint: run `forecast configure`"));
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key(String::new());
        assert!(cfg.api_key().is_err());
    }

    #[test]
    fn set_api_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        assert_eq!(cfg.api_key().expect("key must exist"), "KEY");
    }

    #[test]
    fn service_defaults() {
        let service = ServiceConfig::default();
        assert_eq!(service.timeout(), Duration::from_secs(30));
        assert_eq!(service.keep_alive(), Duration::from_secs(30));
        assert!(service.url_template.contains("exclude=minutely"));
        assert!(service.url_template.contains("{key}"));
    }

    #[test]
    fn partial_service_table_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            api_key = "abc"

            [service]
            timeout_secs = 5
            "#,
        )
        .expect("config must parse");

        assert_eq!(cfg.service.timeout_secs, 5);
        assert_eq!(cfg.service.keep_alive_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.service.url_template, DEFAULT_URL_TEMPLATE);
    }
}
