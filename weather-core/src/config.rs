use anyhow::{Context, Result, anyhow, ensure};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Upper bounds accepted by the Open-Meteo forecast endpoint.
pub const MAX_FORECAST_DAYS: u8 = 16;
pub const MAX_FORECAST_HOURS: u16 = 384;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// timeout_secs = 5
/// forecast_hours = 12
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub geocoding_url: String,
    pub forecast_url: String,
    /// Language for geocoded place names.
    pub language: String,
    pub timeout_secs: u64,
    pub forecast_days: u8,
    pub forecast_hours: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            language: "en".to_string(),
            timeout_secs: 10,
            forecast_days: 7,
            forecast_hours: 24,
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse and validate a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.validate()?;
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
        let dirs = ProjectDirs::from("dev", "weather-station", "weather-station")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.timeout_secs > 0, "timeout_secs must be at least 1");
        ensure!(
            (1..=MAX_FORECAST_DAYS).contains(&self.forecast_days),
            "forecast_days must be between 1 and {MAX_FORECAST_DAYS}, got {}",
            self.forecast_days
        );
        ensure!(
            (1..=MAX_FORECAST_HOURS).contains(&self.forecast_hours),
            "forecast_hours must be between 1 and {MAX_FORECAST_HOURS}, got {}",
            self.forecast_hours
        );
        ensure!(!self.language.trim().is_empty(), "language must not be empty");
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_open_meteo() {
        let cfg = Config::default();

        assert_eq!(cfg.geocoding_url, DEFAULT_GEOCODING_URL);
        assert_eq!(cfg.forecast_url, DEFAULT_FORECAST_URL);
        assert_eq!(cfg.forecast_days, 7);
        assert_eq!(cfg.forecast_hours, 24);
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let cfg = Config::from_toml_str("timeout_secs = 3\nforecast_hours = 12\n")
            .expect("partial config must parse");

        assert_eq!(cfg.timeout_secs, 3);
        assert_eq!(cfg.forecast_hours, 12);
        assert_eq!(cfg.forecast_days, 7);
        assert_eq!(cfg.language, "en");
    }

    #[test]
    fn empty_toml_is_the_default_config() {
        let cfg = Config::from_toml_str("").expect("empty config must parse");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml_str("api_key = \"abc\"\n").is_err());
    }

    #[test]
    fn out_of_range_forecast_days_are_rejected() {
        let err = Config::from_toml_str("forecast_days = 30\n").unwrap_err();
        assert!(err.to_string().contains("forecast_days"));

        let err = Config::from_toml_str("forecast_hours = 0\n").unwrap_err();
        assert!(err.to_string().contains("forecast_hours"));
    }

    #[test]
    fn serialized_config_parses_back() {
        let cfg = Config {
            language: "de".into(),
            forecast_days: 3,
            ..Config::default()
        };

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        assert_eq!(Config::from_toml_str(&text).expect("parse"), cfg);
    }
}
