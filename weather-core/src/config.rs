use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::model::{Coordinates, Endpoint};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_GEOLOCATION_ENDPOINT: &str = "http://ip-api.com/json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_BASE_URL: &str = "WEATHER_API_BASE_URL";
pub const ENV_API_KEY: &str = "WEATHER_API_KEY";

/// Weather service settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Defaults to the OpenWeather current-weather endpoint.
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// How the device position is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeolocationMode {
    /// Approximate position from an IP geolocation service.
    #[default]
    Ip,
    /// Fixed `latitude`/`longitude` from this file.
    Fixed,
    Disabled,
}

impl GeolocationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeolocationMode::Ip => "ip",
            GeolocationMode::Fixed => "fixed",
            GeolocationMode::Disabled => "disabled",
        }
    }

    pub const fn all() -> &'static [GeolocationMode] {
        &[GeolocationMode::Ip, GeolocationMode::Fixed, GeolocationMode::Disabled]
    }
}

impl std::fmt::Display for GeolocationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeolocationConfig {
    #[serde(default)]
    pub mode: GeolocationMode,
    pub endpoint: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timeout_secs: Option<u64>,
}

impl GeolocationConfig {
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_GEOLOCATION_ENDPOINT)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn fixed_coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates { lat: self.latitude?, lon: self.longitude? })
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [api]
/// api_key = "..."
///
/// [geolocation]
/// mode = "fixed"
/// latitude = 48.85
/// longitude = 2.35
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub geolocation: GeolocationConfig,
}

impl Config {
    /// Load config from disk and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_env(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
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
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override file values with `WEATHER_API_BASE_URL` / `WEATHER_API_KEY`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = Some(base);
        }
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.api.api_key = Some(key);
        }
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api.api_key = Some(api_key);
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Validated base URL and key for building request URLs.
    pub fn endpoint(&self) -> Result<Endpoint> {
        let api_key = self
            .api
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `weather configure` or set {ENV_API_KEY}."
                )
            })?;

        let raw = self.api.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base_url =
            Url::parse(raw).with_context(|| format!("Invalid weather API base URL: {raw}"))?;

        Ok(Endpoint::new(base_url, api_key.to_string()))
    }
}
