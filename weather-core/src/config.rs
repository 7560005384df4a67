use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    model::Coordinates,
    units::{self, UnitSystem},
};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Runtime override for the API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Key compiled into the binary, if one was present in the build environment.
const BUILD_API_KEY: Option<&str> = option_env!("OPENWEATHER_API_KEY");

/// A saved location fix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// country = "US"
///
/// [location]
/// latitude = 51.5
/// longitude = -0.12
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_key: Option<String>,

    /// Service root, without the trailing `/weather`.
    pub base_url: Option<String>,

    /// Country code used for unit selection instead of the process locale.
    pub country: Option<String>,

    pub timeout_secs: Option<u64>,

    pub location: Option<LocationConfig>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
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

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the key-value store holding the cached snapshot.
    pub fn store_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("preferences.json"))
    }

    /// API key from the environment, then this config, then the build.
    pub fn resolve_api_key(&self) -> Option<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        Self::pick_api_key(from_env, self.api_key.clone())
    }

    fn pick_api_key(from_env: Option<String>, from_file: Option<String>) -> Option<String> {
        from_env
            .into_iter()
            .chain(from_file)
            .chain(BUILD_API_KEY.map(str::to_string))
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn saved_location(&self) -> Option<Coordinates> {
        self.location.map(|l| Coordinates::new(l.latitude, l.longitude))
    }

    /// Unit system for this run: the explicit override, then the configured
    /// country, then the process locale.
    pub fn unit_system(&self, country_override: Option<&str>) -> UnitSystem {
        let country = country_override
            .map(str::to_string)
            .or_else(|| self.country.clone())
            .or_else(units::system_country)
            .unwrap_or_default();
        units::resolve(&country)
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn set_location(&mut self, latitude: f64, longitude: f64) {
        self.location = Some(LocationConfig { latitude, longitude });
    }
}
