use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

/// Environment variable holding the OpenWeather API key.
pub const API_KEY_VAR: &str = "API_KEY";

/// Non-secret settings, optionally read from `config.toml`.
///
/// Example TOML:
/// ```toml
/// lang = "en"
/// timeout_secs = 5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Language hint passed to OpenWeather (`lang=`).
    pub lang: String,
    pub timeout_secs: u64,
    pub weather_base_url: String,
    pub geolocation_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lang: "kr".to_string(),
            timeout_secs: 10,
            weather_base_url: "https://api.openweathermap.org".to_string(),
            geolocation_url: "https://ipinfo.io/json".to_string(),
        }
    }
}

/// Startup configuration: settings plus the required API key.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub settings: Settings,
}

impl Config {
    pub fn new(api_key: impl Into<String>, settings: Settings) -> Self {
        Self { api_key: api_key.into(), settings }
    }

    /// Load settings from disk and the API key from the environment.
    ///
    /// A `.env` file in the working directory is honoured. A missing key is an error.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let settings = Settings::load()?;
        let api_key = api_key_from(std::env::var(API_KEY_VAR).ok())?;

        Ok(Self { api_key, settings })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout_secs)
    }
}

fn api_key_from(value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(anyhow!(
            "No OpenWeather API key configured.\n\
             Hint: set `{API_KEY_VAR}` in the environment or in a `.env` file."
        )),
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist.
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

    pub fn from_toml(contents: &str) -> Result<Self> {
        let settings: Self = toml::from_str(contents)?;
        if settings.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1 second");
        }
        Ok(settings)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "kweather", "kweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
