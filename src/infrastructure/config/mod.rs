//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use crate::application::errors::ConfigError;
use crate::infrastructure::weather::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub telegram: TelegramConfig,
    pub weather: WeatherConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    /// Pause before the main menu is shown again after "Вернуться"
    pub return_delay_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    /// Long polling timeout for getUpdates
    pub poll_timeout_secs: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub language: String,
    /// Per-request limit for WeatherAPI.com calls
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct LoggingConfig {
    /// Write logs to this file instead of stdout
    pub file: Option<PathBuf>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "weather-informer-bot".to_string(),
            return_delay_secs: 2,
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            poll_timeout_secs: 30,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            language: "ru".to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("bot.db"),
        }
    }
}

impl BotConfig {
    pub fn return_delay(&self) -> Duration {
        Duration::from_secs(self.return_delay_secs)
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Overlay environment variables on top of file values
    pub fn apply_env(mut self) -> Self {
        self.apply_vars(|key| std::env::var(key).ok());
        self
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        let first = |keys: &[&str]| keys.iter().find_map(|key| var(key).filter(|v| !v.is_empty()));

        if let Some(token) = first(&["TOKEN", "BOT_TOKEN"]) {
            self.telegram.token = Some(token);
        }

        if let Some(api_key) = first(&["API_KEY", "WEATHER_API_KEY"]) {
            self.weather.api_key = Some(api_key);
        }

        if let Some(base_url) = first(&["WEATHER_BASE_URL"]) {
            self.weather.base_url = base_url;
        }

        if let Some(path) = first(&["DATABASE_PATH"]) {
            self.database.path = PathBuf::from(path);
        }

        if let Some(file) = first(&["LOG_FILE"]) {
            self.logging.file = Some(PathBuf::from(file));
        }
    }

    /// Both secrets are required; the bot cannot do anything useful without them
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram.token.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingField(
                "telegram.token (set TOKEN in the environment or .env)".to_string(),
            ));
        }

        if self.weather.api_key.as_deref().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingField(
                "weather.api-key (set API_KEY in the environment or .env)".to_string(),
            ));
        }

        if self.telegram.poll_timeout_secs < 0 {
            return Err(ConfigError::InvalidValue(format!(
                "telegram.poll-timeout-secs must not be negative, got {}",
                self.telegram.poll_timeout_secs
            )));
        }

        if self.weather.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "weather.timeout-secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn token(&self) -> &str {
        self.telegram.token.as_deref().unwrap_or_default()
    }

    pub fn api_key(&self) -> &str {
        self.weather.api_key.as_deref().unwrap_or_default()
    }
}
