//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Weather provider errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("provider answered with status {status}: {body}")]
    Status { status: u16, body: String },

    /// Expected field absent or of the wrong type, usually a misspelled city
    #[error("{0}")]
    MissingField(String),

    #[error("response is not valid JSON: {0}")]
    Malformed(String),
}

impl WeatherError {
    /// Text shown to the chat user
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::Transport(_) | WeatherError::Status { .. } => {
                "Ошибка при запросе, попробуйте ещё раз.".to_string()
            }
            WeatherError::MissingField(detail) => format!(
                "Ошибка при обработке данных: {}. Проверьте правильность названия города",
                detail
            ),
            WeatherError::Malformed(_) => "Ошибка, попробуйте ещё раз.".to_string(),
        }
    }
}
