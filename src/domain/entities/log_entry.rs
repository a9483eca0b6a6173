use chrono::{DateTime, Local};

use super::ForecastMode;

/// Timestamp layout of the `date` column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One row of the `statistics` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub user_name: String,
    /// City exactly as the user typed it
    pub city: String,
    pub timestamp: String,
    pub forecast_type: ForecastMode,
}

impl LogEntry {
    pub fn new(user_name: impl Into<String>, city: impl Into<String>, forecast_type: ForecastMode) -> Self {
        Self::at(user_name, city, forecast_type, Local::now())
    }

    pub fn at(
        user_name: impl Into<String>,
        city: impl Into<String>,
        forecast_type: ForecastMode,
        when: DateTime<Local>,
    ) -> Self {
        Self {
            user_name: user_name.into(),
            city: city.into(),
            timestamp: when.format(TIMESTAMP_FORMAT).to_string(),
            forecast_type,
        }
    }
}
