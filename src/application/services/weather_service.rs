//! Weather answers - renders provider data or provider failures as chat text

use std::sync::Arc;

use crate::application::errors::WeatherError;
use crate::domain::entities::{CurrentWeather, ForecastMode, TomorrowForecast};
use crate::domain::traits::WeatherProvider;

/// Turns provider results into the text sent back to the user.
/// Never fails: every provider error becomes an apologetic message.
#[derive(Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub async fn get_current(&self, city: &str) -> String {
        match self.provider.current(city).await {
            Ok(weather) => format_current(&weather),
            Err(e) => failure_text(city, &e),
        }
    }

    pub async fn get_forecast(&self, city: &str) -> String {
        match self.provider.tomorrow(city).await {
            Ok(forecast) => format_tomorrow(&forecast),
            Err(e) => failure_text(city, &e),
        }
    }

    pub async fn describe(&self, city: &str, mode: ForecastMode) -> String {
        match mode {
            ForecastMode::Today => self.get_current(city).await,
            ForecastMode::Tomorrow => self.get_forecast(city).await,
        }
    }
}

pub fn format_current(weather: &CurrentWeather) -> String {
    format!(
        "Погода в городе {}:\n\
         Состояние: {}\n\
         Температура: {}°C\n\
         Скорость ветра: {}\n\
         Местное время: {}",
        weather.city,
        weather.condition,
        format_number(weather.temperature_c),
        format_number(weather.wind_kph),
        weather.observed_at,
    )
}

pub fn format_tomorrow(forecast: &TomorrowForecast) -> String {
    format!(
        "Погода на завтра ({}) в городе {}:\n\
         Состояние: {}\n\
         Средняя температура: {}°C",
        forecast.date,
        forecast.city,
        forecast.condition,
        format_number(forecast.avg_temperature_c),
    )
}

/// Floats keep at least one decimal place: 15.0 stays "15.0"
fn format_number(value: f64) -> String {
    format!("{:?}", value)
}

fn failure_text(city: &str, err: &WeatherError) -> String {
    match err {
        WeatherError::Transport(_) | WeatherError::Status { .. } => {
            tracing::warn!("Weather API request for '{}' failed: {}", city, err);
        }
        WeatherError::MissingField(_) => {
            tracing::warn!(
                "Failed to process weather data for '{}': {}. The city name is probably misspelled",
                city,
                err
            );
        }
        WeatherError::Malformed(_) => {
            tracing::warn!("Failed to parse weather JSON for '{}': {}", city, err);
        }
    }
    err.user_message()
}
