use async_trait::async_trait;
use crate::application::errors::WeatherError;
use crate::domain::entities::{CurrentWeather, TomorrowForecast};

/// Weather data source
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, city: &str) -> Result<CurrentWeather, WeatherError>;

    async fn tomorrow(&self, city: &str) -> Result<TomorrowForecast, WeatherError>;
}
