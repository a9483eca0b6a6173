/// Current conditions as reported by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    /// Provider-normalized location name
    pub city: String,
    pub condition: String,
    pub temperature_c: f64,
    pub wind_kph: f64,
    /// Provider's `last_updated`, local to the location
    pub observed_at: String,
}

/// Next-day forecast summary
#[derive(Debug, Clone, PartialEq)]
pub struct TomorrowForecast {
    pub city: String,
    pub date: String,
    pub condition: String,
    pub avg_temperature_c: f64,
}
