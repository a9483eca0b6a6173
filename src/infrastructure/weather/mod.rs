//! WeatherAPI.com provider

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::application::errors::WeatherError;
use crate::domain::entities::{CurrentWeather, TomorrowForecast};
use crate::domain::traits::WeatherProvider;

/// WeatherAPI.com base URL
pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";

/// Number of days requested from forecast.json; index 1 is tomorrow
const FORECAST_DAYS: &str = "2";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    language: String,
    timeout: Duration,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: "ru".to_string(),
            timeout: DEFAULT_TIMEOUT,
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Upper bound for a whole request, body included
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }

    /// One GET, no retries. Returns the raw body of a 2xx response.
    async fn fetch(&self, name: &str, city: &str, extra: &[(&str, &str)]) -> Result<String, WeatherError> {
        let mut query = vec![
            ("key", self.api_key.as_str()),
            ("q", city),
            ("lang", self.language.as_str()),
        ];
        query.extend_from_slice(extra);

        let res = self
            .http
            .get(self.endpoint(name))
            .query(&query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| WeatherError::Transport(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn current(&self, city: &str) -> Result<CurrentWeather, WeatherError> {
        let body = self.fetch("current.json", city, &[]).await?;
        parse_current(&body)
    }

    async fn tomorrow(&self, city: &str) -> Result<TomorrowForecast, WeatherError> {
        let body = self.fetch("forecast.json", city, &[("days", FORECAST_DAYS)]).await?;
        parse_tomorrow(&body)
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    last_updated: String,
    temp_c: f64,
    wind_kph: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    avgtemp_c: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: String,
    day: WaDay,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    forecast: WaForecast,
}

pub fn parse_current(body: &str) -> Result<CurrentWeather, WeatherError> {
    let parsed: WaResponse = decode(body)?;
    Ok(CurrentWeather {
        city: parsed.location.name,
        condition: parsed.current.condition.text,
        temperature_c: parsed.current.temp_c,
        wind_kph: parsed.current.wind_kph,
        observed_at: parsed.current.last_updated,
    })
}

pub fn parse_tomorrow(body: &str) -> Result<TomorrowForecast, WeatherError> {
    let parsed: WaForecastResponse = decode(body)?;
    let day = parsed
        .forecast
        .forecastday
        .into_iter()
        .nth(1)
        .ok_or_else(|| WeatherError::MissingField("missing forecast for tomorrow (forecastday[1])".to_string()))?;

    Ok(TomorrowForecast {
        city: parsed.location.name,
        date: day.date,
        condition: day.day.condition.text,
        avg_temperature_c: day.day.avgtemp_c,
    })
}

/// Data errors (absent or mistyped fields) are told apart from bodies that
/// are not JSON at all
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, WeatherError> {
    serde_json::from_str(body).map_err(|e| {
        let message = e.to_string();
        let detail = message.split(" at line ").next().unwrap_or(&message).to_string();
        match e.classify() {
            serde_json::error::Category::Data => WeatherError::MissingField(detail),
            _ => WeatherError::Malformed(message),
        }
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const CURRENT_BODY: &str = r#"{
        "location": {"name": "London", "country": "United Kingdom"},
        "current": {
            "last_updated": "2024-01-01 12:00",
            "temp_c": 15.0,
            "wind_kph": 10.0,
            "condition": {"text": "Clear", "code": 1000}
        }
    }"#;

    const FORECAST_BODY: &str = r#"{
        "location": {"name": "Paris"},
        "forecast": {"forecastday": [
            {"date": "2024-01-01", "day": {"avgtemp_c": 3.1, "condition": {"text": "Snow"}}},
            {"date": "2024-01-02", "day": {"avgtemp_c": 7.4, "condition": {"text": "Light rain"}}}
        ]}
    }"#;

    /// Serves a single canned HTTP response and hands back the request head
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });

        (url, handle)
    }

    #[test]
    fn test_parse_current() {
        let weather = parse_current(CURRENT_BODY).unwrap();
        assert_eq!(
            weather,
            CurrentWeather {
                city: "London".to_string(),
                condition: "Clear".to_string(),
                temperature_c: 15.0,
                wind_kph: 10.0,
                observed_at: "2024-01-01 12:00".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_tomorrow_uses_second_day() {
        let forecast = parse_tomorrow(FORECAST_BODY).unwrap();
        assert_eq!(forecast.city, "Paris");
        assert_eq!(forecast.date, "2024-01-02");
        assert_eq!(forecast.condition, "Light rain");
        assert_eq!(forecast.avg_temperature_c, 7.4);
    }

    #[test]
    fn test_missing_field_is_reported_by_name() {
        let err = parse_current(r#"{"error": {"code": 1006, "message": "No matching location found."}}"#)
            .unwrap_err();
        match err {
            WeatherError::MissingField(detail) => {
                assert!(detail.contains("location"), "{}", detail);
                assert!(!detail.contains("at line"), "{}", detail);
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_mistyped_field_is_data_error() {
        let body = r#"{"location": {"name": "X"}, "current": {"last_updated": "t", "temp_c": "warm", "wind_kph": 1.0, "condition": {"text": "c"}}}"#;
        assert!(matches!(parse_current(body), Err(WeatherError::MissingField(_))));
    }

    #[test]
    fn test_single_forecast_day_is_missing_field() {
        let body = r#"{"location": {"name": "Paris"}, "forecast": {"forecastday": [
            {"date": "2024-01-01", "day": {"avgtemp_c": 3.1, "condition": {"text": "Snow"}}}
        ]}}"#;
        assert!(matches!(parse_tomorrow(body), Err(WeatherError::MissingField(_))));
    }

    #[test]
    fn test_non_json_is_malformed() {
        assert!(matches!(parse_current("<html>Bad gateway</html>"), Err(WeatherError::Malformed(_))));
        assert!(matches!(parse_tomorrow(""), Err(WeatherError::Malformed(_))));
    }

    #[test]
    fn test_truncate_body() {
        let long = "ж".repeat(300);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[tokio::test]
    async fn test_current_request_over_http() {
        let (url, server) = serve_once("200 OK", CURRENT_BODY).await;
        let provider = WeatherApiProvider::new("KEY").with_base_url(url);

        let weather = provider.current("London").await.unwrap();
        assert_eq!(weather.city, "London");

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /current.json?"), "{}", request_line);
        assert!(request_line.contains("key=KEY"));
        assert!(request_line.contains("q=London"));
        assert!(request_line.contains("lang=ru"));
    }

    #[tokio::test]
    async fn test_forecast_request_asks_for_two_days() {
        let (url, server) = serve_once("200 OK", FORECAST_BODY).await;
        let provider = WeatherApiProvider::new("KEY").with_base_url(format!("{}/", url));

        let forecast = provider.tomorrow("Paris").await.unwrap();
        assert_eq!(forecast.date, "2024-01-02");

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /forecast.json?"), "{}", request_line);
        assert!(request_line.contains("days=2"));
        assert!(request_line.contains("lang=ru"));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let (url, server) = serve_once(
            "400 Bad Request",
            r#"{"error":{"code":1006,"message":"No matching location found."}}"#,
        )
        .await;
        let provider = WeatherApiProvider::new("KEY").with_base_url(url);

        let err = provider.current("Londn").await.unwrap_err();
        assert!(matches!(err, WeatherError::Status { status: 400, .. }), "{:?}", err);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let provider = WeatherApiProvider::new("KEY").with_base_url(url);
        let err = provider.tomorrow("Paris").await.unwrap_err();
        assert!(matches!(err, WeatherError::Transport(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_stalled_provider_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let provider = WeatherApiProvider::new("KEY")
            .with_base_url(url)
            .with_timeout(Duration::from_millis(200));
        let err = provider.current("London").await.unwrap_err();
        assert!(matches!(err, WeatherError::Transport(_)), "{:?}", err);
        server.abort();
    }
}
