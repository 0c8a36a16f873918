//! Weather Provider
//!
//! Live weather lookup (OpenWeatherMap current conditions).
//! Failure is a normal outcome here: callers fall back to neutral defaults.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::location::Coordinate;

// ============================================================================
// TYPES
// ============================================================================

/// Current conditions at a coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: Option<f64>,
    /// Rain over the last hour, or snow-equivalent when no rain is reported
    pub precipitation_1h_mm: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("weather API key not configured")]
    MissingApiKey,
    #[error("network error: {0}")]
    Network(String),
    #[error("weather service returned status {0}")]
    Status(u16),
    #[error("malformed weather response: {0}")]
    Malformed(String),
}

/// Source of live weather
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, coordinate: Coordinate) -> Result<WeatherReading, WeatherError>;
}

// ============================================================================
// OPENWEATHERMAP
// ============================================================================

/// Weather provider configuration
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            timeout_seconds: 5,
        }
    }
}

pub struct OpenWeatherProvider {
    config: WeatherConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    main: Option<OwmMain>,
    rain: Option<OwmPrecipitation>,
    snow: Option<OwmPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmPrecipitation {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

impl OpenWeatherProvider {
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, coordinate: Coordinate) -> Result<WeatherReading, WeatherError> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(WeatherError::MissingApiKey),
        };

        let url = format!("{}/weather", self.config.base_url);
        let lat = coordinate.latitude().to_string();
        let lon = coordinate.longitude().to_string();

        let response = self.http_client
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WeatherError::Status(response.status().as_u16()));
        }

        let body = response.text().await
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        parse_reading(&body)
    }
}

/// Extract a reading from an OpenWeatherMap `/weather` body
pub fn parse_reading(body: &str) -> Result<WeatherReading, WeatherError> {
    let parsed: OwmResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::Malformed(e.to_string()))?;

    let main = parsed.main
        .ok_or_else(|| WeatherError::Malformed("missing `main` block".to_string()))?;

    let rain = parsed.rain.and_then(|r| r.one_hour);
    let snow = parsed.snow.and_then(|s| s.one_hour);

    Ok(WeatherReading {
        temperature_c: main.temp,
        humidity_pct: main.humidity,
        pressure_hpa: main.pressure,
        precipitation_1h_mm: rain.or(snow).unwrap_or(0.0),
    })
}
