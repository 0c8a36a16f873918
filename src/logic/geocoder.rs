//! Reverse Geocoding (Nominatim)
//!
//! Coordinate → human-readable place name cho alert messages.
//! Failure never blocks an alert: callers fall back to a coordinate label.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::location::Coordinate;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/reverse";

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("network error: {0}")]
    Network(String),
    #[error("geocoder returned status {0}")]
    Status(u16),
    #[error("no place name in geocoder response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, coordinate: Coordinate) -> Result<String, GeocodeError>;
}

// ============================================================================
// NOMINATIM
// ============================================================================

pub struct NominatimGeocoder {
    base_url: String,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    display_name: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Result<Self, GeocodeError> {
        // Nominatim rejects requests without a User-Agent
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(concat!("RainSafe/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into(),
            http_client,
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, coordinate: Coordinate) -> Result<String, GeocodeError> {
        let lat = coordinate.latitude().to_string();
        let lon = coordinate.longitude().to_string();

        let response = self.http_client
            .get(&self.base_url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("format", "jsonv2"),
                ("zoom", "16"),
                ("addressdetails", "0"),
            ])
            .send()
            .await
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let body = response.text().await
            .map_err(|e| GeocodeError::Network(e.to_string()))?;

        parse_place_name(&body)
    }
}

pub fn parse_place_name(body: &str) -> Result<String, GeocodeError> {
    let parsed: NominatimResponse = serde_json::from_str(body)
        .map_err(|e| GeocodeError::Malformed(e.to_string()))?;

    match parsed.display_name {
        Some(name) if !name.trim().is_empty() => Ok(shorten_display_name(&name)),
        _ => Err(GeocodeError::Malformed("missing display_name".to_string())),
    }
}

/// "Koramangala, Bengaluru, Karnataka, India" → "Koramangala, Bengaluru"
pub fn shorten_display_name(full: &str) -> String {
    let parts: Vec<&str> = full.split(", ").collect();
    match parts.as_slice() {
        [first, second, ..] => format!("{}, {}", first, second),
        _ => full.to_string(),
    }
}

pub fn coordinate_label(coordinate: &Coordinate) -> String {
    format!("Lat: {:.4}, Lon: {:.4}", coordinate.latitude(), coordinate.longitude())
}

/// Place name, or the coordinate label when lookup fails
pub async fn location_name(geocoder: &dyn ReverseGeocoder, coordinate: Coordinate) -> String {
    match geocoder.reverse(coordinate).await {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Reverse geocoding failed for {}: {}", coordinate, e);
            coordinate_label(&coordinate)
        }
    }
}
