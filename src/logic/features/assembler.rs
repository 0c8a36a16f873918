//! Feature Assembler
//!
//! Build the classifier input for a coordinate:
//! live weather (or neutral defaults) + static regional constants +
//! engineered features + flood-zone membership, projected onto the
//! classifier's declared layout.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::layout::*;
use super::vector::FeatureVector;
use crate::logic::location::Coordinate;
use crate::logic::weather::{WeatherProvider, WeatherReading};
use crate::logic::zones::ZoneChecker;

// ============================================================================
// DEFAULTS
// ============================================================================

/// Upper bound on one weather lookup, whatever the provider
pub const DEFAULT_WEATHER_TIMEOUT: Duration = Duration::from_secs(5);

/// Values used when live weather is unavailable
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeatherDefaults {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub precipitation_1h_mm: f64,
}

impl Default for WeatherDefaults {
    fn default() -> Self {
        Self {
            temperature_c: 25.0,
            humidity_pct: 60.0,
            pressure_hpa: 1013.0,
            precipitation_1h_mm: 0.0,
        }
    }
}

/// Static characteristics of the deployment region (Bengaluru urban)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionProfile {
    /// Meters above sea level
    pub altitude_m: f64,
    /// 0-10 scale
    pub river_level: f64,
    /// 0-100 scale
    pub drainage_capacity: f64,
    /// 0-10 scale
    pub drainage_system_condition: f64,
    /// People per km²
    pub population_density: f64,
    /// 0-1 scale
    pub urbanization_level: f64,
    /// Reference hourly rainfall for the anomaly term
    pub rainfall_reference_mm: f64,
    /// Inclusive latitude band affected by the monsoon
    pub monsoon_lat_min: f64,
    pub monsoon_lat_max: f64,
    pub weather_defaults: WeatherDefaults,
}

impl Default for RegionProfile {
    fn default() -> Self {
        Self {
            altitude_m: 900.0,
            river_level: 5.0,
            drainage_capacity: 50.0,
            drainage_system_condition: 5.0,
            population_density: 4381.0,
            urbanization_level: 0.8,
            rainfall_reference_mm: 7.5,
            monsoon_lat_min: 11.0,
            monsoon_lat_max: 19.0,
            weather_defaults: WeatherDefaults::default(),
        }
    }
}

impl RegionProfile {
    pub fn is_monsoon_band(&self, latitude: f64) -> bool {
        (self.monsoon_lat_min..=self.monsoon_lat_max).contains(&latitude)
    }
}

// ============================================================================
// ASSEMBLER
// ============================================================================

/// Result of feature assembly
#[derive(Debug, Clone)]
pub struct AssembledFeatures {
    pub vector: FeatureVector,
    pub weather_found: bool,
    pub in_flood_zone: bool,
}

pub struct FeatureAssembler {
    weather: Arc<dyn WeatherProvider>,
    zones: Arc<ZoneChecker>,
    layout: Arc<FeatureLayout>,
    profile: RegionProfile,
    weather_timeout: Duration,
}

impl FeatureAssembler {
    pub fn new(
        weather: Arc<dyn WeatherProvider>,
        zones: Arc<ZoneChecker>,
        layout: Arc<FeatureLayout>,
        profile: RegionProfile,
    ) -> Self {
        Self {
            weather,
            zones,
            layout,
            profile,
            weather_timeout: DEFAULT_WEATHER_TIMEOUT,
        }
    }

    pub fn with_weather_timeout(mut self, timeout: Duration) -> Self {
        self.weather_timeout = timeout;
        self
    }

    pub fn layout(&self) -> &Arc<FeatureLayout> {
        &self.layout
    }

    pub fn zone_count(&self) -> usize {
        self.zones.polygon_count()
    }

    /// Never fails: weather unavailability (error or timeout) yields
    /// defaults and `weather_found = false`.
    pub async fn assemble(&self, coordinate: Coordinate) -> AssembledFeatures {
        let lookup = tokio::time::timeout(self.weather_timeout, self.weather.current(coordinate));
        let reading = match lookup.await {
            Ok(Ok(reading)) => Some(reading),
            Ok(Err(e)) => {
                tracing::warn!("No valid weather data for {} ({}), using defaults", coordinate, e);
                None
            }
            Err(_) => {
                tracing::warn!(
                    "Weather lookup for {} timed out after {:?}, using defaults",
                    coordinate,
                    self.weather_timeout
                );
                None
            }
        };

        self.build(coordinate, reading.as_ref())
    }

    /// Pure part of assembly, given an optional reading
    pub fn build(&self, coordinate: Coordinate, reading: Option<&WeatherReading>) -> AssembledFeatures {
        let in_flood_zone = self.zones.is_in_zone(&coordinate);
        let known = known_features(&self.profile, coordinate, reading, in_flood_zone);

        let mut vector = FeatureVector::new(Arc::clone(&self.layout));
        for (index, name) in self.layout.names().iter().enumerate() {
            match known.get(name.as_str()) {
                Some(value) => vector.set(index, *value as f32),
                None => tracing::debug!("Feature '{}' not computed, filled with 0", name),
            }
        }

        tracing::debug!(features = %vector.to_log_entry(), "Assembled features for {}", coordinate);

        AssembledFeatures {
            vector,
            weather_found: reading.is_some(),
            in_flood_zone,
        }
    }
}

/// Every feature this service knows how to compute
fn known_features(
    profile: &RegionProfile,
    coordinate: Coordinate,
    reading: Option<&WeatherReading>,
    in_flood_zone: bool,
) -> BTreeMap<&'static str, f64> {
    let defaults = profile.weather_defaults;
    let (temperature, humidity, pressure, precipitation) = match reading {
        Some(r) => (
            r.temperature_c,
            r.humidity_pct,
            r.pressure_hpa.unwrap_or(defaults.pressure_hpa),
            r.precipitation_1h_mm,
        ),
        None => (
            defaults.temperature_c,
            defaults.humidity_pct,
            defaults.pressure_hpa,
            defaults.precipitation_1h_mm,
        ),
    };

    let is_monsoon = if profile.is_monsoon_band(coordinate.latitude()) { 1.0 } else { 0.0 };

    BTreeMap::from([
        (TEMPERATURE, temperature),
        (HUMIDITY, humidity),
        (ATMOSPHERIC_PRESSURE, pressure),
        (RAINFALL_INTENSITY, precipitation),
        (LATITUDE, coordinate.latitude()),
        (LONGITUDE, coordinate.longitude()),
        (ALTITUDE, profile.altitude_m),
        (RIVER_LEVEL, profile.river_level),
        (DRAINAGE_CAPACITY, profile.drainage_capacity),
        (DRAINAGE_SYSTEM_CONDITION, profile.drainage_system_condition),
        (POPULATION_DENSITY, profile.population_density),
        (URBANIZATION_LEVEL, profile.urbanization_level),
        (FLOOD_PROXIMITY_SCORE, if in_flood_zone { 1.0 } else { 0.0 }),
        (RAINFALL_ANOMALY, precipitation - profile.rainfall_reference_mm),
        (IS_MONSOON, is_monsoon),
    ])
}
