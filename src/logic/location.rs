//! Location primitives
//!
//! Coordinate value object và bounding-box approximation cho spatial queries.

use serde::{Deserialize, Serialize};

/// Kilometres per degree of latitude (spherical approximation)
pub const KM_PER_DEGREE: f64 = 111.0;

/// Below this, cos(latitude) is treated as zero (meridians converge)
const MIN_MERIDIAN_SCALE: f64 = 1e-9;

// ============================================================================
// COORDINATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("latitude {0} outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} outside [-180, 180]")]
    Longitude(f64),
}

/// Validated WGS84 point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Within `tolerance_deg` on both axes
    pub fn approx_eq(&self, other: &Coordinate, tolerance_deg: f64) -> bool {
        (self.latitude - other.latitude).abs() <= tolerance_deg
            && (self.longitude - other.longitude).abs() <= tolerance_deg
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

// ============================================================================
// BOUNDING BOX
// ============================================================================

/// Axis-aligned lat/lon box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Box approximating a circle of `radius_km` around `center`.
    ///
    /// Latitude degrees are a flat `radius / 111`; longitude degrees are
    /// scaled by `cos(lat)`. Near the poles the longitude span degenerates
    /// to the whole [-180, 180] range.
    ///
    /// The box does not wrap across the ±180° meridian: near it, longitude
    /// bounds may run past ±180 and points on the far side are not
    /// contained.
    pub fn around(center: Coordinate, radius_km: f64) -> Self {
        let radius_km = radius_km.max(0.0);
        let lat_delta = radius_km / KM_PER_DEGREE;

        let scale = center.latitude().to_radians().cos();
        let (min_lon, max_lon) = if scale.abs() < MIN_MERIDIAN_SCALE {
            (-180.0, 180.0)
        } else {
            let lon_delta = radius_km / (KM_PER_DEGREE * scale);
            (center.longitude() - lon_delta, center.longitude() + lon_delta)
        };

        Self {
            min_lat: (center.latitude() - lat_delta).max(-90.0),
            max_lat: (center.latitude() + lat_delta).min(90.0),
            min_lon,
            max_lon,
        }
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude())
            && (self.min_lon..=self.max_lon).contains(&point.longitude())
    }
}
