//! Flood Zones
//!
//! Point-in-polygon membership against a static set of flood-prone polygons.
//! Loaded once at startup, immutable afterwards, shared without locking.
//!
//! Dataset format: GeoJSON (FeatureCollection / Feature / GeometryCollection
//! nesting, Polygon and MultiPolygon geometries; other geometry types ignored).

use std::path::Path;

use geo::{Contains, LineString, Point, Polygon};
use serde::Deserialize;

use super::location::Coordinate;

#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error("flood zone dataset not readable at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("flood zone dataset malformed: {0}")]
    Parse(String),
    #[error("flood zone dataset contains no polygons")]
    Empty,
}

// ============================================================================
// GEOJSON SUBSET
// ============================================================================

type Ring = Vec<Vec<f64>>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoObject {
    FeatureCollection { features: Vec<GeoObject> },
    Feature { geometry: Option<Box<GeoObject>> },
    GeometryCollection { geometries: Vec<GeoObject> },
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    #[serde(other)]
    Other,
}

fn to_line_string(ring: &Ring) -> Result<LineString<f64>, ZoneError> {
    let points = ring
        .iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Ok((*lon, *lat)),
            _ => Err(ZoneError::Parse("position with fewer than 2 values".to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if points.len() < 3 {
        return Err(ZoneError::Parse(format!("ring with {} positions", points.len())));
    }
    Ok(LineString::from(points))
}

fn to_polygon(rings: &[Ring]) -> Result<Polygon<f64>, ZoneError> {
    let (exterior, interiors) = rings
        .split_first()
        .ok_or_else(|| ZoneError::Parse("polygon without rings".to_string()))?;

    let interiors = interiors
        .iter()
        .map(to_line_string)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Polygon::new(to_line_string(exterior)?, interiors))
}

/// Walk nested containers, collecting polygons
fn collect_polygons(object: &GeoObject, out: &mut Vec<Polygon<f64>>) -> Result<(), ZoneError> {
    match object {
        GeoObject::FeatureCollection { features } => {
            for feature in features {
                collect_polygons(feature, out)?;
            }
        }
        GeoObject::Feature { geometry } => {
            if let Some(geometry) = geometry {
                collect_polygons(geometry, out)?;
            }
        }
        GeoObject::GeometryCollection { geometries } => {
            for geometry in geometries {
                collect_polygons(geometry, out)?;
            }
        }
        GeoObject::Polygon { coordinates } => out.push(to_polygon(coordinates)?),
        GeoObject::MultiPolygon { coordinates } => {
            for rings in coordinates {
                out.push(to_polygon(rings)?);
            }
        }
        GeoObject::Other => {}
    }
    Ok(())
}

// ============================================================================
// ZONE CHECKER
// ============================================================================

/// Immutable set of flood-risk polygons
#[derive(Debug, Clone)]
pub struct ZoneChecker {
    polygons: Vec<Polygon<f64>>,
}

impl ZoneChecker {
    /// Load from a GeoJSON file. Fails fast: a missing, malformed or
    /// empty dataset is an error, never an empty checker.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ZoneError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ZoneError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let checker = Self::from_geojson_str(&content)?;
        tracing::info!(
            "Loaded {} flood zone polygons from {}",
            checker.polygon_count(),
            path.display()
        );
        Ok(checker)
    }

    pub fn from_geojson_str(content: &str) -> Result<Self, ZoneError> {
        let root: GeoObject = serde_json::from_str(content)
            .map_err(|e| ZoneError::Parse(e.to_string()))?;

        let mut polygons = Vec::new();
        collect_polygons(&root, &mut polygons)?;
        Self::from_polygons(polygons)
    }

    pub fn from_polygons(polygons: Vec<Polygon<f64>>) -> Result<Self, ZoneError> {
        if polygons.is_empty() {
            return Err(ZoneError::Empty);
        }
        Ok(Self { polygons })
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// True if any polygon contains the point
    pub fn is_in_zone(&self, coordinate: &Coordinate) -> bool {
        let point = Point::new(coordinate.longitude(), coordinate.latitude());
        self.polygons.iter().any(|polygon| polygon.contains(&point))
    }
}
