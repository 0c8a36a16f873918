//! Feature Layout - Classifier Schema Definition
//!
//! **CRITICAL: the classifier's declared feature-name list is the single
//! source of truth for vector shape.**
//!
//! ## Rules:
//! 1. Names and order come from the loaded model (or the training default)
//! 2. Every vector carries the CRC32 hash of the layout it was built for
//! 3. A vector is only fed to a classifier whose layout hash matches

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE NAMES
// ============================================================================

pub const TEMPERATURE: &str = "Temperature";
pub const HUMIDITY: &str = "Humidity";
pub const ATMOSPHERIC_PRESSURE: &str = "Atmospheric_Pressure";
pub const RAINFALL_INTENSITY: &str = "Rainfall_Intensity";
pub const LATITUDE: &str = "Latitude";
pub const LONGITUDE: &str = "Longitude";
pub const ALTITUDE: &str = "Altitude";
pub const RIVER_LEVEL: &str = "River_Level";
pub const DRAINAGE_CAPACITY: &str = "Drainage_Capacity";
pub const DRAINAGE_SYSTEM_CONDITION: &str = "Drainage_System_Condition";
pub const POPULATION_DENSITY: &str = "Population_Density";
pub const URBANIZATION_LEVEL: &str = "Urbanization_Level";
pub const FLOOD_PROXIMITY_SCORE: &str = "flood_proximity_score";
pub const RAINFALL_ANOMALY: &str = "rainfall_anomaly";
pub const IS_MONSOON: &str = "is_monsoon";

/// Column order of the training dataset
pub const TRAINING_LAYOUT: &[&str] = &[
    ALTITUDE,
    RAINFALL_INTENSITY,
    TEMPERATURE,
    HUMIDITY,
    RIVER_LEVEL,
    LATITUDE,
    LONGITUDE,
    FLOOD_PROXIMITY_SCORE,
    RAINFALL_ANOMALY,
    IS_MONSOON,
];

// ============================================================================
// LAYOUT
// ============================================================================

/// Ordered feature schema + hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLayout {
    names: Vec<String>,
    hash: u32,
}

impl FeatureLayout {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let hash = compute_layout_hash(&names);
        Self { names, hash }
    }

    pub fn training_default() -> Self {
        Self::new(TRAINING_LAYOUT.iter().copied())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// O(n) but schemas are small
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// First duplicated name, if any
    pub fn duplicate(&self) -> Option<&str> {
        self.names
            .iter()
            .enumerate()
            .find(|(i, n)| self.names[..*i].contains(n))
            .map(|(_, n)| n.as_str())
    }
}

impl Default for FeatureLayout {
    fn default() -> Self {
        Self::training_default()
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over the ordered names
pub fn compute_layout_hash(names: &[String]) -> u32 {
    let mut hasher = Hasher::new();
    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }
    hasher.finalize()
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Vector built for a different schema
#[derive(Debug, Clone, thiserror::Error)]
#[error("Feature layout mismatch: expected {expected_len} features (hash: {expected_hash:08x}), got {actual_len} (hash: {actual_hash:08x})")]
pub struct LayoutMismatchError {
    pub expected_hash: u32,
    pub expected_len: usize,
    pub actual_hash: u32,
    pub actual_len: usize,
}
