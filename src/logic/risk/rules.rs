//! Risk Rules & Thresholds
//!
//! Định nghĩa các threshold cho report counts, recommendation table,
//! và manual overrides cho reference locations.
//! KHÔNG chứa logic reconcile - chỉ constants và config.

use serde::{Deserialize, Serialize};

use super::types::RiskLevel;
use crate::logic::location::Coordinate;

// ============================================================================
// THRESHOLDS
// ============================================================================

/// At or above this many recent reports = High
pub const REPORTS_HIGH_THRESHOLD: u32 = 5;

/// At or above this many recent reports = Medium
pub const REPORTS_MEDIUM_THRESHOLD: u32 = 2;

/// Match tolerance for override points (~11 m)
pub const OVERRIDE_TOLERANCE_DEG: f64 = 1e-4;

/// Report-count cutoffs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReportThresholds {
    pub high: u32,
    pub medium: u32,
}

impl Default for ReportThresholds {
    fn default() -> Self {
        Self {
            high: REPORTS_HIGH_THRESHOLD,
            medium: REPORTS_MEDIUM_THRESHOLD,
        }
    }
}

impl ReportThresholds {
    pub fn new(high: u32, medium: u32) -> Self {
        Self { high, medium }
    }

    /// Threshold verdict from a recent report count
    pub fn classify(&self, report_count: u32) -> RiskLevel {
        if report_count >= self.high {
            RiskLevel::High
        } else if report_count >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

// ============================================================================
// RECOMMENDATIONS
// ============================================================================

pub fn recommendation_for(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Conditions appear safe. Remain aware of weather changes.",
        RiskLevel::Medium => "Potential for localized flooding. Exercise caution.",
        RiskLevel::High => "High flood risk detected. Avoid travel in this area.",
        RiskLevel::Unknown => "Could not determine recommendation.",
    }
}

// ============================================================================
// MANUAL OVERRIDES
// ============================================================================

/// Fixed verdict for a reference location
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OverridePoint {
    pub latitude: f64,
    pub longitude: f64,
    pub level: RiskLevel,
}

/// Override whose level is not a real verdict
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("override at ({latitude}, {longitude}) must be Low, Medium or High, got {level}")]
pub struct InvalidOverride {
    pub latitude: f64,
    pub longitude: f64,
    pub level: RiskLevel,
}

/// Demo/calibration points with hardcoded verdicts.
/// Every point carries a known level; `Unknown` stays reserved for failures.
#[derive(Debug, Clone)]
pub struct ManualOverrides {
    points: Vec<OverridePoint>,
    tolerance_deg: f64,
}

impl Default for ManualOverrides {
    fn default() -> Self {
        Self::demonstration()
    }
}

impl ManualOverrides {
    pub fn new(points: Vec<OverridePoint>) -> Result<Self, InvalidOverride> {
        if let Some(p) = points.iter().find(|p| !p.level.is_known()) {
            return Err(InvalidOverride {
                latitude: p.latitude,
                longitude: p.longitude,
                level: p.level,
            });
        }
        Ok(Self::from_known(points))
    }

    fn from_known(points: Vec<OverridePoint>) -> Self {
        Self {
            points,
            tolerance_deg: OVERRIDE_TOLERANCE_DEG,
        }
    }

    /// Reference points used in demos (one per level)
    pub fn demonstration() -> Self {
        Self::from_known(vec![
            // Bellandur, Bengaluru
            OverridePoint { latitude: 12.9352, longitude: 77.6784, level: RiskLevel::High },
            // Koramangala, Bengaluru
            OverridePoint { latitude: 12.9279, longitude: 77.6271, level: RiskLevel::Medium },
            // Malleshwaram, Bengaluru
            OverridePoint { latitude: 13.0035, longitude: 77.5709, level: RiskLevel::Low },
        ])
    }

    pub fn lookup(&self, coordinate: &Coordinate) -> Option<RiskLevel> {
        self.points
            .iter()
            .find(|p| {
                Coordinate::new(p.latitude, p.longitude)
                    .is_ok_and(|point| point.approx_eq(coordinate, self.tolerance_deg))
            })
            .map(|p| p.level)
    }
}
