//! Report Types
//!
//! User-submitted flood reports và query types cho ReportStore.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::location::{BoundingBox, Coordinate};
use crate::logic::risk::RiskLevel;

// ============================================================================
// WATER LEVEL
// ============================================================================

/// Reporter's estimate of standing water
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterLevel {
    #[serde(rename = "Ankle-deep")]
    AnkleDeep,
    #[serde(rename = "Knee-deep")]
    KneeDeep,
    #[serde(rename = "Waist-deep")]
    WaistDeep,
    #[serde(rename = "Chest-deep")]
    ChestDeep,
    #[serde(rename = "Above head")]
    AboveHead,
}

impl WaterLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaterLevel::AnkleDeep => "Ankle-deep",
            WaterLevel::KneeDeep => "Knee-deep",
            WaterLevel::WaistDeep => "Waist-deep",
            WaterLevel::ChestDeep => "Chest-deep",
            WaterLevel::AboveHead => "Above head",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Ankle-deep" => Some(WaterLevel::AnkleDeep),
            "Knee-deep" => Some(WaterLevel::KneeDeep),
            "Waist-deep" => Some(WaterLevel::WaistDeep),
            "Chest-deep" => Some(WaterLevel::ChestDeep),
            "Above head" => Some(WaterLevel::AboveHead),
            _ => None,
        }
    }

    /// Risk implied by a single report
    pub fn risk_level(&self) -> RiskLevel {
        match self {
            WaterLevel::AnkleDeep => RiskLevel::Medium,
            WaterLevel::KneeDeep
            | WaterLevel::WaistDeep
            | WaterLevel::ChestDeep
            | WaterLevel::AboveHead => RiskLevel::High,
        }
    }
}

// ============================================================================
// NLP ANNOTATION
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    #[default]
    Neutral,
    Negative,
}

/// Derived annotations stored with a report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NlpAnalysis {
    pub keywords: Vec<String>,
    pub sentiment: Sentiment,
    pub summary: String,
}

// ============================================================================
// REPORT RECORD
// ============================================================================

/// A persisted report. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub water_level: Option<WaterLevel>,
    pub nlp_analysis: NlpAnalysis,
    pub created_at: DateTime<Utc>,
}

/// Report about to be stored
#[derive(Debug, Clone)]
pub struct NewReport {
    pub coordinate: Coordinate,
    pub description: String,
    pub water_level: Option<WaterLevel>,
    pub nlp_analysis: NlpAnalysis,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// QUERY
// ============================================================================

/// Coordinate range + timestamp range
#[derive(Debug, Clone, Default)]
pub struct ReportQuery {
    pub area: Option<BoundingBox>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

impl ReportQuery {
    pub fn matches(&self, report: &ReportRecord) -> bool {
        let in_area = match (&self.area, Coordinate::new(report.latitude, report.longitude)) {
            (Some(area), Ok(point)) => area.contains(&point),
            (Some(_), Err(_)) => false,
            (None, _) => true,
        };
        let after_start = self.since.map_or(true, |since| report.created_at >= since);
        let before_end = self.until.map_or(true, |until| report.created_at <= until);

        in_area && after_start && before_end
    }
}
