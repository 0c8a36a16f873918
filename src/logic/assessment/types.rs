//! Assessment Types
//!
//! Output value object của một assessment. Không persist - caller quyết định.

use serde::{Deserialize, Serialize};

use crate::logic::features::LayoutMismatchError;
use crate::logic::location::CoordinateError;
use crate::logic::risk::{AssessmentSource, DecisionRule, RiskLevel};

pub const DEGRADED_FACTOR: &str = "An unexpected system error occurred.";
pub const DEGRADED_RECOMMENDATION: &str = "Please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordinateError),
    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),
    #[error("internal assessment fault: {0}")]
    Internal(String),
}

/// Final verdict plus audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub risk_level: RiskLevel,
    pub source: AssessmentSource,
    pub threshold_assessment: RiskLevel,
    pub ml_assessment: RiskLevel,
    pub user_reports_found: u32,
    pub weather_data_found: bool,
    /// In trigger order
    pub contributing_factors: Vec<String>,
    pub recommendation: String,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ml_probability: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_rule: Option<DecisionRule>,
}

impl AssessmentResult {
    /// Result returned when an internal fault aborts the pipeline
    pub fn degraded(message: impl Into<String>) -> Self {
        Self {
            risk_level: RiskLevel::Unknown,
            source: AssessmentSource::Error,
            threshold_assessment: RiskLevel::Unknown,
            ml_assessment: RiskLevel::Unknown,
            user_reports_found: 0,
            weather_data_found: false,
            contributing_factors: vec![DEGRADED_FACTOR.to_string()],
            recommendation: DEGRADED_RECOMMENDATION.to_string(),
            error: Some(message.into()),
            ml_probability: None,
            decision_rule: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.source == AssessmentSource::Error
    }

    /// Medium or High
    pub fn warrants_alert(&self) -> bool {
        matches!(self.risk_level, RiskLevel::Medium | RiskLevel::High)
    }
}

/// Report-count aggregation for a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearbyReports {
    pub count: u32,
    pub threshold_assessment: RiskLevel,
}
