//! Risk assessment DTOs

use serde::{Deserialize, Serialize};

use crate::logic::assessment::AssessmentResult;
use crate::logic::risk::{AssessmentSource, RiskLevel};

#[derive(Debug, Deserialize)]
pub struct RiskQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RiskDetails {
    pub threshold_assessment: RiskLevel,
    pub ml_assessment: RiskLevel,
    pub user_reports_found: u32,
    pub weather_data_found: bool,
    pub contributing_factors: Vec<String>,
    pub recommendation: String,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RiskResponse {
    pub risk_level: RiskLevel,
    pub source: AssessmentSource,
    pub details: RiskDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ml_probability: Option<f32>,
}

impl From<AssessmentResult> for RiskResponse {
    fn from(result: AssessmentResult) -> Self {
        Self {
            risk_level: result.risk_level,
            source: result.source,
            ml_probability: result.ml_probability,
            details: RiskDetails {
                threshold_assessment: result.threshold_assessment,
                ml_assessment: result.ml_assessment,
                user_reports_found: result.user_reports_found,
                weather_data_found: result.weather_data_found,
                contributing_factors: result.contributing_factors,
                recommendation: result.recommendation,
                error: result.error,
            },
        }
    }
}
