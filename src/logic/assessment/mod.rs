//! Assessment Module - Hybrid Flood Risk Pipeline
//!
//! Entry point duy nhất cho HTTP layer: `RiskAssessor::assess`.
//!
//! ## Structure
//! - `types`: AssessmentResult, AssessmentError, NearbyReports
//! - `orchestrator`: RiskAssessor (reports ‖ features → model → reconcile)

pub mod types;
pub mod orchestrator;

#[cfg(test)]
mod tests;

pub use types::{AssessmentError, AssessmentResult, NearbyReports};
pub use orchestrator::{
    source_for, AssessorSettings, RiskAssessor, FACTOR_FLOOD_ZONE, FACTOR_MODEL_ERROR,
    FACTOR_MODEL_SKIPPED,
};
