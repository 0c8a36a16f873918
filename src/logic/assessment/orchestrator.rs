//! Assessment Orchestrator
//!
//! Sequence một assessment:
//! reports ‖ features → threshold verdict → classifier → reconcile → audit trail.
//!
//! Collaborators are injected at construction; nothing is looked up globally.

use std::sync::Arc;

use chrono::Duration;

use super::types::{AssessmentError, AssessmentResult, NearbyReports};
use crate::logic::features::{
    AssembledFeatures, FeatureAssembler, FeatureLayout, RegionProfile, DEFAULT_WEATHER_TIMEOUT,
};
use crate::logic::location::Coordinate;
use crate::logic::model::{EngineStatus, FloodClassifier};
use crate::logic::reports::{ReportCounter, ReportStore};
use crate::logic::risk::{
    recommendation_for, reconcile, AssessmentSource, DecisionRule, ManualOverrides,
    ReportThresholds, RiskLevel,
};
use crate::logic::weather::WeatherProvider;
use crate::logic::zones::ZoneChecker;

pub const FACTOR_MODEL_ERROR: &str = "ML model prediction error.";
pub const FACTOR_MODEL_SKIPPED: &str = "ML model not ready or weather data missing.";
pub const FACTOR_FLOOD_ZONE: &str = "Location lies inside a known flood-prone zone.";

// ============================================================================
// SETTINGS
// ============================================================================

/// Tunables for the assessment pipeline
#[derive(Debug, Clone)]
pub struct AssessorSettings {
    pub report_window: Duration,
    pub report_radius_km: f64,
    pub thresholds: ReportThresholds,
    pub overrides: ManualOverrides,
    pub region: RegionProfile,
    /// Bound on the weather lookup inside feature assembly
    pub weather_timeout: std::time::Duration,
}

impl Default for AssessorSettings {
    fn default() -> Self {
        Self {
            report_window: Duration::hours(crate::logic::reports::counter::DEFAULT_WINDOW_HOURS),
            report_radius_km: crate::logic::reports::counter::DEFAULT_RADIUS_KM,
            thresholds: ReportThresholds::default(),
            overrides: ManualOverrides::default(),
            region: RegionProfile::default(),
            weather_timeout: DEFAULT_WEATHER_TIMEOUT,
        }
    }
}

// ============================================================================
// ASSESSOR
// ============================================================================

/// Model verdict after the classifier step
struct ModelVerdict {
    level: RiskLevel,
    probability: Option<f32>,
}

impl ModelVerdict {
    fn unknown() -> Self {
        Self { level: RiskLevel::Unknown, probability: None }
    }
}

pub struct RiskAssessor {
    counter: ReportCounter,
    assembler: FeatureAssembler,
    classifier: Option<Arc<dyn FloodClassifier>>,
    thresholds: ReportThresholds,
    overrides: ManualOverrides,
}

impl RiskAssessor {
    /// Feature layout follows the classifier; without one, the training default.
    pub fn new(
        store: Arc<dyn ReportStore>,
        weather: Arc<dyn WeatherProvider>,
        zones: Arc<ZoneChecker>,
        classifier: Option<Arc<dyn FloodClassifier>>,
        settings: AssessorSettings,
    ) -> Self {
        let layout = match &classifier {
            Some(model) => model.layout(),
            None => Arc::new(FeatureLayout::training_default()),
        };

        Self {
            counter: ReportCounter::new(store, settings.report_window, settings.report_radius_km),
            assembler: FeatureAssembler::new(weather, zones, layout, settings.region)
                .with_weather_timeout(settings.weather_timeout),
            classifier,
            thresholds: settings.thresholds,
            overrides: settings.overrides,
        }
    }

    pub fn thresholds(&self) -> ReportThresholds {
        self.thresholds
    }

    pub fn counter(&self) -> &ReportCounter {
        &self.counter
    }

    pub fn zone_count(&self) -> usize {
        self.assembler.zone_count()
    }

    pub fn model_ready(&self) -> bool {
        self.classifier.as_ref().is_some_and(|c| c.is_ready())
    }

    pub fn model_status(&self) -> Option<EngineStatus> {
        self.classifier.as_ref().map(|c| c.status())
    }

    /// Report count + threshold verdict, without running the model
    pub async fn count_recent_nearby(&self, coordinate: Coordinate) -> NearbyReports {
        let count = self.counter.count_recent_nearby(coordinate).await;
        NearbyReports {
            count,
            threshold_assessment: self.thresholds.classify(count),
        }
    }

    /// Raw lat/lon entry point. Invalid input degrades like any other fault.
    pub async fn assess_at(&self, latitude: f64, longitude: f64) -> AssessmentResult {
        match Coordinate::new(latitude, longitude) {
            Ok(coordinate) => self.assess(coordinate).await,
            Err(e) => AssessmentResult::degraded(e.to_string()),
        }
    }

    /// Always returns a well-formed result
    pub async fn assess(&self, coordinate: Coordinate) -> AssessmentResult {
        match self.try_assess(coordinate).await {
            Ok(result) => {
                tracing::info!(
                    "Assessment for {}: {} ({}, {} reports, weather={})",
                    coordinate,
                    result.risk_level,
                    result.source,
                    result.user_reports_found,
                    result.weather_data_found
                );
                result
            }
            Err(e) => {
                tracing::error!("Risk assessment failed for {}: {}", coordinate, e);
                AssessmentResult::degraded(e.to_string())
            }
        }
    }

    async fn try_assess(&self, coordinate: Coordinate) -> Result<AssessmentResult, AssessmentError> {
        // No data dependency between the two
        let (report_count, assembled) = tokio::join!(
            self.counter.count_recent_nearby(coordinate),
            self.assembler.assemble(coordinate),
        );

        let mut factors = Vec::new();

        let threshold_risk = self.thresholds.classify(report_count);
        match threshold_risk {
            RiskLevel::High => factors.push(format!(
                "High number of recent user reports ({}).",
                report_count
            )),
            RiskLevel::Medium => factors.push(format!(
                "Moderate number of recent user reports ({}).",
                report_count
            )),
            _ => {}
        }

        if assembled.in_flood_zone {
            factors.push(FACTOR_FLOOD_ZONE.to_string());
        }

        let model = self.run_model(&assembled, &mut factors).await?;

        let manual_override = self.overrides.lookup(&coordinate);
        let decision = reconcile(
            threshold_risk,
            model.level,
            report_count,
            manual_override,
            &self.thresholds,
        );

        if decision.rule == DecisionRule::ManualOverride {
            factors.push(format!("Manual override for reference location ({}).", decision.level));
        }

        tracing::debug!(
            "Reconciled {}: threshold={} model={} reports={} override={:?} → {} via {:?}",
            coordinate,
            threshold_risk,
            model.level,
            report_count,
            manual_override,
            decision.level,
            decision.rule
        );

        Ok(AssessmentResult {
            risk_level: decision.level,
            source: source_for(decision.rule),
            threshold_assessment: threshold_risk,
            ml_assessment: model.level,
            user_reports_found: report_count,
            weather_data_found: assembled.weather_found,
            contributing_factors: factors,
            recommendation: recommendation_for(decision.level).to_string(),
            error: None,
            ml_probability: model.probability,
            decision_rule: Some(decision.rule),
        })
    }

    /// Classifier failures stay local: Unknown + a factor note
    async fn run_model(
        &self,
        assembled: &AssembledFeatures,
        factors: &mut Vec<String>,
    ) -> Result<ModelVerdict, AssessmentError> {
        let classifier = match &self.classifier {
            Some(c) if c.is_ready() && assembled.weather_found => Arc::clone(c),
            _ => {
                factors.push(FACTOR_MODEL_SKIPPED.to_string());
                return Ok(ModelVerdict::unknown());
            }
        };

        // Assembler and classifier disagreeing on schema is a wiring fault
        assembled.vector.validate(&classifier.layout())?;

        let vector = assembled.vector.clone();
        let outcome = tokio::task::spawn_blocking(move || classifier.predict_full(&vector))
            .await
            .map_err(|e| AssessmentError::Internal(format!("classifier task failed: {}", e)))?;

        match outcome {
            Ok(prediction) => {
                let level = RiskLevel::from_label(&prediction.label);
                if !level.is_known() {
                    tracing::warn!("Unrecognized classifier label '{}'", prediction.label);
                }
                factors.push(format!("Model predicted: {}", prediction.label));
                Ok(ModelVerdict { level, probability: prediction.probability })
            }
            Err(e) => {
                tracing::warn!("ML prediction failed: {}", e);
                factors.push(FACTOR_MODEL_ERROR.to_string());
                Ok(ModelVerdict::unknown())
            }
        }
    }
}

/// Source tag for the rule that decided the level
pub fn source_for(rule: DecisionRule) -> AssessmentSource {
    match rule {
        DecisionRule::ManualOverride => AssessmentSource::ManualOverride,
        DecisionRule::ModelHigh | DecisionRule::ModelMedium => AssessmentSource::MlPrediction,
        DecisionRule::ReportsHigh | DecisionRule::ReportsMedium | DecisionRule::ThresholdOnly => {
            AssessmentSource::HybridHistorical
        }
    }
}
