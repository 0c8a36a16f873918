//! End-to-end assessment scenarios with fake collaborators

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::*;
use crate::logic::location::Coordinate;
use crate::logic::model::FloodClassifier;
use crate::logic::reports::ReportRecord;
use crate::logic::risk::{AssessmentSource, DecisionRule, ReportThresholds, RiskLevel};
use crate::logic::testing::{
    bellandur_zone, recent_reports, report_at, FailingReportStore, FailingWeather, FakeClassifier,
    FixedWeather, HangingWeather, InMemoryReportStore,
};
use crate::logic::weather::WeatherProvider;

const CENTRAL: (f64, f64) = (12.9716, 77.5946);
const BELLANDUR_OVERRIDE: (f64, f64) = (12.9352, 77.6784);

fn assessor(
    reports: Vec<ReportRecord>,
    weather: impl WeatherProvider + 'static,
    classifier: Option<Arc<FakeClassifier>>,
) -> RiskAssessor {
    assessor_with(reports, weather, classifier, AssessorSettings::default())
}

fn assessor_with(
    reports: Vec<ReportRecord>,
    weather: impl WeatherProvider + 'static,
    classifier: Option<Arc<FakeClassifier>>,
    settings: AssessorSettings,
) -> RiskAssessor {
    RiskAssessor::new(
        Arc::new(InMemoryReportStore::with_reports(reports)),
        Arc::new(weather),
        Arc::new(bellandur_zone()),
        classifier.map(|c| c as Arc<dyn FloodClassifier>),
        settings,
    )
}

fn at((lat, lon): (f64, f64)) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

// ============================================================================
// REFERENCE SCENARIOS
// ============================================================================

#[tokio::test]
async fn test_override_point_without_weather_is_high() {
    let model = Arc::new(FakeClassifier::returning("Low"));
    let assessor = assessor(vec![], FailingWeather, Some(model.clone()));

    let result = assessor.assess(at(BELLANDUR_OVERRIDE)).await;

    assert_eq!(result.risk_level, RiskLevel::High);
    assert_eq!(result.source, AssessmentSource::ManualOverride);
    assert_eq!(result.decision_rule, Some(DecisionRule::ManualOverride));
    assert!(!result.weather_data_found);
    assert_eq!(result.user_reports_found, 0);
    assert_eq!(result.ml_assessment, RiskLevel::Unknown);
    assert_eq!(model.calls(), 0);
    assert!(result.contributing_factors.iter().any(|f| f.starts_with("Manual override")));
}

#[tokio::test]
async fn test_many_reports_beat_low_model() {
    let model = Arc::new(FakeClassifier::returning("Low"));
    let assessor = assessor(
        recent_reports(CENTRAL.0, CENTRAL.1, 6),
        FixedWeather::rainy(),
        Some(model.clone()),
    );

    let result = assessor.assess(at(CENTRAL)).await;

    assert_eq!(result.risk_level, RiskLevel::High);
    assert_eq!(result.threshold_assessment, RiskLevel::High);
    assert_eq!(result.ml_assessment, RiskLevel::Low);
    assert_eq!(result.user_reports_found, 6);
    assert_eq!(result.source, AssessmentSource::HybridHistorical);
    assert_eq!(model.calls(), 1);
    assert_eq!(
        result.contributing_factors,
        vec![
            "High number of recent user reports (6).".to_string(),
            "Model predicted: Low".to_string(),
        ]
    );
    assert_eq!(result.recommendation, "High flood risk detected. Avoid travel in this area.");
}

#[tokio::test]
async fn test_no_reports_no_model_is_low() {
    let with_weather = assessor(vec![], FixedWeather::rainy(), None);
    let result = with_weather.assess(at(CENTRAL)).await;

    assert_eq!(result.risk_level, RiskLevel::Low);
    assert_eq!(result.threshold_assessment, RiskLevel::Low);
    assert_eq!(result.ml_assessment, RiskLevel::Unknown);
    assert!(result.weather_data_found);
    assert_eq!(result.contributing_factors, vec![FACTOR_MODEL_SKIPPED.to_string()]);
    assert!(result.error.is_none());

    let without_weather = assessor(vec![], FailingWeather, None);
    let result = without_weather.assess(at(CENTRAL)).await;
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert!(!result.weather_data_found);
}

// ============================================================================
// MODEL PATH
// ============================================================================

#[tokio::test]
async fn test_model_medium_escalates_low_threshold() {
    let model = Arc::new(FakeClassifier::returning("Medium").with_probability(0.62));
    let assessor = assessor(vec![], FixedWeather::rainy(), Some(model));

    let result = assessor.assess(at(CENTRAL)).await;

    assert_eq!(result.risk_level, RiskLevel::Medium);
    assert_eq!(result.source, AssessmentSource::MlPrediction);
    assert_eq!(result.decision_rule, Some(DecisionRule::ModelMedium));
    assert_eq!(result.ml_probability, Some(0.62));
}

#[tokio::test]
async fn test_model_high_with_few_reports_is_high() {
    let model = Arc::new(FakeClassifier::returning("high"));
    let assessor = assessor(
        recent_reports(CENTRAL.0, CENTRAL.1, 1),
        FixedWeather::rainy(),
        Some(model),
    );

    let result = assessor.assess(at(CENTRAL)).await;

    assert_eq!(result.risk_level, RiskLevel::High);
    assert_eq!(result.threshold_assessment, RiskLevel::Low);
    assert_eq!(result.decision_rule, Some(DecisionRule::ModelHigh));
}

#[tokio::test]
async fn test_medium_reports_dominate_high_model() {
    let model = Arc::new(FakeClassifier::returning("High"));
    let assessor = assessor(
        recent_reports(CENTRAL.0, CENTRAL.1, 3),
        FixedWeather::rainy(),
        Some(model),
    );

    let result = assessor.assess(at(CENTRAL)).await;

    assert_eq!(result.risk_level, RiskLevel::Medium);
    assert_eq!(result.ml_assessment, RiskLevel::High);
    assert_eq!(result.decision_rule, Some(DecisionRule::ReportsMedium));
    assert_eq!(result.contributing_factors[0], "Moderate number of recent user reports (3).");
}

#[tokio::test]
async fn test_model_error_falls_back_to_threshold() {
    let model = Arc::new(FakeClassifier::failing());
    let assessor = assessor(
        recent_reports(CENTRAL.0, CENTRAL.1, 2),
        FixedWeather::rainy(),
        Some(model.clone()),
    );

    let result = assessor.assess(at(CENTRAL)).await;

    assert_eq!(result.risk_level, RiskLevel::Medium);
    assert_eq!(result.ml_assessment, RiskLevel::Unknown);
    assert_eq!(model.calls(), 1);
    assert!(result.contributing_factors.contains(&FACTOR_MODEL_ERROR.to_string()));
    assert!(!result.is_degraded());
}

#[tokio::test]
async fn test_unrecognized_label_maps_to_unknown() {
    let model = Arc::new(FakeClassifier::returning("flood"));
    let assessor = assessor(vec![], FixedWeather::rainy(), Some(model));

    let result = assessor.assess(at(CENTRAL)).await;

    assert_eq!(result.ml_assessment, RiskLevel::Unknown);
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert_eq!(result.decision_rule, Some(DecisionRule::ThresholdOnly));
}

#[tokio::test]
async fn test_model_skipped_when_not_ready_or_weather_missing() {
    let not_ready = Arc::new(FakeClassifier::not_ready());
    let result = assessor(vec![], FixedWeather::rainy(), Some(not_ready.clone()))
        .assess(at(CENTRAL))
        .await;
    assert_eq!(not_ready.calls(), 0);
    assert!(result.contributing_factors.contains(&FACTOR_MODEL_SKIPPED.to_string()));

    let ready = Arc::new(FakeClassifier::returning("High"));
    let result = assessor(vec![], FailingWeather, Some(ready.clone()))
        .assess(at(CENTRAL))
        .await;
    assert_eq!(ready.calls(), 0);
    assert_eq!(result.risk_level, RiskLevel::Low);
}

#[tokio::test]
async fn test_classifier_receives_its_own_schema() {
    let layout = crate::logic::features::FeatureLayout::new(["Temperature", "Humidity"]);
    let model = Arc::new(FakeClassifier::returning("Low").with_layout(layout));
    let assessor = assessor(vec![], FixedWeather::rainy(), Some(model.clone()));

    assessor.assess(at(CENTRAL)).await;

    let input = model.last_input().unwrap();
    assert_eq!(input.as_slice(), &[22.0, 95.0]);
}

// ============================================================================
// DEGRADATION
// ============================================================================

#[tokio::test]
async fn test_internal_fault_degrades_result() {
    let model = Arc::new(FakeClassifier::panicking());
    let assessor = assessor(
        recent_reports(CENTRAL.0, CENTRAL.1, 7),
        FixedWeather::rainy(),
        Some(model),
    );

    let result = assessor.assess(at(CENTRAL)).await;

    assert!(result.is_degraded());
    assert_eq!(result.risk_level, RiskLevel::Unknown);
    assert_eq!(result.source, AssessmentSource::Error);
    assert_eq!(result.threshold_assessment, RiskLevel::Unknown);
    assert_eq!(result.user_reports_found, 0);
    assert_eq!(result.recommendation, "Please try again later.");
    assert!(result.error.unwrap().contains("classifier task failed"));
}

#[tokio::test]
async fn test_invalid_coordinate_degrades() {
    let assessor = assessor(vec![], FailingWeather, None);

    let result = assessor.assess_at(91.0, 77.0).await;

    assert!(result.is_degraded());
    assert!(result.error.unwrap().contains("latitude"));
}

#[tokio::test]
async fn test_oversized_report_window_does_not_abort() {
    let settings = AssessorSettings {
        report_window: chrono::Duration::hours(10_000_000_000),
        ..Default::default()
    };
    let old = chrono::Utc::now() - chrono::Duration::days(400);
    let reports = vec![report_at(CENTRAL.0, CENTRAL.1, old), report_at(CENTRAL.0, CENTRAL.1, old)];
    let assessor = Arc::new(assessor_with(reports, FailingWeather, None, settings));

    // Run on its own task so a panic would surface as a JoinError
    let result = tokio::spawn({
        let assessor = Arc::clone(&assessor);
        async move { assessor.assess(at(CENTRAL)).await }
    })
    .await
    .unwrap();

    assert!(!result.is_degraded());
    assert_eq!(result.user_reports_found, 2);
    assert_eq!(result.risk_level, RiskLevel::Medium);
}

#[tokio::test]
async fn test_hanging_weather_is_bounded() {
    let settings = AssessorSettings {
        weather_timeout: Duration::from_millis(50),
        ..Default::default()
    };
    let model = Arc::new(FakeClassifier::returning("High"));
    let assessor = assessor_with(vec![], HangingWeather, Some(model.clone()), settings);

    let started = Instant::now();
    let result = assessor.assess(at(CENTRAL)).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(!result.is_degraded());
    assert!(!result.weather_data_found);
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert_eq!(model.calls(), 0);
    assert!(result.contributing_factors.contains(&FACTOR_MODEL_SKIPPED.to_string()));
}

#[tokio::test]
async fn test_storage_failure_counts_as_no_reports() {
    let assessor = RiskAssessor::new(
        Arc::new(FailingReportStore),
        Arc::new(FailingWeather),
        Arc::new(bellandur_zone()),
        None,
        AssessorSettings::default(),
    );

    let result = assessor.assess(at(CENTRAL)).await;

    assert_eq!(result.user_reports_found, 0);
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert!(!result.is_degraded());
}

// ============================================================================
// SETTINGS & HELPERS
// ============================================================================

#[tokio::test]
async fn test_zone_membership_is_reported() {
    let assessor = assessor(vec![], FailingWeather, None);

    let result = assessor.assess(at((12.94, 77.69))).await;

    assert_eq!(result.contributing_factors[0], FACTOR_FLOOD_ZONE);
    // zone alone does not raise the level
    assert_eq!(result.risk_level, RiskLevel::Low);
}

#[tokio::test]
async fn test_custom_thresholds() {
    let settings = AssessorSettings {
        thresholds: ReportThresholds::new(3, 1),
        ..Default::default()
    };
    let assessor = assessor_with(recent_reports(CENTRAL.0, CENTRAL.1, 3), FailingWeather, None, settings);

    let result = assessor.assess(at(CENTRAL)).await;

    assert_eq!(result.risk_level, RiskLevel::High);
}

#[tokio::test]
async fn test_count_recent_nearby_helper() {
    let assessor = assessor(recent_reports(CENTRAL.0, CENTRAL.1, 2), FailingWeather, None);

    let nearby = assessor.count_recent_nearby(at(CENTRAL)).await;
    assert_eq!(nearby.count, 2);
    assert_eq!(nearby.threshold_assessment, RiskLevel::Medium);

    let far = assessor.count_recent_nearby(at((13.2, 77.7))).await;
    assert_eq!(far.count, 0);
    assert_eq!(far.threshold_assessment, RiskLevel::Low);
}

#[test]
fn test_status_accessors() {
    let model = Arc::new(FakeClassifier::returning("Low"));
    let assessor = assessor(vec![], FailingWeather, Some(model));

    assert!(assessor.model_ready());
    assert_eq!(assessor.zone_count(), 1);
    assert_eq!(assessor.model_status().unwrap().feature_count, 10);

    let without = assessor_with(vec![], FailingWeather, None, AssessorSettings::default());
    assert!(!without.model_ready());
    assert!(without.model_status().is_none());
}
