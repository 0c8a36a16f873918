//! Test doubles cho các external capabilities (store, weather, classifier).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use super::alerts::{AlertRecord, AlertStore, NewAlert};
use super::features::{FeatureLayout, FeatureVector};
use super::geocoder::{GeocodeError, ReverseGeocoder};
use super::location::Coordinate;
use super::model::{FloodClassifier, InferenceError};
use super::reports::{NewReport, NlpAnalysis, ReportQuery, ReportRecord, ReportStore, StoreError};
use super::weather::{WeatherError, WeatherProvider, WeatherReading};
use super::zones::ZoneChecker;

// ============================================================================
// REPORT STORE
// ============================================================================

#[derive(Default)]
pub struct InMemoryReportStore {
    reports: Mutex<Vec<ReportRecord>>,
}

impl InMemoryReportStore {
    pub fn with_reports(reports: Vec<ReportRecord>) -> Self {
        Self { reports: Mutex::new(reports) }
    }

    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn count(&self, query: &ReportQuery) -> Result<u64, StoreError> {
        Ok(self.reports.lock().iter().filter(|r| query.matches(r)).count() as u64)
    }

    async fn find(&self, query: &ReportQuery) -> Result<Vec<ReportRecord>, StoreError> {
        let mut found: Vec<ReportRecord> = self.reports
            .lock()
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = query.limit {
            found.truncate(usize::try_from(limit).unwrap_or(0));
        }
        Ok(found)
    }

    async fn insert(&self, report: NewReport) -> Result<ReportRecord, StoreError> {
        let record = ReportRecord {
            id: Uuid::new_v4(),
            latitude: report.coordinate.latitude(),
            longitude: report.coordinate.longitude(),
            description: report.description,
            water_level: report.water_level,
            nlp_analysis: report.nlp_analysis,
            created_at: report.created_at,
        };
        self.reports.lock().push(record.clone());
        Ok(record)
    }
}

pub struct FailingReportStore;

#[async_trait]
impl ReportStore for FailingReportStore {
    async fn count(&self, _query: &ReportQuery) -> Result<u64, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }

    async fn find(&self, _query: &ReportQuery) -> Result<Vec<ReportRecord>, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }

    async fn insert(&self, _report: NewReport) -> Result<ReportRecord, StoreError> {
        Err(StoreError::Database("connection refused".to_string()))
    }
}

pub fn report_at(latitude: f64, longitude: f64, created_at: DateTime<Utc>) -> ReportRecord {
    ReportRecord {
        id: Uuid::new_v4(),
        latitude,
        longitude,
        description: "Water rising on the main road".to_string(),
        water_level: None,
        nlp_analysis: NlpAnalysis::default(),
        created_at,
    }
}

/// `count` reports one hour old at the given point
pub fn recent_reports(latitude: f64, longitude: f64, count: usize) -> Vec<ReportRecord> {
    let at = Utc::now() - chrono::Duration::hours(1);
    (0..count).map(|_| report_at(latitude, longitude, at)).collect()
}

// ============================================================================
// WEATHER
// ============================================================================

pub struct FixedWeather(pub WeatherReading);

impl FixedWeather {
    pub fn rainy() -> Self {
        Self(WeatherReading {
            temperature_c: 22.0,
            humidity_pct: 95.0,
            pressure_hpa: Some(1002.0),
            precipitation_1h_mm: 18.5,
        })
    }
}

#[async_trait]
impl WeatherProvider for FixedWeather {
    async fn current(&self, _coordinate: Coordinate) -> Result<WeatherReading, WeatherError> {
        Ok(self.0)
    }
}

pub struct FailingWeather;

#[async_trait]
impl WeatherProvider for FailingWeather {
    async fn current(&self, _coordinate: Coordinate) -> Result<WeatherReading, WeatherError> {
        Err(WeatherError::Network("timed out".to_string()))
    }
}

/// Never answers within any reasonable bound
pub struct HangingWeather;

#[async_trait]
impl WeatherProvider for HangingWeather {
    async fn current(&self, _coordinate: Coordinate) -> Result<WeatherReading, WeatherError> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Err(WeatherError::Network("unreachable".to_string()))
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

enum Behaviour {
    Label(String),
    Fail,
    Panic,
    NotReady,
}

pub struct FakeClassifier {
    layout: Arc<FeatureLayout>,
    behaviour: Behaviour,
    probability: Option<f32>,
    calls: AtomicUsize,
    last_input: Mutex<Option<FeatureVector>>,
}

impl FakeClassifier {
    fn build(behaviour: Behaviour) -> Self {
        Self {
            layout: Arc::new(FeatureLayout::training_default()),
            behaviour,
            probability: None,
            calls: AtomicUsize::new(0),
            last_input: Mutex::new(None),
        }
    }

    pub fn returning(label: &str) -> Self {
        Self::build(Behaviour::Label(label.to_string()))
    }

    pub fn failing() -> Self {
        Self::build(Behaviour::Fail)
    }

    pub fn panicking() -> Self {
        Self::build(Behaviour::Panic)
    }

    pub fn not_ready() -> Self {
        Self::build(Behaviour::NotReady)
    }

    pub fn with_layout(mut self, layout: FeatureLayout) -> Self {
        self.layout = Arc::new(layout);
        self
    }

    pub fn with_probability(mut self, probability: f32) -> Self {
        self.probability = Some(probability);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_input(&self) -> Option<FeatureVector> {
        self.last_input.lock().clone()
    }
}

impl FloodClassifier for FakeClassifier {
    fn layout(&self) -> Arc<FeatureLayout> {
        Arc::clone(&self.layout)
    }

    fn is_ready(&self) -> bool {
        !matches!(self.behaviour, Behaviour::NotReady)
    }

    fn predict(&self, features: &FeatureVector) -> Result<String, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock() = Some(features.clone());
        features.validate(&self.layout)?;

        match &self.behaviour {
            Behaviour::Label(label) => Ok(label.clone()),
            Behaviour::Fail => Err(InferenceError::Runtime("session crashed".to_string())),
            Behaviour::Panic => panic!("inference runtime aborted"),
            Behaviour::NotReady => Err(InferenceError::NotLoaded),
        }
    }

    fn predict_probability(&self, _features: &FeatureVector) -> Result<Option<f32>, InferenceError> {
        Ok(self.probability)
    }
}

// ============================================================================
// ZONES
// ============================================================================

/// One square zone around Bellandur lake: lat 12.92..12.95, lon 77.66..77.70
pub fn bellandur_zone() -> ZoneChecker {
    let geojson = r#"{
        "type": "Polygon",
        "coordinates": [[[77.66, 12.92], [77.70, 12.92], [77.70, 12.95], [77.66, 12.95], [77.66, 12.92]]]
    }"#;
    ZoneChecker::from_geojson_str(geojson).expect("fixture zone")
}

// ============================================================================
// ALERTS & GEOCODING
// ============================================================================

#[derive(Default)]
pub struct InMemoryAlertStore {
    alerts: Mutex<Vec<AlertRecord>>,
}

impl InMemoryAlertStore {
    pub fn len(&self) -> usize {
        self.alerts.lock().len()
    }
}

#[async_trait]
impl AlertStore for InMemoryAlertStore {
    async fn insert(&self, alert: NewAlert) -> Result<AlertRecord, StoreError> {
        let record = AlertRecord {
            id: Uuid::new_v4(),
            location_name: alert.location_name,
            risk_level: alert.risk_level,
            message: alert.message,
            recipient: alert.recipient,
            source: alert.source,
            sent_at: Utc::now(),
        };
        self.alerts.lock().push(record.clone());
        Ok(record)
    }

    async fn recent(&self, limit: i64) -> Result<Vec<AlertRecord>, StoreError> {
        let mut alerts = self.alerts.lock().clone();
        alerts.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        alerts.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(alerts)
    }
}

pub struct FixedGeocoder(pub String);

#[async_trait]
impl ReverseGeocoder for FixedGeocoder {
    async fn reverse(&self, _coordinate: Coordinate) -> Result<String, GeocodeError> {
        Ok(self.0.clone())
    }
}

pub struct FailingGeocoder;

#[async_trait]
impl ReverseGeocoder for FailingGeocoder {
    async fn reverse(&self, _coordinate: Coordinate) -> Result<String, GeocodeError> {
        Err(GeocodeError::Status(503))
    }
}
