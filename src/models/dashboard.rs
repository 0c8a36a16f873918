//! Dashboard DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::reports::ReportRecord;
use crate::logic::risk::{AssessmentSource, RiskLevel};

/// Default look-back when no range is given
pub const DEFAULT_WINDOW_HOURS: i64 = 48;

/// Max map points per response
pub const MAX_MAP_POINTS: i64 = 50;

#[derive(Debug, Deserialize, Default)]
pub struct DashboardQuery {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl DashboardQuery {
    /// Missing end = now; missing start = end - 48h (clamped to the earliest time)
    pub fn resolve(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let end = self.end_time.unwrap_or(now);
        let start = self.start_time.unwrap_or_else(|| {
            end.checked_sub_signed(Duration::hours(DEFAULT_WINDOW_HOURS))
                .unwrap_or(DateTime::<Utc>::MIN_UTC)
        });
        (start, end)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MapPoint {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub risk_level: RiskLevel,
    pub source: AssessmentSource,
    pub details: String,
}

impl From<ReportRecord> for MapPoint {
    fn from(report: ReportRecord) -> Self {
        Self {
            id: report.id,
            latitude: report.latitude,
            longitude: report.longitude,
            risk_level: report.water_level.map_or(RiskLevel::Low, |w| w.risk_level()),
            source: AssessmentSource::UserReport,
            details: report.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub map_points: Vec<MapPoint>,
    /// Map point count per risk level
    pub charts_data: BTreeMap<String, u32>,
}

impl DashboardResponse {
    pub fn from_reports(reports: Vec<ReportRecord>) -> Self {
        let map_points: Vec<MapPoint> = reports.into_iter().map(MapPoint::from).collect();

        let mut charts_data = BTreeMap::new();
        for point in &map_points {
            *charts_data.entry(point.risk_level.to_string()).or_insert(0) += 1;
        }

        Self { map_points, charts_data }
    }
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NearbyResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub count: u32,
    pub threshold_assessment: RiskLevel,
    pub window_hours: i64,
    pub radius_km: f64,
}
