//! Report model

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::logic::location::BoundingBox;
use crate::logic::reports::{
    NewReport, NlpAnalysis, ReportQuery, ReportRecord, ReportStore, StoreError, WaterLevel,
};

#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub water_level: Option<String>,
    pub nlp_analysis: Json<NlpAnalysis>,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn into_record(self) -> ReportRecord {
        let water_level = self.water_level.as_deref().and_then(|raw| {
            let parsed = WaterLevel::parse(raw);
            if parsed.is_none() {
                tracing::warn!("Unknown water_level '{}' in report {}", raw, self.id);
            }
            parsed
        });

        ReportRecord {
            id: self.id,
            latitude: self.latitude,
            longitude: self.longitude,
            description: self.description,
            water_level,
            nlp_analysis: self.nlp_analysis.0,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReportCreate {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(length(min = 10, max = 500))]
    pub description: String,
    pub water_level: Option<WaterLevel>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub message: String,
    pub data: ReportRecord,
}

// ============================================================================
// POSTGRES STORE
// ============================================================================

/// Bounding-box + time-range filter; NULL binds disable a clause
const FILTER_SQL: &str = r#"
    ($1::float8 IS NULL OR latitude BETWEEN $1 AND $2)
    AND ($3::float8 IS NULL OR longitude BETWEEN $3 AND $4)
    AND ($5::timestamptz IS NULL OR created_at >= $5)
    AND ($6::timestamptz IS NULL OR created_at <= $6)
"#;

#[derive(Clone)]
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn area_binds(area: Option<BoundingBox>) -> [Option<f64>; 4] {
    match area {
        Some(b) => [Some(b.min_lat), Some(b.max_lat), Some(b.min_lon), Some(b.max_lon)],
        None => [None; 4],
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn count(&self, query: &ReportQuery) -> Result<u64, StoreError> {
        let [min_lat, max_lat, min_lon, max_lon] = area_binds(query.area);
        let sql = format!("SELECT COUNT(*) FROM reports WHERE {}", FILTER_SQL);

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(min_lat)
            .bind(max_lat)
            .bind(min_lon)
            .bind(max_lon)
            .bind(query.since)
            .bind(query.until)
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn find(&self, query: &ReportQuery) -> Result<Vec<ReportRecord>, StoreError> {
        let [min_lat, max_lat, min_lon, max_lon] = area_binds(query.area);
        // LIMIT NULL = no limit
        let sql = format!(
            "SELECT * FROM reports WHERE {} ORDER BY created_at DESC LIMIT $7",
            FILTER_SQL
        );

        let rows = sqlx::query_as::<_, Report>(&sql)
            .bind(min_lat)
            .bind(max_lat)
            .bind(min_lon)
            .bind(max_lon)
            .bind(query.since)
            .bind(query.until)
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Report::into_record).collect())
    }

    async fn insert(&self, report: NewReport) -> Result<ReportRecord, StoreError> {
        let row = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (latitude, longitude, description, water_level, nlp_analysis, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#
        )
        .bind(report.coordinate.latitude())
        .bind(report.coordinate.longitude())
        .bind(&report.description)
        .bind(report.water_level.map(|w| w.as_str()))
        .bind(Json(&report.nlp_analysis))
        .bind(report.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(description: &str, latitude: f64) -> ReportCreate {
        ReportCreate {
            latitude,
            longitude: 77.59,
            description: description.to_string(),
            water_level: None,
        }
    }

    #[test]
    fn test_report_create_validation() {
        assert!(create("Knee-deep water near the metro station", 12.97).validate().is_ok());
        assert!(create("too short", 12.97).validate().is_err());
        assert!(create(&"x".repeat(501), 12.97).validate().is_err());
        assert!(create("Knee-deep water near the metro station", 95.0).validate().is_err());
    }

    #[test]
    fn test_unknown_water_level_is_dropped() {
        let row = Report {
            id: Uuid::new_v4(),
            latitude: 12.97,
            longitude: 77.59,
            description: "Water on the road".to_string(),
            water_level: Some("Shin-deep".to_string()),
            nlp_analysis: Json(NlpAnalysis::default()),
            created_at: Utc::now(),
        };
        assert_eq!(row.into_record().water_level, None);
    }

    #[test]
    fn test_area_binds() {
        assert_eq!(area_binds(None), [None; 4]);
        let b = BoundingBox { min_lat: 1.0, max_lat: 2.0, min_lon: 3.0, max_lon: 4.0 };
        assert_eq!(area_binds(Some(b)), [Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
    }
}
