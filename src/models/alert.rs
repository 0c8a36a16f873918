//! Alert model

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::logic::alerts::{AlertRecord, AlertStore, NewAlert};
use crate::logic::reports::StoreError;
use crate::logic::risk::{AssessmentSource, RiskLevel};

#[derive(Debug, Clone, FromRow)]
pub struct Alert {
    pub id: Uuid,
    pub location_name: String,
    pub risk_level: String,
    pub message: String,
    pub recipient: Option<String>,
    pub source: Option<String>,
    pub sent_at: DateTime<Utc>,
}

impl Alert {
    pub fn into_record(self) -> AlertRecord {
        AlertRecord {
            id: self.id,
            location_name: self.location_name,
            risk_level: RiskLevel::from_label(&self.risk_level),
            message: self.message,
            recipient: self.recipient,
            source: self.source.as_deref().and_then(AssessmentSource::parse),
            sent_at: self.sent_at,
        }
    }
}

/// Manual alert submission
#[derive(Debug, Deserialize, Validate)]
pub struct AlertCreate {
    #[validate(length(min = 1, max = 255))]
    pub location_name: String,
    pub risk_level: RiskLevel,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    #[validate(length(max = 255))]
    pub recipient: Option<String>,
    pub source: Option<AssessmentSource>,
}

impl From<AlertCreate> for NewAlert {
    fn from(req: AlertCreate) -> Self {
        NewAlert {
            location_name: req.location_name,
            risk_level: req.risk_level,
            message: req.message,
            recipient: req.recipient,
            source: req.source,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct AlertFilter {
    pub limit: Option<i64>,
}

// ============================================================================
// POSTGRES STORE
// ============================================================================

#[derive(Clone)]
pub struct PgAlertStore {
    pool: PgPool,
}

impl PgAlertStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for PgAlertStore {
    async fn insert(&self, alert: NewAlert) -> Result<AlertRecord, StoreError> {
        let row = sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alerts (location_name, risk_level, message, recipient, source, sent_at)
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING *
            "#
        )
        .bind(&alert.location_name)
        .bind(alert.risk_level.as_str())
        .bind(&alert.message)
        .bind(&alert.recipient)
        .bind(alert.source.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_record())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<AlertRecord>, StoreError> {
        let rows = sqlx::query_as::<_, Alert>(
            "SELECT * FROM alerts ORDER BY sent_at DESC LIMIT $1"
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Alert::into_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion() {
        let row = Alert {
            id: Uuid::new_v4(),
            location_name: "Bellandur, Bengaluru".to_string(),
            risk_level: "High".to_string(),
            message: "Severe Flood Warning".to_string(),
            recipient: None,
            source: Some("hybrid-historical".to_string()),
            sent_at: Utc::now(),
        };
        let record = row.into_record();
        assert_eq!(record.risk_level, RiskLevel::High);
        assert_eq!(record.source, Some(AssessmentSource::HybridHistorical));
    }

    #[test]
    fn test_unknown_source_is_dropped() {
        assert_eq!(AssessmentSource::parse("satellite"), None);
        assert_eq!(AssessmentSource::parse("manual-override"), Some(AssessmentSource::ManualOverride));
    }
}
