//! Alerts
//!
//! Compose + persist flood alerts khi một report đẩy risk lên Medium/High.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::assessment::RiskAssessor;
use super::geocoder::{location_name, ReverseGeocoder};
use super::location::Coordinate;
use super::reports::StoreError;
use super::risk::{AssessmentSource, RiskLevel};

/// Broadcast group for report-triggered alerts
pub const AREA_RECIPIENT: &str = "all-subscribers-in-area";

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: Uuid,
    pub location_name: String,
    pub risk_level: RiskLevel,
    pub message: String,
    pub recipient: Option<String>,
    pub source: Option<AssessmentSource>,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAlert {
    pub location_name: String,
    pub risk_level: RiskLevel,
    pub message: String,
    pub recipient: Option<String>,
    pub source: Option<AssessmentSource>,
}

#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Stamps `sent_at = now`
    async fn insert(&self, alert: NewAlert) -> Result<AlertRecord, StoreError>;

    /// Newest first
    async fn recent(&self, limit: i64) -> Result<Vec<AlertRecord>, StoreError>;
}

// ============================================================================
// MESSAGE
// ============================================================================

pub fn compose_message(level: RiskLevel, location: &str, description: &str) -> String {
    match level {
        RiskLevel::High => format!(
            "Severe Flood Warning in {}: {}. Immediate action advised.",
            location, description
        ),
        RiskLevel::Medium => format!(
            "Moderate Flood Risk in {}: {}. Exercise caution.",
            location, description
        ),
        other => format!("Flood Warning: {}. Risk Level: {}.", description, other),
    }
}

// ============================================================================
// DISPATCHER
// ============================================================================

pub struct AlertDispatcher {
    store: Arc<dyn AlertStore>,
    geocoder: Arc<dyn ReverseGeocoder>,
}

impl AlertDispatcher {
    pub fn new(store: Arc<dyn AlertStore>, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self { store, geocoder }
    }

    pub fn store(&self) -> &Arc<dyn AlertStore> {
        &self.store
    }

    /// Persist an alert for Medium/High; `None` for anything lower
    pub async fn raise(
        &self,
        coordinate: Coordinate,
        level: RiskLevel,
        description: &str,
    ) -> Result<Option<AlertRecord>, StoreError> {
        if !matches!(level, RiskLevel::Medium | RiskLevel::High) {
            return Ok(None);
        }

        let location = location_name(self.geocoder.as_ref(), coordinate).await;
        let alert = NewAlert {
            message: compose_message(level, &location, description),
            location_name: location,
            risk_level: level,
            recipient: Some(AREA_RECIPIENT.to_string()),
            source: Some(AssessmentSource::HybridHistorical),
        };

        let record = self.store.insert(alert).await?;
        tracing::info!("Alert generated and saved: {}", record.message);
        Ok(Some(record))
    }

    /// Background step after a report submission
    pub async fn assess_and_alert(
        &self,
        assessor: &RiskAssessor,
        coordinate: Coordinate,
        description: &str,
    ) -> Option<AlertRecord> {
        let result = assessor.assess(coordinate).await;
        if !result.warrants_alert() {
            tracing::debug!("No alert for {} (risk {})", coordinate, result.risk_level);
            return None;
        }

        match self.raise(coordinate, result.risk_level, description).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Error saving generated alert for {}: {}", coordinate, e);
                None
            }
        }
    }
}
