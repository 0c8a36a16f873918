//! Report Counter
//!
//! Đếm user reports gần đây trong một bounding box quanh coordinate.
//! Best-effort signal: storage failure = 0 reports + warning.

use std::sync::Arc;

use chrono::{Duration, Utc};

use super::store::ReportStore;
use super::types::ReportQuery;
use crate::logic::location::{BoundingBox, Coordinate};

/// Default look-back window
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// Default search radius
pub const DEFAULT_RADIUS_KM: f64 = 1.0;

pub struct ReportCounter {
    store: Arc<dyn ReportStore>,
    window: Duration,
    radius_km: f64,
}

impl ReportCounter {
    pub fn new(store: Arc<dyn ReportStore>, window: Duration, radius_km: f64) -> Self {
        Self { store, window, radius_km }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Reports within the configured window and radius
    pub async fn count_recent_nearby(&self, coordinate: Coordinate) -> u32 {
        self.count_within(coordinate, self.window, self.radius_km).await
    }

    /// A window reaching past the earliest representable time counts all history
    pub async fn count_within(&self, coordinate: Coordinate, window: Duration, radius_km: f64) -> u32 {
        let since = Utc::now().checked_sub_signed(window);
        if since.is_none() {
            tracing::warn!("Report window {} overflows the clock, counting all reports", window);
        }

        let query = ReportQuery {
            area: Some(BoundingBox::around(coordinate, radius_km)),
            since,
            ..Default::default()
        };

        match self.store.count(&query).await {
            Ok(count) => u32::try_from(count).unwrap_or(u32::MAX),
            Err(e) => {
                tracing::warn!("Error counting reports near {}: {}", coordinate, e);
                0
            }
        }
    }
}
