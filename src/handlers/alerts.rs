//! Alerts handlers

use axum::{extract::{Query, State}, http::StatusCode, Json};
use validator::Validate;

use crate::logic::alerts::AlertRecord;
use crate::models::{AlertCreate, AlertFilter};
use crate::{AppResult, AppState};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// Manually send and log an alert
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<AlertCreate>,
) -> AppResult<(StatusCode, Json<AlertRecord>)> {
    req.validate()?;
    let alert = state.alerts.store().insert(req.into()).await?;
    tracing::info!("Manual alert logged for {}", alert.location_name);
    Ok((StatusCode::CREATED, Json(alert)))
}

/// Recent alerts, newest first
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<AlertFilter>,
) -> AppResult<Json<Vec<AlertRecord>>> {
    let limit = filter.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let alerts = state.alerts.store().recent(limit).await?;
    Ok(Json(alerts))
}
