//! Reports handlers

use std::sync::Arc;

use axum::{extract::{Query, State}, http::StatusCode, Json};
use chrono::Utc;
use validator::Validate;

use crate::logic::location::Coordinate;
use crate::logic::nlp::analyze_description;
use crate::logic::reports::NewReport;
use crate::models::{NearbyQuery, NearbyResponse, ReportCreate, ReportResponse};
use crate::{AppResult, AppState};

/// Submit a report; risk assessment + alerting run in the background
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<ReportCreate>,
) -> AppResult<(StatusCode, Json<ReportResponse>)> {
    req.validate()?;
    let coordinate = Coordinate::new(req.latitude, req.longitude)?;

    let record = state.reports
        .insert(NewReport {
            coordinate,
            nlp_analysis: analyze_description(&req.description),
            description: req.description,
            water_level: req.water_level,
            created_at: Utc::now(),
        })
        .await?;

    tracing::info!("Report {} stored at {}", record.id, coordinate);

    let assessor = Arc::clone(&state.assessor);
    let alerts = Arc::clone(&state.alerts);
    let description = record.description.clone();
    tokio::spawn(async move {
        alerts.assess_and_alert(&assessor, coordinate, &description).await;
    });

    Ok((
        StatusCode::CREATED,
        Json(ReportResponse {
            message: "Report received and analyzed successfully!".to_string(),
            data: record,
        }),
    ))
}

/// Recent report count + threshold verdict around a point
pub async fn nearby(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> AppResult<Json<NearbyResponse>> {
    let coordinate = Coordinate::new(query.lat, query.lon)?;
    let nearby = state.assessor.count_recent_nearby(coordinate).await;
    let counter = state.assessor.counter();

    Ok(Json(NearbyResponse {
        latitude: coordinate.latitude(),
        longitude: coordinate.longitude(),
        count: nearby.count,
        threshold_assessment: nearby.threshold_assessment,
        window_hours: counter.window().num_hours(),
        radius_km: counter.radius_km(),
    }))
}
