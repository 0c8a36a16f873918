//! Risk assessment handler

use axum::{extract::{Query, State}, Json};

use crate::logic::location::Coordinate;
use crate::models::{RiskQuery, RiskResponse};
use crate::{AppResult, AppState};

/// Hybrid flood risk for a point. Degraded assessments still return 200.
pub async fn assess(
    State(state): State<AppState>,
    Query(query): Query<RiskQuery>,
) -> AppResult<Json<RiskResponse>> {
    let coordinate = Coordinate::new(query.lat, query.lon)?;
    let result = state.assessor.assess(coordinate).await;
    Ok(Json(result.into()))
}
