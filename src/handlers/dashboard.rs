//! Dashboard handler

use axum::{extract::{Query, State}, Json};
use chrono::Utc;

use crate::logic::reports::ReportQuery;
use crate::models::{DashboardQuery, DashboardResponse, MAX_MAP_POINTS};
use crate::{AppResult, AppState};

/// Recent reports as map points, newest first
pub async fn data(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardResponse>> {
    let (since, until) = query.resolve(Utc::now());

    let reports = state.reports
        .find(&ReportQuery {
            area: None,
            since: Some(since),
            until: Some(until),
            limit: Some(MAX_MAP_POINTS),
        })
        .await?;

    Ok(Json(DashboardResponse::from_reports(reports)))
}
