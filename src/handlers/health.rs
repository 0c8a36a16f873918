//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::logic::model::EngineStatus;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    environment: String,
    model_loaded: bool,
    zone_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<EngineStatus>,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        environment: state.config.environment.clone(),
        model_loaded: state.assessor.model_ready(),
        zone_count: state.assessor.zone_count(),
        model: state.assessor.model_status(),
    })
}
