//! RainSafe Backend Server
//!
//! Hybrid flood risk assessment for a geographic point.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      RAINSAFE SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────────────────────────────┐    │
//! │  │  API      │  │  RiskAssessor                        │    │
//! │  │  (Axum)   │──│  reports ‖ weather+zones → classifier│    │
//! │  │           │  │  → reconcile → audit trail           │    │
//! │  └─────┬─────┘  └───────┬──────────────┬───────────────┘    │
//! │        │                │              │                    │
//! │        ▼                ▼              ▼                    │
//! │  ┌─────────────┐  ┌───────────┐  ┌──────────────────┐       │
//! │  │ PostgreSQL  │  │ OWM /     │  │ ONNX model +     │       │
//! │  │ (reports,   │  │ Nominatim │  │ flood zones      │       │
//! │  │  alerts)    │  │           │  │ (loaded once)    │       │
//! │  └─────────────┘  └───────────┘  └──────────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod models;
mod handlers;
mod error;
mod logic;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use logic::alerts::AlertDispatcher;
use logic::assessment::RiskAssessor;
use logic::geocoder::NominatimGeocoder;
use logic::model::{FloodClassifier, OnnxFloodClassifier};
use logic::reports::ReportStore;
use logic::weather::OpenWeatherProvider;
use logic::zones::ZoneChecker;
use models::{PgAlertStore, PgReportStore};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    let config = config::Config::from_env();

    // Initialize logging (JSON lines in production)
    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "rainsafe_server=debug,tower_http=debug".into()));
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("RainSafe Server starting ({})...", config.environment);
    tracing::info!("Database: {}", config.database_url.split('@').last().unwrap_or("***"));

    // Initialize database pool
    let pool = db::create_pool(&config.database_url).await
        .context("Failed to create database pool")?;

    tracing::info!("Running database migrations...");
    db::run_migrations(&pool).await
        .context("Failed to run migrations")?;

    // An empty or missing zone set must stop startup
    let zones = ZoneChecker::load(&config.flood_zones_path)
        .with_context(|| format!("Failed to load flood zones from {}", config.flood_zones_path))?;

    let classifier: Option<Arc<dyn FloodClassifier>> =
        match OnnxFloodClassifier::load(&config.model_dir) {
            Ok(model) => {
                tracing::info!("✅ Flood classifier ready");
                Some(Arc::new(model))
            }
            Err(e) => {
                tracing::warn!("Flood classifier unavailable ({}). Running without ML predictions.", e);
                None
            }
        };

    let weather = OpenWeatherProvider::new(config.weather_config())
        .context("Failed to build weather client")?;
    if !weather.is_configured() {
        tracing::warn!("OPENWEATHER_API_KEY not set; weather features will use defaults");
    }

    let geocoder = NominatimGeocoder::new(config.nominatim_url.clone(), config.weather_timeout_secs)
        .context("Failed to build geocoder client")?;

    let reports: Arc<dyn ReportStore> = Arc::new(PgReportStore::new(pool.clone()));
    let assessor = RiskAssessor::new(
        Arc::clone(&reports),
        Arc::new(weather),
        Arc::new(zones),
        classifier,
        config.assessor_settings(),
    );
    let alerts = AlertDispatcher::new(Arc::new(PgAlertStore::new(pool)), Arc::new(geocoder));

    // Build application state
    let state = AppState {
        config: config.clone(),
        reports,
        assessor: Arc::new(assessor),
        alerts: Arc::new(alerts),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await
        .context("Server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub reports: Arc<dyn ReportStore>,
    pub assessor: Arc<RiskAssessor>,
    pub alerts: Arc<AlertDispatcher>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/risk", get(handlers::risk::assess))
        .route("/report", post(handlers::reports::create))
        .route("/reports/nearby", get(handlers::reports::nearby))
        .route("/dashboard-data", get(handlers::dashboard::data))
        .route("/alerts", get(handlers::alerts::list).post(handlers::alerts::create))
        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
