//! HTTP handlers

pub mod health;
pub mod risk;
pub mod reports;
pub mod dashboard;
pub mod alerts;


use crate::AppError;

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
