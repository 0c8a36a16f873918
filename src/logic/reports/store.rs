//! Report Store
//!
//! Document-query capability over reports. Implemented on PostgreSQL in
//! `models::report`.

use async_trait::async_trait;

use super::types::{NewReport, ReportQuery, ReportRecord};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn count(&self, query: &ReportQuery) -> Result<u64, StoreError>;

    /// Newest first, honouring `query.limit`
    async fn find(&self, query: &ReportQuery) -> Result<Vec<ReportRecord>, StoreError>;

    async fn insert(&self, report: NewReport) -> Result<ReportRecord, StoreError>;
}
