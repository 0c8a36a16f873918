//! Reports Module
//!
//! - `types`: ReportRecord, WaterLevel, NLP annotations, ReportQuery
//! - `store`: ReportStore capability (count / find / insert)
//! - `counter`: recent nearby report counting

pub mod types;
pub mod store;
pub mod counter;

pub use types::{NewReport, NlpAnalysis, ReportQuery, ReportRecord, Sentiment, WaterLevel};
pub use store::{ReportStore, StoreError};
pub use counter::ReportCounter;
