//! Data models

pub mod report;
pub mod alert;
pub mod risk;
pub mod dashboard;

pub use report::*;
pub use alert::*;
pub use risk::*;
pub use dashboard::*;
