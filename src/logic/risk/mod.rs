//! Risk Module
//!
//! Reconcile threshold verdict (user reports), model verdict (classifier),
//! và manual overrides thành một final RiskLevel.
//! Đây là CORE STEP - nơi quyết định Low/Medium/High.
//!
//! ## Structure
//! - `types`: Core types (RiskLevel, AssessmentSource, DecisionRule)
//! - `rules`: Thresholds, recommendations, override points
//! - `reconciler`: Precedence logic
//!
//! ## Usage
//! ```ignore
//! use crate::logic::risk::{decide, RiskLevel};
//!
//! let level = decide(RiskLevel::Low, RiskLevel::Medium, 0, None);
//! assert_eq!(level, RiskLevel::Medium);
//! ```

pub mod types;
pub mod rules;
pub mod reconciler;

pub use types::{AssessmentSource, DecisionRule, Reconciliation, RiskLevel};

pub use rules::{
    recommendation_for,
    InvalidOverride,
    ManualOverrides,
    OverridePoint,
    ReportThresholds,
    REPORTS_HIGH_THRESHOLD,
    REPORTS_MEDIUM_THRESHOLD,
};

pub use reconciler::{decide, reconcile};
