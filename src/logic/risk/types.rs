//! Risk Types
//!
//! Core types cho flood risk assessment.
//! KHÔNG chứa logic quyết định - chỉ data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// RISK LEVEL
// ============================================================================

/// Tri-level flood risk plus the `Unknown` failure sentinel.
///
/// `Unknown` has no rank: it never takes part in ordering comparisons.
/// Use [`RiskLevel::rank`] or [`RiskLevel::escalate`] instead of
/// deriving `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Unknown => "Unknown",
        }
    }

    /// Ordinal for Low < Medium < High, `None` for Unknown
    pub fn rank(&self) -> Option<u8> {
        match self {
            RiskLevel::Low => Some(0),
            RiskLevel::Medium => Some(1),
            RiskLevel::High => Some(2),
            RiskLevel::Unknown => None,
        }
    }

    /// Higher of two levels for escalation. Unknown never wins.
    pub fn escalate(self, floor: RiskLevel) -> RiskLevel {
        match (self.rank(), floor.rank()) {
            (Some(a), Some(b)) => {
                if a >= b {
                    self
                } else {
                    floor
                }
            }
            (None, Some(_)) => floor,
            (Some(_), None) => self,
            (None, None) => RiskLevel::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        self.rank().is_some()
    }

    /// Total mapping from a classifier label to a level
    pub fn from_label(label: &str) -> RiskLevel {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => RiskLevel::Low,
            "medium" => RiskLevel::Medium,
            "high" => RiskLevel::High,
            _ => RiskLevel::Unknown,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ASSESSMENT SOURCE
// ============================================================================

/// Where a verdict came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssessmentSource {
    UserReport,
    HybridHistorical,
    MlPrediction,
    ManualOverride,
    Error,
}

impl AssessmentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentSource::UserReport => "user-report",
            AssessmentSource::HybridHistorical => "hybrid-historical",
            AssessmentSource::MlPrediction => "ml-prediction",
            AssessmentSource::ManualOverride => "manual-override",
            AssessmentSource::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user-report" => Some(AssessmentSource::UserReport),
            "hybrid-historical" => Some(AssessmentSource::HybridHistorical),
            "ml-prediction" => Some(AssessmentSource::MlPrediction),
            "manual-override" => Some(AssessmentSource::ManualOverride),
            "error" => Some(AssessmentSource::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for AssessmentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// DECISION RULE
// ============================================================================

/// Which precedence rule produced the final level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRule {
    ManualOverride,
    ReportsHigh,
    ReportsMedium,
    ModelHigh,
    ModelMedium,
    ThresholdOnly,
}

/// Output of the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub level: RiskLevel,
    pub rule: DecisionRule,
}
