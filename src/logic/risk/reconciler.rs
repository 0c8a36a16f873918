//! Risk Reconciler
//!
//! CHỈ chứa logic reconcile - không có types, không có thresholds.
//! Input: threshold verdict, model verdict, report count, manual override
//! Output: Reconciliation (final level + rule fired)

use super::rules::ReportThresholds;
use super::types::{DecisionRule, Reconciliation, RiskLevel};

// ============================================================================
// MAIN DECISION FUNCTION
// ============================================================================

/// Final risk level with default thresholds
pub fn decide(
    threshold_risk: RiskLevel,
    model_risk: RiskLevel,
    recent_report_count: u32,
    manual_override: Option<RiskLevel>,
) -> RiskLevel {
    reconcile(
        threshold_risk,
        model_risk,
        recent_report_count,
        manual_override,
        &ReportThresholds::default(),
    )
    .level
}

/// Rule-ordered reconciliation, first match wins:
///
/// 1. manual override
/// 2. reports >= high threshold → High
/// 3. reports >= medium threshold → Medium
/// 4. model High → High
/// 5. model Medium → max(threshold, Medium)
/// 6. threshold verdict unchanged
///
/// Reports dominate; the model only escalates.
pub fn reconcile(
    threshold_risk: RiskLevel,
    model_risk: RiskLevel,
    recent_report_count: u32,
    manual_override: Option<RiskLevel>,
    thresholds: &ReportThresholds,
) -> Reconciliation {
    if let Some(level) = manual_override {
        return Reconciliation { level, rule: DecisionRule::ManualOverride };
    }

    if recent_report_count >= thresholds.high {
        return Reconciliation { level: RiskLevel::High, rule: DecisionRule::ReportsHigh };
    }
    if recent_report_count >= thresholds.medium {
        return Reconciliation { level: RiskLevel::Medium, rule: DecisionRule::ReportsMedium };
    }

    // Unknown model output falls through to the threshold verdict
    match model_risk {
        RiskLevel::High => Reconciliation { level: RiskLevel::High, rule: DecisionRule::ModelHigh },
        RiskLevel::Medium => Reconciliation {
            level: threshold_risk.escalate(RiskLevel::Medium),
            rule: DecisionRule::ModelMedium,
        },
        RiskLevel::Low | RiskLevel::Unknown => Reconciliation {
            level: threshold_risk,
            rule: DecisionRule::ThresholdOnly,
        },
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Unknown,
    ];

    #[test]
    fn test_high_report_count_dominates_model() {
        for count in [5, 6, 12, 500] {
            for model in ALL {
                for threshold in ALL {
                    assert_eq!(decide(threshold, model, count, None), RiskLevel::High);
                }
            }
        }
    }

    #[test]
    fn test_override_wins_over_everything() {
        for level in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
            for count in [0, 3, 9] {
                for model in ALL {
                    assert_eq!(decide(RiskLevel::High, model, count, Some(level)), level);
                }
            }
        }
    }

    #[test]
    fn test_medium_report_count_beats_low_model() {
        let result = reconcile(
            RiskLevel::Medium,
            RiskLevel::Low,
            3,
            None,
            &ReportThresholds::default(),
        );
        assert_eq!(result.level, RiskLevel::Medium);
        assert_eq!(result.rule, DecisionRule::ReportsMedium);
    }

    #[test]
    fn test_model_medium_escalates_low_threshold() {
        assert_eq!(decide(RiskLevel::Low, RiskLevel::Medium, 0, None), RiskLevel::Medium);
    }

    #[test]
    fn test_model_low_never_downgrades_threshold() {
        assert_eq!(decide(RiskLevel::Medium, RiskLevel::Low, 0, None), RiskLevel::Medium);
        assert_eq!(decide(RiskLevel::High, RiskLevel::Low, 0, None), RiskLevel::High);
    }

    #[test]
    fn test_model_medium_keeps_higher_threshold() {
        assert_eq!(decide(RiskLevel::High, RiskLevel::Medium, 0, None), RiskLevel::High);
    }

    #[test]
    fn test_model_high_escalates() {
        let result = reconcile(
            RiskLevel::Low,
            RiskLevel::High,
            1,
            None,
            &ReportThresholds::default(),
        );
        assert_eq!(result.level, RiskLevel::High);
        assert_eq!(result.rule, DecisionRule::ModelHigh);
    }

    #[test]
    fn test_unknown_model_falls_back_to_threshold() {
        assert_eq!(decide(RiskLevel::Low, RiskLevel::Unknown, 0, None), RiskLevel::Low);
    }

    #[test]
    fn test_unknown_threshold_with_model_medium() {
        // Unknown is treated as the lowest level when escalating
        assert_eq!(decide(RiskLevel::Unknown, RiskLevel::Medium, 0, None), RiskLevel::Medium);
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = ReportThresholds::new(10, 4);
        let result = reconcile(RiskLevel::Low, RiskLevel::Low, 6, None, &strict);
        assert_eq!(result.level, RiskLevel::Medium);

        let result = reconcile(RiskLevel::Low, RiskLevel::Low, 3, None, &strict);
        assert_eq!(result.level, RiskLevel::Low);
        assert_eq!(result.rule, DecisionRule::ThresholdOnly);
    }
}
