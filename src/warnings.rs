use crate::models::{EarlyWarning, MetricsSnapshot, WarningKind, WarningSeverity};

/// Acute conditions read straight off the snapshot, independent of the risk
/// score. Every matching rule fires, in a fixed order.
pub fn detect_early_warnings(snapshot: &MetricsSnapshot) -> Vec<EarlyWarning> {
    let mut warnings = Vec::new();

    if snapshot.current_streak == 0 {
        warnings.push(EarlyWarning {
            kind: WarningKind::StreakBroken,
            severity: WarningSeverity::High,
            message: "Study streak has been broken".to_string(),
            recommendation: "Reach out today and plan a short session to restart the streak"
                .to_string(),
        });
    }

    if snapshot.recent_accuracy_trend < -10.0 {
        warnings.push(EarlyWarning {
            kind: WarningKind::AccuracyDecline,
            severity: WarningSeverity::High,
            message: format!(
                "Accuracy is falling sharply ({:.1} points/week)",
                snapshot.recent_accuracy_trend
            ),
            recommendation: "Review recent mistakes and check for gaps in prerequisite topics"
                .to_string(),
        });
    }

    if snapshot.review_completion_rate < 0.5 && snapshot.reviews_due > 10 {
        warnings.push(EarlyWarning {
            kind: WarningKind::ReviewBacklog,
            severity: WarningSeverity::Medium,
            message: format!("{} reviews are piling up", snapshot.reviews_due),
            recommendation: "Set aside a session for spaced-repetition reviews only".to_string(),
        });
    }

    warnings
}
