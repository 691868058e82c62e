use std::collections::HashMap;
use std::fmt::Write;

use uuid::Uuid;

use crate::models::{CohortReport, RiskLevel, StudentRecord, StudentRiskAnalysis, WarningKind};

#[derive(Debug, Clone, PartialEq)]
pub struct WarningSummary {
    pub kind: WarningKind,
    pub count: usize,
}

pub fn summarize_warnings(analyses: &[StudentRiskAnalysis]) -> Vec<WarningSummary> {
    let mut counts: HashMap<WarningKind, usize> = HashMap::new();
    for warning in analyses.iter().flat_map(|a| a.early_warnings.iter()) {
        *counts.entry(warning.kind).or_insert(0) += 1;
    }

    let mut summaries: Vec<WarningSummary> = counts
        .into_iter()
        .map(|(kind, count)| WarningSummary { kind, count })
        .collect();
    summaries.sort_by(|a, b| b.count.cmp(&a.count).then(a.kind.as_str().cmp(b.kind.as_str())));
    summaries
}

fn student_label(student_id: Uuid, roster: &HashMap<Uuid, &StudentRecord>) -> String {
    match roster.get(&student_id) {
        Some(student) => format!("{} ({}, {})", student.full_name, student.email, student.cohort),
        None => student_id.to_string(),
    }
}

fn write_case(
    output: &mut String,
    analysis: &StudentRiskAnalysis,
    roster: &HashMap<Uuid, &StudentRecord>,
) {
    let _ = write!(
        output,
        "- {} score {:.1}",
        student_label(analysis.student_id, roster),
        analysis.risk_score
    );
    if let Some(first) = analysis.interventions.first() {
        let _ = write!(
            output,
            "; next step: {} by {}",
            first.title,
            first.implement_by.date_naive()
        );
    }
    if analysis.data_degraded {
        let _ = write!(output, " (no metrics available)");
    }
    let _ = writeln!(output);
}

pub fn build_report(
    cohort: Option<&str>,
    report: &CohortReport,
    roster: &[StudentRecord],
) -> String {
    let roster: HashMap<Uuid, &StudentRecord> =
        roster.iter().map(|s| (s.student_id, s)).collect();
    let mut output = String::new();
    let cohort_label = cohort.unwrap_or("all cohorts");

    let _ = writeln!(output, "# Student Risk Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} students, average score {:.1})",
        cohort_label, report.total_students, report.average_risk_score
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Levels");

    if report.analyses.is_empty() {
        let _ = writeln!(output, "No students analyzed.");
    } else {
        for level in [
            RiskLevel::Critical,
            RiskLevel::High,
            RiskLevel::Moderate,
            RiskLevel::Low,
        ] {
            let count = report
                .analyses
                .iter()
                .filter(|a| a.risk_level == level)
                .count();
            let _ = writeln!(output, "- {}: {}", level.as_str(), count);
        }
        if report.degraded > 0 {
            let _ = writeln!(output, "- missing metrics: {}", report.degraded);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Critical Cases");
    if report.critical_cases.is_empty() {
        let _ = writeln!(output, "No critical cases.");
    } else {
        for analysis in &report.critical_cases {
            write_case(&mut output, analysis, &roster);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Needs Attention");
    if report.needs_attention.is_empty() {
        let _ = writeln!(output, "No students at high risk.");
    } else {
        for analysis in &report.needs_attention {
            write_case(&mut output, analysis, &roster);
        }
    }

    let summaries = summarize_warnings(&report.analyses);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Early Warnings");
    if summaries.is_empty() {
        let _ = writeln!(output, "No early warnings raised.");
    } else {
        for summary in &summaries {
            let _ = writeln!(output, "- {}: {} students", summary.kind.as_str(), summary.count);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::summarize_cohort;
    use crate::models::{
        EarlyWarning, TrendDirection, TrendSummary, WarningSeverity,
    };
    use chrono::Utc;

    fn analysis(level: RiskLevel, score: f64, warnings: &[WarningKind]) -> StudentRiskAnalysis {
        StudentRiskAnalysis {
            student_id: Uuid::new_v4(),
            analyzed_at: Utc::now(),
            time_window_days: 30,
            risk_score: score,
            risk_level: level,
            predictions: Vec::new(),
            risk_factors: Vec::new(),
            interventions: Vec::new(),
            confidence: 0.5,
            trends: TrendSummary {
                accuracy: TrendDirection::Stable,
                engagement: TrendDirection::Stable,
                difficulty: TrendDirection::Stable,
            },
            early_warnings: warnings
                .iter()
                .map(|kind| EarlyWarning {
                    kind: *kind,
                    severity: WarningSeverity::High,
                    message: String::new(),
                    recommendation: String::new(),
                })
                .collect(),
            data_degraded: false,
        }
    }

    #[test]
    fn warnings_are_counted_by_kind() {
        let analyses = vec![
            analysis(
                RiskLevel::Critical,
                10.0,
                &[WarningKind::StreakBroken, WarningKind::AccuracyDecline],
            ),
            analysis(RiskLevel::High, 45.0, &[WarningKind::StreakBroken]),
        ];
        let summaries = summarize_warnings(&analyses);
        assert_eq!(
            summaries,
            vec![
                WarningSummary {
                    kind: WarningKind::StreakBroken,
                    count: 2
                },
                WarningSummary {
                    kind: WarningKind::AccuracyDecline,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn report_names_students_from_roster() {
        let critical = analysis(RiskLevel::Critical, 12.0, &[WarningKind::StreakBroken]);
        let roster = vec![StudentRecord {
            student_id: critical.student_id,
            full_name: "Avery Lee".to_string(),
            email: "avery@example.edu".to_string(),
            cohort: "2026".to_string(),
        }];
        let report = summarize_cohort(vec![critical, analysis(RiskLevel::Low, 88.0, &[])]);
        let text = build_report(Some("2026"), &report, &roster);

        assert!(text.contains("Generated for 2026 (2 students, average score 50.0)"));
        assert!(text.contains("- critical: 1"));
        assert!(text.contains("- low: 1"));
        assert!(text.contains("Avery Lee (avery@example.edu, 2026) score 12.0"));
        assert!(text.contains("No students at high risk."));
        assert!(text.contains("- streak_broken: 1 students"));
    }

    #[test]
    fn empty_report_says_so() {
        let text = build_report(None, &summarize_cohort(Vec::new()), &[]);
        assert!(text.contains("all cohorts"));
        assert!(text.contains("No students analyzed."));
        assert!(text.contains("No early warnings raised."));
    }
}
