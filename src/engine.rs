//! Orchestrates one analysis per student and rolls cohorts up into a report.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{EngineSettings, RiskModel};
use crate::confidence::estimate_confidence;
use crate::error::ConfigError;
use crate::interventions::generate_interventions;
use crate::models::{CohortReport, MetricsSnapshot, RiskLevel, StudentRiskAnalysis};
use crate::predict::{predict_outcomes, summarize_trends};
use crate::risk::RiskScorer;
use crate::source::MetricsSource;
use crate::store::{InMemoryProfileStore, ProfileStore};
use crate::warnings::detect_early_warnings;

pub struct RiskEngine<S, P = InMemoryProfileStore> {
    scorer: RiskScorer,
    source: S,
    store: P,
    settings: EngineSettings,
}

impl<S: MetricsSource, P: ProfileStore> RiskEngine<S, P> {
    /// Fails if the risk model breaks its invariants.
    pub fn new(
        model: RiskModel,
        source: S,
        store: P,
        settings: EngineSettings,
    ) -> Result<Self, ConfigError> {
        model.validate()?;
        Ok(Self {
            scorer: RiskScorer::new(model),
            source,
            store,
            settings,
        })
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// Score a snapshot as of `now` without touching the profile store.
    pub fn analyze_snapshot(
        &self,
        student_id: Uuid,
        snapshot: &MetricsSnapshot,
        now: DateTime<Utc>,
    ) -> StudentRiskAnalysis {
        let analysis = self.scorer.score(snapshot);
        let predictions = predict_outcomes(snapshot, &analysis);
        let interventions = generate_interventions(&analysis.factors, now);

        StudentRiskAnalysis {
            student_id,
            analyzed_at: now,
            time_window_days: snapshot.time_window_days,
            risk_score: analysis.overall_score,
            risk_level: analysis.level,
            predictions,
            risk_factors: analysis.factors,
            interventions,
            confidence: estimate_confidence(snapshot),
            trends: summarize_trends(snapshot),
            early_warnings: detect_early_warnings(snapshot),
            data_degraded: false,
        }
    }

    /// Analyze a captured snapshot and record it as the student's latest profile.
    ///
    /// `analyzed_at` and every `implement_by` are taken from the clock; the
    /// rest of the analysis depends only on the snapshot.
    pub fn analyze_student(
        &self,
        student_id: Uuid,
        snapshot: MetricsSnapshot,
    ) -> StudentRiskAnalysis {
        let analysis = self.analyze_snapshot(student_id, &snapshot, Utc::now());
        self.record(analysis)
    }

    /// Fetch metrics for a student, then analyze them.
    ///
    /// A failed fetch is logged and scored as an empty snapshot.
    pub async fn fetch_and_analyze(&self, student_id: Uuid) -> StudentRiskAnalysis {
        let window = self.settings.time_window_days;
        let fetched = self
            .source
            .fetch_student_metrics(student_id, &self.settings.grade_level, window)
            .await;

        match fetched {
            Ok(snapshot) => self.analyze_student(student_id, snapshot),
            Err(e) => {
                warn!(%student_id, error = %e, "metrics fetch failed; scoring empty snapshot");
                let snapshot = MetricsSnapshot::unavailable(window);
                let mut analysis = self.analyze_snapshot(student_id, &snapshot, Utc::now());
                analysis.data_degraded = true;
                self.record(analysis)
            }
        }
    }

    pub fn get_risk_profile(&self, student_id: &Uuid) -> Option<StudentRiskAnalysis> {
        self.store.get(student_id)
    }

    /// Analyze every student concurrently and summarize once all have finished.
    pub async fn monitor_cohort(&self, student_ids: &[Uuid]) -> CohortReport {
        let analyses = join_all(student_ids.iter().map(|id| self.fetch_and_analyze(*id))).await;
        let report = summarize_cohort(analyses);
        info!(
            students = report.total_students,
            at_risk = report.at_risk,
            critical = report.critical_cases.len(),
            degraded = report.degraded,
            average = report.average_risk_score,
            "cohort analysis complete"
        );
        report
    }

    fn record(&self, analysis: StudentRiskAnalysis) -> StudentRiskAnalysis {
        debug!(
            student_id = %analysis.student_id,
            score = analysis.risk_score,
            level = analysis.risk_level.as_str(),
            warnings = analysis.early_warnings.len(),
            "student analyzed"
        );
        self.store.put(analysis.clone());
        analysis
    }
}

pub fn summarize_cohort(analyses: Vec<StudentRiskAnalysis>) -> CohortReport {
    let total_students = analyses.len();
    let critical_cases: Vec<StudentRiskAnalysis> = analyses
        .iter()
        .filter(|a| a.risk_level == RiskLevel::Critical)
        .cloned()
        .collect();
    let needs_attention: Vec<StudentRiskAnalysis> = analyses
        .iter()
        .filter(|a| a.risk_level == RiskLevel::High)
        .cloned()
        .collect();
    let average_risk_score = if total_students == 0 {
        0.0
    } else {
        analyses.iter().map(|a| a.risk_score).sum::<f64>() / total_students as f64
    };

    CohortReport {
        total_students,
        at_risk: critical_cases.len() + needs_attention.len(),
        critical_cases,
        needs_attention,
        average_risk_score,
        degraded: analyses.iter().filter(|a| a.data_degraded).count(),
        analyses,
    }
}
