use crate::models::{
    DropoutBand, EngagementOutlook, GradeBand, MetricsSnapshot, PredictedOutcome, Prediction,
    RiskAnalysis, TrendDirection, TrendSummary,
};

pub const GRADE_HORIZON_DAYS: u32 = 30;
pub const ENGAGEMENT_HORIZON_DAYS: u32 = 7;
pub const DROPOUT_HORIZON_DAYS: u32 = 90;

/// Grade, engagement, mastery and dropout projections, always in that order.
pub fn predict_outcomes(snapshot: &MetricsSnapshot, analysis: &RiskAnalysis) -> Vec<Prediction> {
    vec![
        predict_grade(snapshot, GRADE_HORIZON_DAYS),
        predict_engagement(snapshot, ENGAGEMENT_HORIZON_DAYS),
        predict_mastery(snapshot),
        predict_dropout(snapshot, analysis.overall_score, DROPOUT_HORIZON_DAYS),
    ]
}

pub fn predict_grade(snapshot: &MetricsSnapshot, horizon_days: u32) -> Prediction {
    let weeks = horizon_days as f64 / 7.0;
    let projected = snapshot.average_accuracy + snapshot.recent_accuracy_trend * weeks;
    let letter = grade_band(projected);
    let confidence = if snapshot.total_attempts > 50 { 0.85 } else { 0.6 };

    Prediction {
        outcome: PredictedOutcome::Grade {
            letter,
            projected_accuracy: projected.clamp(0.0, 100.0),
        },
        timeframe_days: horizon_days,
        confidence,
        basis: format!(
            "{:.1}% accuracy moving {:+.1} points/week over {} attempts",
            snapshot.average_accuracy, snapshot.recent_accuracy_trend, snapshot.total_attempts
        ),
    }
}

pub fn grade_band(projected: f64) -> GradeBand {
    if projected >= 90.0 {
        GradeBand::A
    } else if projected >= 80.0 {
        GradeBand::B
    } else if projected >= 70.0 {
        GradeBand::C
    } else if projected >= 60.0 {
        GradeBand::D
    } else {
        GradeBand::F
    }
}

pub fn predict_engagement(snapshot: &MetricsSnapshot, horizon_days: u32) -> Prediction {
    let streak = snapshot.current_streak;
    let frequency = snapshot.session_frequency();
    let level = if streak >= 7 && frequency >= 0.8 {
        EngagementOutlook::HighlyEngaged
    } else if streak >= 3 && frequency >= 0.5 {
        EngagementOutlook::Engaged
    } else if streak >= 1 && frequency >= 0.3 {
        EngagementOutlook::ModeratelyEngaged
    } else {
        EngagementOutlook::AtRisk
    };
    let confidence = if snapshot.total_sessions > 20 { 0.8 } else { 0.5 };

    Prediction {
        outcome: PredictedOutcome::Engagement { level },
        timeframe_days: horizon_days,
        confidence,
        basis: format!("{}-day streak, {:.2} sessions/day", streak, frequency),
    }
}

pub fn predict_mastery(snapshot: &MetricsSnapshot) -> Prediction {
    let remaining = snapshot.remaining_topics();
    if snapshot.topic_completion_rate == 0.0 || remaining == 0 {
        return Prediction {
            outcome: PredictedOutcome::Mastery { days: 0 },
            timeframe_days: 0,
            confidence: 0.3,
            basis: "not enough topic progress to project mastery".to_string(),
        };
    }

    let days_per_topic =
        snapshot.time_window_days as f64 / snapshot.topics_completed.max(1) as f64;
    let days = (remaining as f64 * days_per_topic).ceil() as u32;
    let confidence = if snapshot.topics_completed > 5 { 0.75 } else { 0.5 };

    Prediction {
        outcome: PredictedOutcome::Mastery { days },
        timeframe_days: days,
        confidence,
        basis: format!("{} topics remaining at {:.1} days per topic", remaining, days_per_topic),
    }
}

pub fn predict_dropout(
    snapshot: &MetricsSnapshot,
    overall_score: f64,
    horizon_days: u32,
) -> Prediction {
    let band = if overall_score < 30.0 {
        DropoutBand::High
    } else if overall_score < 50.0 {
        DropoutBand::Moderate
    } else if overall_score < 70.0 {
        DropoutBand::Low
    } else {
        DropoutBand::VeryLow
    };
    let confidence = if snapshot.total_sessions > 30 { 0.8 } else { 0.6 };

    Prediction {
        outcome: PredictedOutcome::DropoutRisk { band },
        timeframe_days: horizon_days,
        confidence,
        basis: format!("overall risk score {:.1}", overall_score),
    }
}

pub fn summarize_trends(snapshot: &MetricsSnapshot) -> TrendSummary {
    let accuracy = if snapshot.recent_accuracy_trend > 2.0 {
        TrendDirection::Improving
    } else if snapshot.recent_accuracy_trend < -2.0 {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    // A streak under a third of the student's best counts as a lapsed habit.
    let idle = snapshot.idle_days();
    let streak = snapshot.current_streak;
    let best = snapshot.longest_streak;
    let lapsed = best >= 7 && streak.saturating_mul(3) < best;
    let engagement = if streak >= 3 && idle <= 1 {
        TrendDirection::Improving
    } else if (streak == 0 && idle >= 3) || lapsed {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    let difficulty = if snapshot.difficulty_delta > 0.25 {
        TrendDirection::Improving
    } else if snapshot.difficulty_delta < -0.25 {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    TrendSummary {
        accuracy,
        engagement,
        difficulty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_projects_trend_over_horizon() {
        let snapshot = MetricsSnapshot {
            average_accuracy: 70.0,
            recent_accuracy_trend: 3.5,
            total_attempts: 80,
            ..MetricsSnapshot::default()
        };
        let prediction = predict_grade(&snapshot, 14);
        assert_eq!(
            prediction.outcome,
            PredictedOutcome::Grade {
                letter: GradeBand::C,
                projected_accuracy: 77.0,
            }
        );
        assert_eq!(prediction.confidence, 0.85);
        assert_eq!(prediction.timeframe_days, 14);
    }

    #[test]
    fn grade_bands_are_inclusive() {
        assert_eq!(grade_band(90.0), GradeBand::A);
        assert_eq!(grade_band(89.9), GradeBand::B);
        assert_eq!(grade_band(60.0), GradeBand::D);
        assert_eq!(grade_band(59.9), GradeBand::F);
        assert_eq!(grade_band(-15.0), GradeBand::F);
    }

    #[test]
    fn engagement_classification() {
        let mut snapshot = MetricsSnapshot {
            time_window_days: 10,
            current_streak: 7,
            total_sessions: 8,
            ..MetricsSnapshot::default()
        };
        let level = |s: &MetricsSnapshot| match predict_engagement(s, 7).outcome {
            PredictedOutcome::Engagement { level } => level,
            other => panic!("unexpected outcome {other:?}"),
        };
        assert_eq!(level(&snapshot), EngagementOutlook::HighlyEngaged);

        snapshot.total_sessions = 5;
        assert_eq!(level(&snapshot), EngagementOutlook::Engaged);

        snapshot.current_streak = 1;
        snapshot.total_sessions = 3;
        assert_eq!(level(&snapshot), EngagementOutlook::ModeratelyEngaged);

        snapshot.current_streak = 0;
        assert_eq!(level(&snapshot), EngagementOutlook::AtRisk);
        assert_eq!(predict_engagement(&snapshot, 7).confidence, 0.5);
    }

    #[test]
    fn mastery_without_progress_is_degenerate() {
        let snapshot = MetricsSnapshot {
            time_window_days: 30,
            topic_completion_rate: 0.0,
            topics_started: 5,
            topics_completed: 0,
            ..MetricsSnapshot::default()
        };
        let prediction = predict_mastery(&snapshot);
        assert_eq!(prediction.outcome, PredictedOutcome::Mastery { days: 0 });
        assert_eq!(prediction.confidence, 0.3);
    }

    #[test]
    fn mastery_projects_remaining_topics() {
        let snapshot = MetricsSnapshot {
            time_window_days: 30,
            topic_completion_rate: 0.4,
            topics_started: 11,
            topics_completed: 4,
            ..MetricsSnapshot::default()
        };
        // 7 remaining at 7.5 days each
        let prediction = predict_mastery(&snapshot);
        assert_eq!(prediction.outcome, PredictedOutcome::Mastery { days: 53 });
        assert_eq!(prediction.timeframe_days, 53);
        assert_eq!(prediction.confidence, 0.5);
    }

    #[test]
    fn dropout_bands_follow_overall_score() {
        let snapshot = MetricsSnapshot {
            total_sessions: 31,
            ..MetricsSnapshot::default()
        };
        let band = |score| match predict_dropout(&snapshot, score, 90).outcome {
            PredictedOutcome::DropoutRisk { band } => band,
            other => panic!("unexpected outcome {other:?}"),
        };
        assert_eq!(band(29.9), DropoutBand::High);
        assert_eq!(band(30.0), DropoutBand::Moderate);
        assert_eq!(band(50.0), DropoutBand::Low);
        assert_eq!(band(70.0), DropoutBand::VeryLow);
        assert_eq!(predict_dropout(&snapshot, 10.0, 90).confidence, 0.8);
    }

    #[test]
    fn trends_read_direction_from_snapshot() {
        let snapshot = MetricsSnapshot {
            recent_accuracy_trend: -6.0,
            current_streak: 0,
            days_since_last_activity: Some(5),
            difficulty_delta: 0.5,
            ..MetricsSnapshot::default()
        };
        assert_eq!(
            summarize_trends(&snapshot),
            TrendSummary {
                accuracy: TrendDirection::Declining,
                engagement: TrendDirection::Declining,
                difficulty: TrendDirection::Improving,
            }
        );
    }

    #[test]
    fn unknown_idle_days_mean_no_recent_activity() {
        let snapshot = MetricsSnapshot {
            time_window_days: 30,
            current_streak: 0,
            ..MetricsSnapshot::default()
        };
        assert_eq!(summarize_trends(&snapshot).engagement, TrendDirection::Declining);
    }

    #[test]
    fn engagement_trend_compares_streak_with_personal_best() {
        let mut snapshot = MetricsSnapshot {
            time_window_days: 30,
            current_streak: 2,
            longest_streak: 12,
            days_since_last_activity: Some(0),
            ..MetricsSnapshot::default()
        };
        assert_eq!(summarize_trends(&snapshot).engagement, TrendDirection::Declining);

        snapshot.current_streak = 4;
        assert_eq!(summarize_trends(&snapshot).engagement, TrendDirection::Improving);

        snapshot.current_streak = 2;
        snapshot.longest_streak = 5;
        assert_eq!(summarize_trends(&snapshot).engagement, TrendDirection::Stable);
    }
}
