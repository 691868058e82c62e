use crate::config::{CategoryConfig, Direction, Factor, FactorConfig, RiskModel};
use crate::models::{
    Category, CategoryScore, FactorSeverity, MetricsSnapshot, RiskAnalysis, RiskFactor, RiskLevel,
};

/// Score a raw value against its bounds on a 0-100 scale.
///
/// Values at or below `critical` score 0, values between `critical` and
/// `threshold` rise linearly to 50, and values above `threshold` earn a bonus
/// proportional to how far past the threshold they are, capped at 100.
pub fn evaluate_factor(value: f64, threshold: f64, critical: f64) -> f64 {
    if threshold == critical {
        return if value > critical { 100.0 } else { 0.0 };
    }
    if value <= critical {
        0.0
    } else if value <= threshold {
        (value - critical) / (threshold - critical) * 50.0
    } else {
        50.0 + ((value - threshold) / threshold * 50.0).min(50.0)
    }
}

/// The quantity a factor reads from a snapshot, in the same units as its bounds.
///
/// A rate with nothing to divide by reads as its worst value, so a snapshot
/// with no recorded activity never looks healthy.
pub fn factor_value(factor: Factor, snapshot: &MetricsSnapshot) -> f64 {
    let attempts = snapshot.total_attempts;
    let sessions = snapshot.total_sessions;
    let value = match factor {
        Factor::Streak => snapshot.current_streak as f64,
        Factor::SessionFrequency => snapshot.session_frequency(),
        Factor::CompletionRate => snapshot.completion_rate,
        Factor::ActivityRecency => {
            if snapshot.time_window_days == 0 {
                0.0
            } else {
                let idle = snapshot.idle_days() as f64 / snapshot.time_window_days as f64;
                1.0 - idle.min(1.0)
            }
        }
        Factor::Accuracy => snapshot.average_accuracy,
        Factor::AccuracyMomentum if attempts == 0 => 0.0,
        Factor::AccuracyMomentum => snapshot.recent_accuracy_trend.clamp(-20.0, 20.0) + 20.0,
        Factor::FailureRate => snapshot.failure_rate(),
        Factor::TopicCompletionRate => snapshot.topic_completion_rate,
        Factor::ReviewCompletionRate => snapshot.review_completion_rate,
        Factor::HelpRequestRate => worst_if_unobserved(snapshot.help_requests, attempts),
        Factor::PaceRatio => {
            if snapshot.avg_seconds_per_question <= 0.0 {
                0.0
            } else {
                snapshot.expected_seconds_per_question / snapshot.avg_seconds_per_question
            }
        }
        Factor::InterruptionRate => worst_if_unobserved(snapshot.interruptions, sessions),
        Factor::HabitCompletionRate => snapshot.habit_completion_rate,
        Factor::FocusScore => snapshot.focus_score,
        Factor::FrustrationRate => worst_if_unobserved(snapshot.frustration_events, sessions),
        Factor::PeerInteractionIndex => snapshot.peer_interaction_index,
        Factor::CollaborationScore => snapshot.collaboration_score,
        Factor::HelpGivenRate => snapshot.help_given_rate,
    };
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `events / observed`, capped at 1; 1 when nothing was observed.
fn worst_if_unobserved(events: u32, observed: u32) -> f64 {
    if observed == 0 {
        1.0
    } else {
        (events as f64 / observed as f64).min(1.0)
    }
}

pub fn score_factor(config: &FactorConfig, snapshot: &MetricsSnapshot) -> f64 {
    let value = factor_value(config.factor, snapshot);
    match config.factor.direction() {
        Direction::HigherIsBetter => evaluate_factor(value, config.threshold, config.critical),
        Direction::LowerIsBetter => {
            evaluate_factor(1.0 - value, 1.0 - config.threshold, 1.0 - config.critical)
        }
    }
}

/// Unweighted mean of the category's factor scores; 0 when it has none.
pub fn score_category(snapshot: &MetricsSnapshot, config: &CategoryConfig) -> f64 {
    if config.factors.is_empty() {
        return 0.0;
    }
    let total: f64 = config
        .factors
        .iter()
        .map(|factor| score_factor(factor, snapshot))
        .sum();
    total / config.factors.len() as f64
}

pub struct RiskScorer {
    model: RiskModel,
}

impl RiskScorer {
    pub fn new(model: RiskModel) -> Self {
        Self { model }
    }

    pub fn score(&self, snapshot: &MetricsSnapshot) -> RiskAnalysis {
        let category_scores: Vec<CategoryScore> = Category::ALL
            .iter()
            .map(|category| {
                let (score, weight) = match self.model.category(*category) {
                    Some(config) => (score_category(snapshot, config), config.weight),
                    None => (0.0, 0.0),
                };
                CategoryScore {
                    category: *category,
                    score,
                    weight,
                    weighted_score: score * weight,
                }
            })
            .collect();

        let overall_score = category_scores
            .iter()
            .map(|c| c.weighted_score)
            .sum::<f64>()
            .clamp(0.0, 100.0);

        RiskAnalysis {
            overall_score,
            level: RiskLevel::from_score(overall_score),
            factors: extract_factors(&category_scores),
            category_scores,
        }
    }
}

fn extract_factors(category_scores: &[CategoryScore]) -> Vec<RiskFactor> {
    let mut factors: Vec<RiskFactor> = category_scores
        .iter()
        .filter(|c| c.score < 50.0)
        .map(|c| {
            let severity = if c.score < 25.0 {
                FactorSeverity::Critical
            } else {
                FactorSeverity::Warning
            };
            RiskFactor {
                category: c.category,
                score: c.score,
                severity,
                description: describe(c.category, severity).to_string(),
            }
        })
        .collect();
    factors.sort_by(|a, b| a.score.total_cmp(&b.score));
    factors
}

fn describe(category: Category, severity: FactorSeverity) -> &'static str {
    match (category, severity) {
        (Category::Engagement, FactorSeverity::Critical) => {
            "Student has largely stopped showing up; sessions and streaks have collapsed"
        }
        (Category::Engagement, FactorSeverity::Warning) => {
            "Study sessions are becoming irregular"
        }
        (Category::Performance, FactorSeverity::Critical) => {
            "Accuracy is far below expectations and failing attempts dominate"
        }
        (Category::Performance, FactorSeverity::Warning) => {
            "Accuracy is slipping below the expected level"
        }
        (Category::Learning, FactorSeverity::Critical) => {
            "Topic progress has stalled and reviews are not being completed"
        }
        (Category::Learning, FactorSeverity::Warning) => "Learning pace is behind schedule",
        (Category::Behavioral, FactorSeverity::Critical) => {
            "Frequent interruptions and frustration are undermining study sessions"
        }
        (Category::Behavioral, FactorSeverity::Warning) => {
            "Study habits and focus are inconsistent"
        }
        (Category::Social, FactorSeverity::Critical) => {
            "Student is isolated from peers and collaborative work"
        }
        (Category::Social, FactorSeverity::Warning) => "Peer interaction is limited",
    }
}
