use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregated activity counters for one student over one time window.
///
/// Absent fields deserialize as zero so partially populated records still
/// score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsSnapshot {
    pub time_window_days: u32,

    // engagement
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_sessions: u32,
    pub completion_rate: f64,
    /// `None` when no activity was observed inside the window.
    pub days_since_last_activity: Option<u32>,

    // performance
    pub average_accuracy: f64,
    pub recent_accuracy_trend: f64,
    pub total_attempts: u32,
    pub correct_attempts: u32,
    pub difficulty_delta: f64,

    // learning
    pub topics_started: u32,
    pub topics_completed: u32,
    pub topic_completion_rate: f64,
    pub review_completion_rate: f64,
    pub reviews_due: u32,
    pub help_requests: u32,
    pub avg_seconds_per_question: f64,
    pub expected_seconds_per_question: f64,

    // behavioral
    pub interruptions: u32,
    pub habit_completion_rate: f64,
    pub focus_score: f64,
    pub frustration_events: u32,

    // social
    pub peer_interaction_index: f64,
    pub collaboration_score: f64,
    pub help_given_rate: f64,
}

impl MetricsSnapshot {
    /// Stand-in used when the metrics source cannot produce a record: nothing
    /// observed for the whole window.
    pub fn unavailable(time_window_days: u32) -> Self {
        Self {
            time_window_days,
            ..Self::default()
        }
    }

    /// Days without activity, counting the whole window when none was seen.
    pub fn idle_days(&self) -> u32 {
        self.days_since_last_activity.unwrap_or(self.time_window_days)
    }

    pub fn session_frequency(&self) -> f64 {
        if self.time_window_days == 0 {
            0.0
        } else {
            self.total_sessions as f64 / self.time_window_days as f64
        }
    }

    pub fn failure_rate(&self) -> f64 {
        1.0 - self.correct_attempts as f64 / self.total_attempts.max(1) as f64
    }

    pub fn remaining_topics(&self) -> u32 {
        self.topics_started.saturating_sub(self.topics_completed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub cohort: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Engagement,
    Performance,
    Learning,
    Behavioral,
    Social,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Engagement,
        Category::Performance,
        Category::Learning,
        Category::Behavioral,
        Category::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Engagement => "engagement",
            Category::Performance => "performance",
            Category::Learning => "learning",
            Category::Behavioral => "behavioral",
            Category::Social => "social",
        }
    }
}

/// Ordered from most to least risky, so `Critical < Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Critical,
    High,
    Moderate,
    Low,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            RiskLevel::Low
        } else if score >= 60.0 {
            RiskLevel::Moderate
        } else if score >= 40.0 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Critical => "critical",
            RiskLevel::High => "high",
            RiskLevel::Moderate => "moderate",
            RiskLevel::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorSeverity {
    Critical,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: f64,
    pub weight: f64,
    pub weighted_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub category: Category,
    pub score: f64,
    pub severity: FactorSeverity,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub overall_score: f64,
    pub level: RiskLevel,
    pub category_scores: Vec<CategoryScore>,
    pub factors: Vec<RiskFactor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradeBand {
    A,
    B,
    C,
    D,
    F,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngagementOutlook {
    HighlyEngaged,
    Engaged,
    ModeratelyEngaged,
    AtRisk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DropoutBand {
    High,
    Moderate,
    Low,
    VeryLow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PredictedOutcome {
    Grade {
        letter: GradeBand,
        projected_accuracy: f64,
    },
    Engagement {
        level: EngagementOutlook,
    },
    Mastery {
        days: u32,
    },
    DropoutRisk {
        band: DropoutBand,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(flatten)]
    pub outcome: PredictedOutcome,
    pub timeframe_days: u32,
    pub confidence: f64,
    pub basis: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    /// Days from analysis until the strategy should be in place.
    pub fn offset_days(&self) -> i64 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Medium => 3,
            Priority::Low => 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionStrategy {
    pub priority: Priority,
    pub title: String,
    pub actions: Vec<String>,
    pub triggered_by_category: Category,
    pub trigger_score: f64,
    pub implement_by: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    StreakBroken,
    AccuracyDecline,
    ReviewBacklog,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::StreakBroken => "streak_broken",
            WarningKind::AccuracyDecline => "accuracy_decline",
            WarningKind::ReviewBacklog => "review_backlog",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyWarning {
    pub kind: WarningKind,
    pub severity: WarningSeverity,
    pub message: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub accuracy: TrendDirection,
    pub engagement: TrendDirection,
    pub difficulty: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRiskAnalysis {
    pub student_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub time_window_days: u32,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub predictions: Vec<Prediction>,
    pub risk_factors: Vec<RiskFactor>,
    pub interventions: Vec<InterventionStrategy>,
    pub confidence: f64,
    pub trends: TrendSummary,
    pub early_warnings: Vec<EarlyWarning>,
    /// Set when the metrics source failed and a zeroed snapshot was scored.
    pub data_degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortReport {
    pub total_students: usize,
    pub at_risk: usize,
    pub critical_cases: Vec<StudentRiskAnalysis>,
    pub needs_attention: Vec<StudentRiskAnalysis>,
    pub average_risk_score: f64,
    pub degraded: usize,
    pub analyses: Vec<StudentRiskAnalysis>,
}
