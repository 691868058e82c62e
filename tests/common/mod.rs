#![allow(dead_code)]

use student_risk_engine::MetricsSnapshot;

/// Inactive student with collapsing accuracy.
pub fn critical_student() -> MetricsSnapshot {
    MetricsSnapshot {
        time_window_days: 30,
        current_streak: 0,
        longest_streak: 6,
        total_sessions: 5,
        completion_rate: 0.3,
        days_since_last_activity: Some(18),
        average_accuracy: 42.0,
        recent_accuracy_trend: -14.0,
        total_attempts: 60,
        correct_attempts: 25,
        difficulty_delta: -0.5,
        topics_started: 6,
        topics_completed: 1,
        topic_completion_rate: 0.15,
        review_completion_rate: 0.2,
        reviews_due: 17,
        help_requests: 22,
        avg_seconds_per_question: 95.0,
        expected_seconds_per_question: 45.0,
        interruptions: 4,
        habit_completion_rate: 0.1,
        focus_score: 30.0,
        frustration_events: 3,
        peer_interaction_index: 0.05,
        collaboration_score: 15.0,
        help_given_rate: 0.0,
        ..MetricsSnapshot::default()
    }
}

/// Slipping just below expectations across the board.
pub fn high_risk_student() -> MetricsSnapshot {
    MetricsSnapshot {
        time_window_days: 30,
        current_streak: 2,
        longest_streak: 9,
        total_sessions: 11,
        completion_rate: 0.45,
        days_since_last_activity: Some(2),
        average_accuracy: 58.0,
        recent_accuracy_trend: -4.0,
        total_attempts: 140,
        correct_attempts: 80,
        topics_started: 8,
        topics_completed: 3,
        topic_completion_rate: 0.38,
        review_completion_rate: 0.45,
        reviews_due: 9,
        help_requests: 30,
        avg_seconds_per_question: 70.0,
        expected_seconds_per_question: 45.0,
        interruptions: 5,
        habit_completion_rate: 0.4,
        focus_score: 45.0,
        frustration_events: 3,
        peer_interaction_index: 0.2,
        collaboration_score: 35.0,
        help_given_rate: 0.05,
        ..MetricsSnapshot::default()
    }
}

/// Comfortably above every threshold.
pub fn thriving_student() -> MetricsSnapshot {
    MetricsSnapshot {
        time_window_days: 30,
        current_streak: 30,
        longest_streak: 30,
        total_sessions: 45,
        completion_rate: 0.95,
        days_since_last_activity: Some(0),
        average_accuracy: 95.0,
        recent_accuracy_trend: 4.0,
        total_attempts: 400,
        correct_attempts: 380,
        difficulty_delta: 0.3,
        topics_started: 12,
        topics_completed: 11,
        topic_completion_rate: 0.9,
        review_completion_rate: 0.95,
        reviews_due: 2,
        help_requests: 8,
        avg_seconds_per_question: 40.0,
        expected_seconds_per_question: 45.0,
        interruptions: 2,
        habit_completion_rate: 0.9,
        focus_score: 90.0,
        frustration_events: 1,
        peer_interaction_index: 0.8,
        collaboration_score: 85.0,
        help_given_rate: 0.4,
        ..MetricsSnapshot::default()
    }
}
