use crate::models::MetricsSnapshot;

const MAX_CONFIDENCE: f64 = 0.95;

/// Confidence in an analysis from how much history backs it, capped below 1.
pub fn estimate_confidence(snapshot: &MetricsSnapshot) -> f64 {
    let mut confidence = 0.5;

    if snapshot.total_sessions > 50 {
        confidence += 0.2;
    } else if snapshot.total_sessions > 20 {
        confidence += 0.1;
    }

    if snapshot.total_attempts > 200 {
        confidence += 0.15;
    } else if snapshot.total_attempts > 100 {
        confidence += 0.1;
    }

    if snapshot.time_window_days >= 30 {
        confidence += 0.1;
    }

    f64::min(confidence, MAX_CONFIDENCE)
}
