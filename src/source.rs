use anyhow::anyhow;
use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::MetricsSnapshot;

/// Where aggregated student metrics come from.
///
/// Implementations may be slow or fail; the engine degrades a failed fetch to
/// an empty snapshot instead of aborting.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn fetch_student_metrics(
        &self,
        student_id: Uuid,
        grade_level: &str,
        time_window_days: u32,
    ) -> anyhow::Result<MetricsSnapshot>;
}

/// Metrics held in memory, keyed by student.
#[derive(Default)]
pub struct InMemoryMetricsSource {
    snapshots: DashMap<Uuid, MetricsSnapshot>,
}

impl InMemoryMetricsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, student_id: Uuid, snapshot: MetricsSnapshot) {
        self.snapshots.insert(student_id, snapshot);
    }
}

#[async_trait]
impl MetricsSource for InMemoryMetricsSource {
    async fn fetch_student_metrics(
        &self,
        student_id: Uuid,
        _grade_level: &str,
        time_window_days: u32,
    ) -> anyhow::Result<MetricsSnapshot> {
        let snapshot = self
            .snapshots
            .get(&student_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| anyhow!("no metrics recorded for student {student_id}"))?;
        if snapshot.time_window_days == 0 {
            return Ok(MetricsSnapshot {
                time_window_days,
                ..snapshot
            });
        }
        Ok(snapshot)
    }
}
