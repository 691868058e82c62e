use dashmap::DashMap;
use uuid::Uuid;

use crate::models::StudentRiskAnalysis;

/// Latest analysis per student. Writes overwrite; no history is kept.
pub trait ProfileStore: Send + Sync {
    fn get(&self, student_id: &Uuid) -> Option<StudentRiskAnalysis>;
    fn put(&self, analysis: StudentRiskAnalysis);
}

#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: DashMap<Uuid, StudentRiskAnalysis>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn get(&self, student_id: &Uuid) -> Option<StudentRiskAnalysis> {
        self.profiles.get(student_id).map(|entry| entry.value().clone())
    }

    fn put(&self, analysis: StudentRiskAnalysis) {
        self.profiles.insert(analysis.student_id, analysis);
    }
}
