//! Student risk scoring and early-intervention engine.
//!
//! - [`risk`]: factor evaluation, category and overall scoring
//! - [`predict`]: grade, engagement, mastery and dropout projections
//! - [`interventions`]: strategy selection for weak categories
//! - [`warnings`]: rule-based early warnings
//! - [`engine`]: per-student analysis and cohort monitoring
//! - [`db`]: Postgres-backed metrics source and ingest

pub mod config;
pub mod confidence;
pub mod db;
pub mod engine;
pub mod error;
pub mod interventions;
pub mod logging;
pub mod models;
pub mod predict;
pub mod report;
pub mod risk;
pub mod source;
pub mod store;
pub mod warnings;

pub use config::{EngineSettings, RiskModel};
pub use engine::RiskEngine;
pub use error::ConfigError;
pub use models::{CohortReport, MetricsSnapshot, RiskLevel, StudentRiskAnalysis};
pub use source::{InMemoryMetricsSource, MetricsSource};
pub use store::{InMemoryProfileStore, ProfileStore};
