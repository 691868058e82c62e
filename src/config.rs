//! Risk model table and engine settings.
//!
//! The risk model is plain data: five weighted categories, each listing the
//! factors it averages and their `(threshold, critical)` bounds in natural
//! units. It is validated once before an engine accepts it.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::Category;

const WEIGHT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    HigherIsBetter,
    /// Ratio in `[0, 1]`; evaluated as `1 - value` against inverted bounds.
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Streak,
    SessionFrequency,
    CompletionRate,
    ActivityRecency,
    Accuracy,
    AccuracyMomentum,
    FailureRate,
    TopicCompletionRate,
    ReviewCompletionRate,
    HelpRequestRate,
    PaceRatio,
    InterruptionRate,
    HabitCompletionRate,
    FocusScore,
    FrustrationRate,
    PeerInteractionIndex,
    CollaborationScore,
    HelpGivenRate,
}

impl Factor {
    pub fn direction(&self) -> Direction {
        match self {
            Factor::FailureRate
            | Factor::HelpRequestRate
            | Factor::InterruptionRate
            | Factor::FrustrationRate => Direction::LowerIsBetter,
            _ => Direction::HigherIsBetter,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorConfig {
    pub factor: Factor,
    pub threshold: f64,
    pub critical: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub category: Category,
    pub weight: f64,
    #[serde(default)]
    pub factors: Vec<FactorConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskModel {
    pub categories: Vec<CategoryConfig>,
}

type FactorRow = (Factor, f64, f64);

const DEFAULT_TABLE: [(Category, f64, &[FactorRow]); 5] = [
    (
        Category::Engagement,
        0.25,
        &[
            (Factor::Streak, 3.0, 0.0),
            (Factor::SessionFrequency, 0.5, 0.2),
            (Factor::CompletionRate, 0.5, 0.25),
            (Factor::ActivityRecency, 0.5, 0.2),
        ],
    ),
    (
        Category::Performance,
        0.30,
        &[
            (Factor::Accuracy, 60.0, 40.0),
            (Factor::AccuracyMomentum, 15.0, 10.0),
            (Factor::FailureRate, 0.4, 0.7),
        ],
    ),
    (
        Category::Learning,
        0.20,
        &[
            (Factor::TopicCompletionRate, 0.5, 0.2),
            (Factor::ReviewCompletionRate, 0.5, 0.25),
            (Factor::HelpRequestRate, 0.3, 0.6),
            (Factor::PaceRatio, 0.6, 0.3),
        ],
    ),
    (
        Category::Behavioral,
        0.15,
        &[
            (Factor::InterruptionRate, 0.4, 0.7),
            (Factor::HabitCompletionRate, 0.5, 0.2),
            (Factor::FocusScore, 50.0, 25.0),
            (Factor::FrustrationRate, 0.3, 0.6),
        ],
    ),
    (
        Category::Social,
        0.10,
        &[
            (Factor::PeerInteractionIndex, 0.3, 0.1),
            (Factor::CollaborationScore, 40.0, 20.0),
            (Factor::HelpGivenRate, 0.1, 0.02),
        ],
    ),
];

impl Default for RiskModel {
    fn default() -> Self {
        let categories = DEFAULT_TABLE
            .iter()
            .map(|(category, weight, factors)| CategoryConfig {
                category: *category,
                weight: *weight,
                factors: factors
                    .iter()
                    .map(|(factor, threshold, critical)| FactorConfig {
                        factor: *factor,
                        threshold: *threshold,
                        critical: *critical,
                    })
                    .collect(),
            })
            .collect();
        Self { categories }
    }
}

impl RiskModel {
    /// Read a JSON model override and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: RiskModel =
            serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        model.validate()?;
        Ok(model)
    }

    pub fn category(&self, category: Category) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for config in &self.categories {
            if !seen.insert(config.category) {
                return Err(ConfigError::DuplicateCategory(config.category));
            }
            if config.weight < 0.0 {
                return Err(ConfigError::NegativeWeight {
                    category: config.category,
                    weight: config.weight,
                });
            }
            for factor in &config.factors {
                factor.validate()?;
            }
        }

        if let Some(missing) = Category::ALL.iter().find(|c| !seen.contains(*c)) {
            return Err(ConfigError::MissingCategory(*missing));
        }

        let sum: f64 = self.categories.iter().map(|c| c.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_EPSILON {
            return Err(ConfigError::WeightSum { sum });
        }

        Ok(())
    }
}

impl FactorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let factor = self.factor;
        if self.threshold == self.critical {
            return Err(ConfigError::DegenerateBounds {
                factor,
                value: self.threshold,
            });
        }

        let wrong_way = ConfigError::Direction {
            factor,
            threshold: self.threshold,
            critical: self.critical,
        };
        match factor.direction() {
            Direction::HigherIsBetter => {
                if self.threshold < self.critical {
                    return Err(wrong_way);
                }
                if self.threshold <= 0.0 {
                    return Err(ConfigError::OutOfRange {
                        factor,
                        value: self.threshold,
                    });
                }
            }
            Direction::LowerIsBetter => {
                if self.threshold > self.critical {
                    return Err(wrong_way);
                }
                if self.threshold < 0.0 {
                    return Err(ConfigError::OutOfRange {
                        factor,
                        value: self.threshold,
                    });
                }
                if self.critical > 1.0 {
                    return Err(ConfigError::OutOfRange {
                        factor,
                        value: self.critical,
                    });
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Length of the activity window requested from the metrics source.
    pub time_window_days: u32,
    pub grade_level: String,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            time_window_days: 30,
            grade_level: "all".to_string(),
            log: LogSettings::default(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl EngineSettings {
    /// Load from a JSON file if present; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_valid() {
        let model = RiskModel::default();
        model.validate().unwrap();
        assert_eq!(model.categories.len(), 5);
    }

    #[test]
    fn weights_must_sum_to_one() {
        let mut model = RiskModel::default();
        model.categories[0].weight = 0.5;
        assert!(matches!(
            model.validate(),
            Err(ConfigError::WeightSum { .. })
        ));
    }

    #[test]
    fn equal_bounds_are_rejected() {
        let mut model = RiskModel::default();
        model.categories[1].factors[0].critical = 60.0;
        assert!(matches!(
            model.validate(),
            Err(ConfigError::DegenerateBounds {
                factor: Factor::Accuracy,
                ..
            })
        ));
    }

    #[test]
    fn inverted_bounds_are_rejected_for_both_directions() {
        let mut model = RiskModel::default();
        model.categories[1].factors[0].threshold = 30.0;
        assert!(matches!(model.validate(), Err(ConfigError::Direction { .. })));

        let mut model = RiskModel::default();
        // failure rate: lower is better, so critical must sit above threshold
        model.categories[1].factors[2].threshold = 0.8;
        assert!(matches!(model.validate(), Err(ConfigError::Direction { .. })));
    }

    #[test]
    fn ratio_bounds_must_stay_inside_unit_interval() {
        let mut model = RiskModel::default();
        model.categories[3].factors[0].critical = 1.5;
        assert!(matches!(
            model.validate(),
            Err(ConfigError::OutOfRange {
                factor: Factor::InterruptionRate,
                ..
            })
        ));
    }

    #[test]
    fn missing_and_duplicate_categories_are_rejected() {
        let mut model = RiskModel::default();
        model.categories.pop();
        assert!(matches!(
            model.validate(),
            Err(ConfigError::MissingCategory(Category::Social))
        ));

        let mut model = RiskModel::default();
        model.categories[4].category = Category::Engagement;
        assert!(matches!(
            model.validate(),
            Err(ConfigError::DuplicateCategory(Category::Engagement))
        ));
    }

    #[test]
    fn empty_category_passes_validation() {
        let mut model = RiskModel::default();
        model.categories[4].factors.clear();
        model.validate().unwrap();
    }

    #[test]
    fn model_loads_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let json = serde_json::to_string(&RiskModel::default()).unwrap();
        std::fs::write(&path, json).unwrap();
        assert_eq!(RiskModel::load(&path).unwrap(), RiskModel::default());
    }

    #[test]
    fn settings_fall_back_to_defaults() {
        let settings = EngineSettings::load(Path::new("does-not-exist.json")).unwrap();
        assert_eq!(settings.time_window_days, 30);
        assert_eq!(settings.log.level, "info");
    }

    #[test]
    fn malformed_settings_are_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            EngineSettings::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
