use std::path::PathBuf;

use thiserror::Error;

use crate::config::Factor;
use crate::models::Category;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("category weights sum to {sum}, expected 1.0")]
    WeightSum { sum: f64 },

    #[error("category {category:?} has negative weight {weight}")]
    NegativeWeight { category: Category, weight: f64 },

    #[error("category {0:?} is configured more than once")]
    DuplicateCategory(Category),

    #[error("category {0:?} is missing from the risk model")]
    MissingCategory(Category),

    #[error("factor {factor:?} has threshold == critical ({value})")]
    DegenerateBounds { factor: Factor, value: f64 },

    #[error("factor {factor:?} bounds are reversed (threshold {threshold}, critical {critical})")]
    Direction {
        factor: Factor,
        threshold: f64,
        critical: f64,
    },

    #[error("factor {factor:?} bound {value} is outside its valid range")]
    OutOfRange { factor: Factor, value: f64 },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
