// File: crates/bars-core/src/error.rs
// Summary: Error type shared by chart construction, data validation and config loading.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("no container registered for selector `{0}`")]
    MountNotFound(String),

    #[error("plot area must be positive, got {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },

    #[error("value for category `{category}` is not a finite number")]
    NonFiniteValue { category: String },

    #[error("series `{series}` has categories {found:?}, expected {expected:?}")]
    MismatchedCategories {
        series: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("invalid chart config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;
