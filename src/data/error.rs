//! Data errors

use thiserror::Error;

/// Errors for dataset construction, loading, and splitting
#[derive(Debug, Error)]
pub enum DataError {
    #[error("invalid split fractions: train={train}, val={val} (must be positive and sum to at most 1)")]
    InvalidFraction { train: f64, val: f64 },

    #[error("label {label} out of range for {num_classes} classes (example {index})")]
    LabelOutOfRange {
        label: usize,
        num_classes: usize,
        index: usize,
    },

    #[error("empty text after normalization (example {index})")]
    EmptyText { index: usize },

    #[error("dataset line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for data operations
pub type Result<T> = std::result::Result<T, DataError>;
