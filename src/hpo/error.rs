//! Hyperparameter search error types

use thiserror::Error;

use crate::train::TrainError;

/// Errors from hyperparameter search
#[derive(Debug, Error)]
pub enum SearchError {
    /// The trial budget was zero
    #[error("trial budget must be at least 1")]
    InvalidBudget,

    /// Every trial failed, so there is no best configuration
    #[error("no trial completed successfully")]
    NoTrials,

    /// The search space is malformed
    #[error("invalid search space: {0}")]
    InvalidSpace(String),

    /// A training error outside any single trial (e.g. during refit)
    #[error("training failed: {0}")]
    Train(#[from] TrainError),
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
