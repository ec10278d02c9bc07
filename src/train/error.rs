//! Training errors

use crate::encoder::EncoderError;
use thiserror::Error;

/// Errors for classifier construction and training
#[derive(Debug, Error)]
pub enum TrainError {
    /// predict/evaluate_loss called before fit
    #[error("model has not been trained: call fit before predict or evaluate_loss")]
    Untrained,

    #[error("invalid training configuration: {0}")]
    InvalidConfig(String),

    /// An example's label does not fit the classifier's label space
    #[error("label {label} out of range for {num_classes} classes")]
    LabelOutOfRange { label: usize, num_classes: usize },

    #[error(transparent)]
    Encoder(#[from] EncoderError),
}

/// Result type for training operations
pub type Result<T> = std::result::Result<T, TrainError>;
