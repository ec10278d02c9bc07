//! Training configuration (the hyperparameters under search)

use serde::{Deserialize, Serialize};

use super::error::{Result, TrainError};

/// Hyperparameters for one training run.
///
/// A configuration is taken by value at classifier construction and never
/// mutated afterwards, so a run cannot change its own hyperparameters
/// midway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Encoder model identifier, resolved lazily at fit time
    pub model_id: String,
    /// Learning rate
    pub lr: f32,
    /// Number of training epochs
    pub epochs: usize,
    /// Mini-batch size for training and inference
    pub batch_size: usize,
    /// Consecutive non-improving epochs tolerated before stopping
    pub patience: usize,
    /// Whether to monitor validation loss and stop early
    pub early_stopping: bool,
    /// Continue from existing weights instead of resetting on `fit`.
    /// Off by default: repeated fits start from scratch.
    pub warm_start: bool,
}

impl TrainConfig {
    /// Create a configuration for the given encoder with default
    /// hyperparameters (lr 2e-5, 3 epochs, batch size 32, patience 3,
    /// early stopping on).
    #[must_use]
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            lr: 2e-5,
            epochs: 3,
            batch_size: 32,
            patience: 3,
            early_stopping: true,
            warm_start: false,
        }
    }

    /// Set the learning rate
    #[must_use]
    pub fn with_lr(mut self, lr: f32) -> Self {
        self.lr = lr;
        self
    }

    /// Set the epoch count
    #[must_use]
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set the mini-batch size
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the early-stopping patience
    #[must_use]
    pub fn with_patience(mut self, patience: usize) -> Self {
        self.patience = patience;
        self
    }

    /// Enable or disable early stopping
    #[must_use]
    pub fn with_early_stopping(mut self, enabled: bool) -> Self {
        self.early_stopping = enabled;
        self
    }

    /// Enable or disable warm starting
    #[must_use]
    pub fn with_warm_start(mut self, enabled: bool) -> Self {
        self.warm_start = enabled;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::InvalidConfig`] for a non-positive or
    /// non-finite learning rate, zero epochs, or zero batch size.
    pub fn validate(&self) -> Result<()> {
        if !(self.lr > 0.0 && self.lr.is_finite()) {
            return Err(TrainError::InvalidConfig(format!(
                "learning rate must be positive and finite, got {}",
                self.lr
            )));
        }
        if self.epochs == 0 {
            return Err(TrainError::InvalidConfig(
                "epoch count must be at least 1".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(TrainError::InvalidConfig(
                "batch size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self::new("hashing-256")
    }
}
