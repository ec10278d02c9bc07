//! Search space definition and sampling distributions

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::train::TrainConfig;

use super::error::{Result, SearchError};

/// The hyperparameter domains a search draws from.
///
/// Learning rates are sampled log-uniformly so each order of magnitude gets
/// equal probability mass; epoch counts uniformly over an inclusive range;
/// batch sizes uniformly over an explicit candidate list. The encoder,
/// patience, and early-stopping flag are fixed across the search, so trials
/// differ only in the dimensions under study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    /// Encoder identifier shared by every trial
    pub model_id: String,
    /// Lower bound of the log-uniform learning-rate range
    pub lr_low: f32,
    /// Upper bound of the log-uniform learning-rate range
    pub lr_high: f32,
    /// Minimum epoch count (inclusive)
    pub epochs_low: usize,
    /// Maximum epoch count (inclusive)
    pub epochs_high: usize,
    /// Candidate mini-batch sizes
    pub batch_sizes: Vec<usize>,
    /// Early-stopping patience for every trial
    pub patience: usize,
    /// Whether trials train with early stopping
    pub early_stopping: bool,
}

impl SearchSpace {
    /// Create a search space with the standard fine-tuning ranges:
    /// lr log-uniform in [1e-6, 1e-4], epochs in 3..=5, batch size in
    /// {16, 32, 64}, patience 3, early stopping on.
    #[must_use]
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            lr_low: 1e-6,
            lr_high: 1e-4,
            epochs_low: 3,
            epochs_high: 5,
            batch_sizes: vec![16, 32, 64],
            patience: 3,
            early_stopping: true,
        }
    }

    /// Set the learning-rate range (log-uniform, inclusive)
    #[must_use]
    pub fn with_lr_range(mut self, low: f32, high: f32) -> Self {
        self.lr_low = low;
        self.lr_high = high;
        self
    }

    /// Set the epoch range (inclusive on both ends)
    #[must_use]
    pub fn with_epoch_range(mut self, low: usize, high: usize) -> Self {
        self.epochs_low = low;
        self.epochs_high = high;
        self
    }

    /// Set the candidate batch sizes
    #[must_use]
    pub fn with_batch_sizes(mut self, batch_sizes: Vec<usize>) -> Self {
        self.batch_sizes = batch_sizes;
        self
    }

    /// Set the early-stopping patience for all trials
    #[must_use]
    pub fn with_patience(mut self, patience: usize) -> Self {
        self.patience = patience;
        self
    }

    /// Enable or disable early stopping for all trials
    #[must_use]
    pub fn with_early_stopping(mut self, enabled: bool) -> Self {
        self.early_stopping = enabled;
        self
    }

    /// Validate the space.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidSpace`] for an empty or inverted
    /// learning-rate range, an inverted or zero epoch range, or a missing
    /// or zero batch size.
    pub fn validate(&self) -> Result<()> {
        if !(self.lr_low > 0.0 && self.lr_low.is_finite() && self.lr_high.is_finite()) {
            return Err(SearchError::InvalidSpace(format!(
                "learning-rate bounds must be positive and finite, got [{}, {}]",
                self.lr_low, self.lr_high
            )));
        }
        if self.lr_low > self.lr_high {
            return Err(SearchError::InvalidSpace(format!(
                "learning-rate range is inverted: [{}, {}]",
                self.lr_low, self.lr_high
            )));
        }
        if self.epochs_low == 0 || self.epochs_low > self.epochs_high {
            return Err(SearchError::InvalidSpace(format!(
                "epoch range must satisfy 1 <= low <= high, got [{}, {}]",
                self.epochs_low, self.epochs_high
            )));
        }
        if self.batch_sizes.is_empty() {
            return Err(SearchError::InvalidSpace(
                "batch size list is empty".to_string(),
            ));
        }
        if self.batch_sizes.contains(&0) {
            return Err(SearchError::InvalidSpace(
                "batch sizes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Draw one configuration from the space.
    ///
    /// # Panics
    ///
    /// Panics if the space is invalid (e.g. an inverted epoch range); call
    /// [`validate`](Self::validate) first when the space comes from
    /// untrusted input. [`RandomSampler::new`](super::RandomSampler::new)
    /// does this for you.
    #[must_use]
    pub fn sample<R: Rng>(&self, rng: &mut R) -> TrainConfig {
        debug_assert!(self.validate().is_ok(), "sample requires a valid space");

        let log_low = f64::from(self.lr_low).ln();
        let log_high = f64::from(self.lr_high).ln();
        let lr = (log_low + rng.random::<f64>() * (log_high - log_low)).exp() as f32;

        let epochs = rng.random_range(self.epochs_low..=self.epochs_high);
        let batch_size = self.batch_sizes[rng.random_range(0..self.batch_sizes.len())];

        TrainConfig::new(self.model_id.clone())
            .with_lr(lr)
            .with_epochs(epochs)
            .with_batch_size(batch_size)
            .with_patience(self.patience)
            .with_early_stopping(self.early_stopping)
    }
}
