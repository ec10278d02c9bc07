//! Early stopping on validation loss

/// Halts training once validation loss stops improving.
///
/// Tracks the best loss seen; once `patience` consecutive epochs fail to
/// improve on it by at least `min_delta`, training should stop. With
/// `patience = 0` the very first epoch trips the counter, so training stops
/// after one epoch.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience: usize,
    min_delta: f32,
    best_loss: f32,
    epochs_without_improvement: usize,
}

impl EarlyStopping {
    /// Create an early-stopping monitor
    #[must_use]
    pub fn new(patience: usize, min_delta: f32) -> Self {
        Self {
            patience,
            min_delta,
            best_loss: f32::INFINITY,
            epochs_without_improvement: 0,
        }
    }

    /// Best validation loss observed so far
    #[must_use]
    pub fn best_loss(&self) -> f32 {
        self.best_loss
    }

    /// Record an epoch's validation loss; returns true when training
    /// should stop.
    #[must_use]
    pub fn should_stop(&mut self, loss: f32) -> bool {
        if loss < self.best_loss - self.min_delta {
            self.best_loss = loss;
            self.epochs_without_improvement = 0;
        } else {
            self.epochs_without_improvement += 1;
        }
        self.epochs_without_improvement >= self.patience
    }

    /// Reset internal state
    pub fn reset(&mut self) {
        self.best_loss = f32::INFINITY;
        self.epochs_without_improvement = 0;
    }
}
