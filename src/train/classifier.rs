//! Trainable classifier: the fit / predict / evaluate-loss cycle

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::{Dataset, Example};
use crate::encoder::{check_batch_shape, EncoderRegistry, TextEncoder};

use super::adamw::AdamW;
use super::config::TrainConfig;
use super::early_stopping::EarlyStopping;
use super::error::{Result, TrainError};
use super::head::SoftmaxHead;

/// Encoder, head, and optimizer for one trained model
struct ModelState {
    encoder: Box<dyn TextEncoder>,
    head: SoftmaxHead,
    optimizer: AdamW,
}

/// Summary of one `fit` call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FitReport {
    /// Epochs actually run (≤ the configured epoch count)
    pub epochs_run: usize,
    /// Mean training loss per epoch
    pub train_losses: Vec<f32>,
    /// Validation loss per epoch (empty when early stopping is off)
    pub val_losses: Vec<f32>,
    /// Lowest validation loss observed
    pub best_val_loss: Option<f32>,
    /// Whether the patience mechanism halted training
    pub stopped_early: bool,
}

/// A text classifier built from an injected encoder capability and a
/// softmax head.
///
/// The encoder is resolved lazily from the configuration's `model_id` on the
/// first `fit`, so constructing a classifier is cheap and a bad identifier
/// surfaces as a per-trial failure rather than at construction.
pub struct TrainableClassifier {
    config: TrainConfig,
    num_classes: usize,
    registry: Arc<EncoderRegistry>,
    state: Option<ModelState>,
}

impl fmt::Debug for TrainableClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainableClassifier")
            .field("config", &self.config)
            .field("num_classes", &self.num_classes)
            .field("trained", &self.state.is_some())
            .finish()
    }
}

impl TrainableClassifier {
    /// Create an untrained classifier.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::InvalidConfig`] for an invalid configuration.
    pub fn new(
        config: TrainConfig,
        num_classes: usize,
        registry: Arc<EncoderRegistry>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            num_classes,
            registry,
            state: None,
        })
    }

    /// The configuration this classifier was built with
    #[must_use]
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Number of output classes
    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Whether `fit` has produced model state
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    /// Trained head, if any
    pub(crate) fn head(&self) -> Option<&SoftmaxHead> {
        self.state.as_ref().map(|s| &s.head)
    }

    /// Rebuild a trained classifier from saved parts (artifact loading).
    pub(crate) fn restore(
        config: TrainConfig,
        num_classes: usize,
        registry: Arc<EncoderRegistry>,
        head: SoftmaxHead,
    ) -> Result<Self> {
        config.validate()?;
        let encoder = registry.load(&config.model_id)?;
        if encoder.dim() != head.dim() || head.num_classes() != num_classes {
            return Err(TrainError::InvalidConfig(format!(
                "saved head shape {}x{} does not match encoder '{}' (dim {}) with {} classes",
                head.num_classes(),
                head.dim(),
                config.model_id,
                encoder.dim(),
                num_classes
            )));
        }
        let optimizer = AdamW::default_params(config.lr);
        Ok(Self {
            config,
            num_classes,
            registry,
            state: Some(ModelState {
                encoder,
                head,
                optimizer,
            }),
        })
    }

    /// Train on `train`, monitoring `validation` for early stopping.
    ///
    /// Runs the configured number of epochs over mini-batches of
    /// `batch_size` drawn in original order. With early stopping enabled,
    /// validation loss is computed after every epoch and training halts
    /// once `patience` consecutive epochs fail to improve on the best.
    ///
    /// By default each call starts from freshly reset weights and optimizer
    /// state. With `warm_start` enabled, a second `fit` instead continues
    /// from the current weights — deliberate warm starting, but a footgun if
    /// enabled by accident, since results then depend on fit-call history.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::encoder::EncoderError::Load`] if the configured
    /// `model_id` cannot be resolved, and shape errors from a misbehaving
    /// encoder.
    pub fn fit(&mut self, train: &Dataset, validation: &Dataset) -> Result<FitReport> {
        if train.num_classes() != self.num_classes
            || validation.num_classes() != self.num_classes
        {
            return Err(TrainError::InvalidConfig(format!(
                "dataset label space ({}/{} classes) does not match classifier ({} classes)",
                train.num_classes(),
                validation.num_classes(),
                self.num_classes
            )));
        }

        let rebuild = match &self.state {
            Some(state) => !self.config.warm_start || state.encoder.id() != self.config.model_id,
            None => true,
        };
        if rebuild {
            let encoder = self.registry.load(&self.config.model_id)?;
            let head = SoftmaxHead::new(encoder.dim(), self.num_classes);
            let optimizer = AdamW::default_params(self.config.lr);
            self.state = Some(ModelState {
                encoder,
                head,
                optimizer,
            });
        }

        let mut stopper = EarlyStopping::new(self.config.patience, 0.0);
        let mut report = FitReport::default();

        for epoch in 0..self.config.epochs {
            let train_loss = self.train_epoch(train)?;
            report.train_losses.push(train_loss);
            report.epochs_run = epoch + 1;

            if self.config.early_stopping {
                let val_loss = self.evaluate_loss(validation.examples())?;
                report.val_losses.push(val_loss);

                if stopper.should_stop(val_loss) {
                    eprintln!(
                        "early stopping after {} epochs (best val loss: {:.4})",
                        epoch + 1,
                        stopper.best_loss()
                    );
                    report.stopped_early = true;
                    break;
                }
            }
        }

        report.best_val_loss = report
            .val_losses
            .iter()
            .copied()
            .fold(None, |best: Option<f32>, loss| {
                Some(best.map_or(loss, |b| b.min(loss)))
            });
        Ok(report)
    }

    /// One pass over the training data; returns the mean per-batch loss.
    fn train_epoch(&mut self, train: &Dataset) -> Result<f32> {
        let batch_size = self.config.batch_size;
        let num_classes = self.num_classes;
        let state = self.state.as_mut().ok_or(TrainError::Untrained)?;

        let mut total_loss = 0.0f32;
        let mut num_batches = 0usize;

        for chunk in train.examples().chunks(batch_size) {
            let features = encode_texts(state.encoder.as_ref(), chunk)?;
            let labels = checked_labels(chunk, num_classes)?;
            let (loss, grad) = state.head.batch_gradient(&features, &labels);
            state.optimizer.step(state.head.params_mut(), &grad);
            total_loss += loss;
            num_batches += 1;
        }

        Ok(if num_batches > 0 {
            total_loss / num_batches as f32
        } else {
            0.0
        })
    }

    /// Predict labels for a sequence of examples.
    ///
    /// Inference runs in fixed-size batches of `batch_size`; results are
    /// concatenated in input order. Does not mutate model state.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::Untrained`] before `fit`.
    pub fn predict(&self, examples: &[Example]) -> Result<Vec<usize>> {
        let state = self.state.as_ref().ok_or(TrainError::Untrained)?;

        let mut predictions = Vec::with_capacity(examples.len());
        for chunk in examples.chunks(self.config.batch_size) {
            let features = encode_texts(state.encoder.as_ref(), chunk)?;
            predictions.extend(features.iter().map(|f| state.head.predict(f)));
        }
        Ok(predictions)
    }

    /// Mean per-batch cross-entropy loss over a sequence of examples.
    ///
    /// This is the sum of per-batch mean losses divided by the number of
    /// batches, so a short trailing batch weighs the same as a full one.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::Untrained`] before `fit`, and
    /// [`TrainError::LabelOutOfRange`] for an example whose label does not
    /// fit the classifier's label space.
    pub fn evaluate_loss(&self, examples: &[Example]) -> Result<f32> {
        let state = self.state.as_ref().ok_or(TrainError::Untrained)?;

        let mut total_loss = 0.0f32;
        let mut num_batches = 0usize;
        for chunk in examples.chunks(self.config.batch_size) {
            let features = encode_texts(state.encoder.as_ref(), chunk)?;
            let labels = checked_labels(chunk, self.num_classes)?;
            total_loss += state.head.batch_loss(&features, &labels);
            num_batches += 1;
        }

        Ok(if num_batches > 0 {
            total_loss / num_batches as f32
        } else {
            0.0
        })
    }
}

/// Encode one mini-batch of texts
fn encode_texts(encoder: &dyn TextEncoder, chunk: &[Example]) -> Result<Vec<Vec<f32>>> {
    let texts: Vec<&str> = chunk.iter().map(|e| e.text.as_str()).collect();
    let features = encoder.encode(&texts)?;
    check_batch_shape(encoder, &features)?;
    Ok(features)
}

/// Collect a mini-batch's labels, rejecting any outside the label space.
///
/// `predict`/`evaluate_loss` take bare example slices that never went
/// through [`Dataset`] validation, so labels are re-checked here before any
/// head indexing.
fn checked_labels(chunk: &[Example], num_classes: usize) -> Result<Vec<usize>> {
    chunk
        .iter()
        .map(|e| {
            if e.label < num_classes {
                Ok(e.label)
            } else {
                Err(TrainError::LabelOutOfRange {
                    label: e.label,
                    num_classes,
                })
            }
        })
        .collect()
}
