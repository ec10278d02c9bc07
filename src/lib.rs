//! afinar — hyperparameter search and early-stopping fine-tuning for
//! clinical text classification.
//!
//! The crate is built from three composed pieces, leaves first:
//!
//! - [`data`]: labeled examples, text normalization, and a deterministic
//!   two-stage train/validation/test splitter.
//! - [`train`]: a [`TrainableClassifier`] wrapping an injected
//!   [`encoder::TextEncoder`] capability plus a softmax head, with a
//!   mini-batch training loop and validation-loss early stopping.
//! - [`hpo`]: a sequential hyperparameter search loop that builds a fresh
//!   classifier per trial and selects the configuration with the highest
//!   validation accuracy.
//!
//! # Example
//!
//! ```
//! use afinar::encoder::EncoderRegistry;
//! use afinar::{split, Dataset, Example, TrainConfig, TrainableClassifier};
//! use std::sync::Arc;
//!
//! let examples: Vec<Example> = (0..20)
//!     .map(|i| {
//!         if i % 2 == 0 {
//!             Example::new(format!("acute renal failure case {i}"), 1)
//!         } else {
//!             Example::new(format!("routine followup visit {i}"), 0)
//!         }
//!     })
//!     .collect();
//! let dataset = Dataset::new(2, examples)?;
//! let (train, val, _test) = split(&dataset, 0.8, 0.1, 42)?;
//!
//! let config = TrainConfig::new("hashing-64").with_lr(0.1).with_epochs(3);
//! let registry = Arc::new(EncoderRegistry::new());
//! let mut classifier = TrainableClassifier::new(config, 2, registry)?;
//! classifier.fit(&train, &val)?;
//!
//! let labels = classifier.predict(val.examples())?;
//! assert_eq!(labels.len(), val.len());
//! # Ok::<(), afinar::Error>(())
//! ```

pub mod cli;
pub mod data;
pub mod encoder;
pub mod hpo;
pub mod io;
pub mod metrics;
pub mod train;

pub use data::{split, Dataset, Example};
pub use hpo::{
    HyperparameterSearch, RandomSampler, Sampler, SearchOutcome, SearchSpace, TrialResult,
};
pub use train::{FitReport, TrainConfig, TrainableClassifier};

use thiserror::Error;

/// Crate-level error aggregating per-module errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Data(#[from] data::DataError),

    #[error(transparent)]
    Encoder(#[from] encoder::EncoderError),

    #[error(transparent)]
    Train(#[from] train::TrainError),

    #[error(transparent)]
    Search(#[from] hpo::SearchError),

    #[error(transparent)]
    Artifact(#[from] io::ArtifactError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for crate-level operations.
pub type Result<T> = std::result::Result<T, Error>;
