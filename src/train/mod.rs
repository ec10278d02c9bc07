//! Classifier training loop
//!
//! This module provides:
//! - [`TrainConfig`], the immutable set of hyperparameters for one run
//! - [`TrainableClassifier`] with the fit/predict/evaluate-loss cycle
//! - [`EarlyStopping`] on validation loss
//! - [`AdamW`] for the head parameters
//! - [`FitReport`] summarizing a training run

mod adamw;
mod classifier;
mod config;
mod early_stopping;
mod error;
mod head;

pub use adamw::AdamW;
pub use classifier::{FitReport, TrainableClassifier};
pub use config::TrainConfig;
pub use early_stopping::EarlyStopping;
pub use error::{Result, TrainError};
pub use head::SoftmaxHead;
