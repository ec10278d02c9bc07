//! Hyperparameter search over training configurations
//!
//! Random search samples each trial independently from a [`SearchSpace`];
//! learning rates log-uniformly, epoch counts uniformly, batch sizes from a
//! candidate list. Random search covers low-dimensional spaces about as well
//! as grid search at a fraction of the trial budget (Bergstra & Bengio,
//! "Random Search for Hyper-Parameter Optimization", JMLR 2012).
//!
//! [`HyperparameterSearch`] drives the trial loop: train on the training
//! split, score by validation accuracy, keep every [`TrialResult`], and
//! select the best. [`refit_best`] then retrains the winner on train and
//! validation combined before final test evaluation. The [`Sampler`] trait
//! is the seam for adaptive strategies that condition on trial history.

mod error;
mod sampler;
mod search;
mod space;

pub use error::{Result, SearchError};
pub use sampler::{RandomSampler, Sampler};
pub use search::{refit_best, HyperparameterSearch, SearchOutcome, TrialResult, TrialStatus};
pub use space::SearchSpace;
