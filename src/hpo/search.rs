//! Trial loop, best-trial selection, and the final refit

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cli::{log, LogLevel};
use crate::data::Dataset;
use crate::encoder::EncoderRegistry;
use crate::metrics;
use crate::train::{TrainConfig, TrainError, TrainableClassifier};

use super::error::{Result, SearchError};
use super::sampler::Sampler;

/// Terminal state of one trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialStatus {
    /// Training and evaluation finished; `score` is set
    Completed,
    /// The trial errored; `score` is `None`
    Failed,
}

/// Record of one evaluated configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialResult {
    /// Zero-based trial index
    pub id: usize,
    /// The configuration that was trained
    pub config: TrainConfig,
    /// Validation accuracy, when the trial completed
    pub score: Option<f64>,
    /// Whether the trial completed or failed
    pub status: TrialStatus,
}

/// Result of a full search: the winning configuration and every trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Configuration of the best completed trial
    pub best_config: TrainConfig,
    /// Validation accuracy of the best trial
    pub best_score: f64,
    /// All trials in execution order
    pub trials: Vec<TrialResult>,
}

/// Budgeted hyperparameter search.
///
/// Each trial trains a fresh classifier on the training split with the
/// sampled configuration and scores it by accuracy on the validation split.
/// A trial that errors (bad encoder identifier, shape mismatch) is recorded
/// as failed and the search moves on; only if every trial fails does the
/// search itself error.
pub struct HyperparameterSearch {
    trial_budget: usize,
    sampler: Box<dyn Sampler>,
    registry: Arc<EncoderRegistry>,
    log_level: LogLevel,
}

impl fmt::Debug for HyperparameterSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperparameterSearch")
            .field("trial_budget", &self.trial_budget)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl HyperparameterSearch {
    /// Create a search over `trial_budget` trials
    #[must_use]
    pub fn new(
        trial_budget: usize,
        sampler: Box<dyn Sampler>,
        registry: Arc<EncoderRegistry>,
    ) -> Self {
        Self {
            trial_budget,
            sampler,
            registry,
            log_level: LogLevel::Quiet,
        }
    }

    /// Set the progress verbosity (quiet by default)
    #[must_use]
    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    /// Run the search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidBudget`] for a zero budget and
    /// [`SearchError::NoTrials`] when every trial failed.
    pub fn run(&mut self, train: &Dataset, validation: &Dataset) -> Result<SearchOutcome> {
        if self.trial_budget == 0 {
            return Err(SearchError::InvalidBudget);
        }

        let mut trials: Vec<TrialResult> = Vec::with_capacity(self.trial_budget);
        for id in 0..self.trial_budget {
            let config = self.sampler.propose(id, &trials);
            log(
                self.log_level,
                LogLevel::Normal,
                &format!(
                    "trial {}/{}: lr={:.3e} epochs={} batch_size={}",
                    id + 1,
                    self.trial_budget,
                    config.lr,
                    config.epochs,
                    config.batch_size
                ),
            );

            match self.run_trial(&config, train, validation) {
                Ok(score) => {
                    log(
                        self.log_level,
                        LogLevel::Normal,
                        &format!("trial {} val accuracy: {score:.4}", id + 1),
                    );
                    trials.push(TrialResult {
                        id,
                        config,
                        score: Some(score),
                        status: TrialStatus::Completed,
                    });
                }
                Err(e) => {
                    eprintln!("trial {} failed: {e}", id + 1);
                    trials.push(TrialResult {
                        id,
                        config,
                        score: None,
                        status: TrialStatus::Failed,
                    });
                }
            }
        }

        let (best_config, best_score) = select_best(&trials).ok_or(SearchError::NoTrials)?;
        Ok(SearchOutcome {
            best_config,
            best_score,
            trials,
        })
    }

    /// Train one configuration and score it on the validation split.
    fn run_trial(
        &self,
        config: &TrainConfig,
        train: &Dataset,
        validation: &Dataset,
    ) -> std::result::Result<f64, TrainError> {
        let mut classifier = TrainableClassifier::new(
            config.clone(),
            train.num_classes(),
            Arc::clone(&self.registry),
        )?;
        let report = classifier.fit(train, validation)?;
        log(
            self.log_level,
            LogLevel::Verbose,
            &format!(
                "  ran {} epochs (stopped early: {})",
                report.epochs_run, report.stopped_early
            ),
        );

        let predicted = classifier.predict(validation.examples())?;
        Ok(metrics::accuracy(&predicted, &validation.labels()))
    }
}

/// Pick the completed trial with the highest score; earlier trials win ties.
fn select_best(trials: &[TrialResult]) -> Option<(TrainConfig, f64)> {
    let mut best: Option<(&TrialResult, f64)> = None;
    for trial in trials {
        if let Some(score) = trial.score {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((trial, score)),
            }
        }
    }
    best.map(|(trial, score)| (trial.config.clone(), score))
}

/// Retrain the winning configuration on train and validation combined.
///
/// Early stopping is disabled for the refit: the validation split is now
/// part of the training data, so there is nothing held out to monitor. The
/// epoch count the search selected already encodes how long to train.
///
/// # Errors
///
/// Propagates training errors from the refit.
pub fn refit_best(
    outcome: &SearchOutcome,
    train: &Dataset,
    validation: &Dataset,
    registry: Arc<EncoderRegistry>,
) -> Result<TrainableClassifier> {
    let config = outcome.best_config.clone().with_early_stopping(false);
    let combined = train.concat(validation);

    let mut classifier = TrainableClassifier::new(config, combined.num_classes(), registry)?;
    classifier.fit(&combined, &combined)?;
    Ok(classifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Example;
    use crate::hpo::{RandomSampler, SearchSpace};

    fn toy_dataset(n: usize) -> Dataset {
        let examples = (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    Example::new("acute respiratory failure septic shock", 1)
                } else {
                    Example::new("routine followup wellness visit", 0)
                }
            })
            .collect();
        Dataset::new(2, examples).unwrap()
    }

    fn toy_space() -> SearchSpace {
        SearchSpace::new("hashing-32")
            .with_lr_range(0.05, 0.5)
            .with_epoch_range(3, 4)
            .with_batch_sizes(vec![8])
            .with_early_stopping(false)
    }

    fn search(budget: usize, space: SearchSpace) -> HyperparameterSearch {
        let sampler = RandomSampler::new(space, 42).unwrap();
        HyperparameterSearch::new(budget, Box::new(sampler), Arc::new(EncoderRegistry::new()))
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let mut search = search(0, toy_space());
        let err = search.run(&toy_dataset(16), &toy_dataset(8)).unwrap_err();
        assert!(matches!(err, SearchError::InvalidBudget));
    }

    #[test]
    fn test_run_records_every_trial() {
        let mut search = search(3, toy_space());
        let outcome = search.run(&toy_dataset(32), &toy_dataset(8)).unwrap();

        assert_eq!(outcome.trials.len(), 3);
        for (i, trial) in outcome.trials.iter().enumerate() {
            assert_eq!(trial.id, i);
            assert_eq!(trial.status, TrialStatus::Completed);
            assert!(trial.score.is_some());
        }
        assert!((0.0..=1.0).contains(&outcome.best_score));

        // Separable data and healthy learning rates: the winner fits it.
        assert_eq!(outcome.best_score, 1.0);
    }

    #[test]
    fn test_best_score_matches_best_trial() {
        let mut search = search(4, toy_space());
        let outcome = search.run(&toy_dataset(32), &toy_dataset(8)).unwrap();

        let max = outcome
            .trials
            .iter()
            .filter_map(|t| t.score)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(outcome.best_score, max);
    }

    #[test]
    fn test_failing_trials_are_recorded_not_fatal() {
        // An unknown encoder makes every trial fail.
        let mut search = search(2, toy_space());
        let bad = TrainConfig::new("bert-base-uncased");
        struct Fixed(TrainConfig);
        impl Sampler for Fixed {
            fn propose(&mut self, _: usize, _: &[TrialResult]) -> TrainConfig {
                self.0.clone()
            }
        }
        search.sampler = Box::new(Fixed(bad));

        let err = search.run(&toy_dataset(16), &toy_dataset(8)).unwrap_err();
        assert!(matches!(err, SearchError::NoTrials));
    }

    #[test]
    fn test_one_failing_trial_does_not_abort_the_search() {
        struct Sequence(Vec<TrainConfig>, usize);
        impl Sampler for Sequence {
            fn propose(&mut self, _: usize, _: &[TrialResult]) -> TrainConfig {
                let config = self.0[self.1].clone();
                self.1 += 1;
                config
            }
        }

        let good = TrainConfig::new("hashing-32")
            .with_lr(0.2)
            .with_epochs(3)
            .with_batch_size(8)
            .with_early_stopping(false);
        let bad = TrainConfig::new("no-such-model").with_lr(0.1);

        let mut search = search(3, toy_space());
        search.sampler = Box::new(Sequence(vec![bad, good.clone(), good], 0));

        let outcome = search.run(&toy_dataset(16), &toy_dataset(8)).unwrap();
        assert_eq!(outcome.trials[0].status, TrialStatus::Failed);
        assert_eq!(outcome.trials[1].status, TrialStatus::Completed);
        assert_eq!(outcome.trials[2].status, TrialStatus::Completed);
        assert_eq!(outcome.best_config.model_id, "hashing-32");
    }

    #[test]
    fn test_select_best_picks_highest_score() {
        let trial = |id: usize, lr: f32, score: f64| TrialResult {
            id,
            config: TrainConfig::new("hashing-32").with_lr(lr),
            score: Some(score),
            status: TrialStatus::Completed,
        };
        let trials = vec![
            trial(0, 0.1, 0.7),
            trial(1, 0.2, 0.85),
            trial(2, 0.3, 0.6),
        ];

        let (best, score) = select_best(&trials).unwrap();
        assert_eq!(best.lr, 0.2);
        assert_eq!(score, 0.85);
    }

    #[test]
    fn test_select_best_prefers_first_on_tie() {
        let config_a = TrainConfig::new("hashing-32").with_lr(0.1);
        let config_b = TrainConfig::new("hashing-32").with_lr(0.2);
        let trials = vec![
            TrialResult {
                id: 0,
                config: config_a.clone(),
                score: Some(0.9),
                status: TrialStatus::Completed,
            },
            TrialResult {
                id: 1,
                config: config_b,
                score: Some(0.9),
                status: TrialStatus::Completed,
            },
        ];

        let (best, score) = select_best(&trials).unwrap();
        assert_eq!(best, config_a);
        assert_eq!(score, 0.9);
    }

    #[test]
    fn test_select_best_skips_failed_trials() {
        let trials = vec![
            TrialResult {
                id: 0,
                config: TrainConfig::new("hashing-32"),
                score: None,
                status: TrialStatus::Failed,
            },
            TrialResult {
                id: 1,
                config: TrainConfig::new("hashing-32").with_lr(0.3),
                score: Some(0.5),
                status: TrialStatus::Completed,
            },
        ];

        let (best, score) = select_best(&trials).unwrap();
        assert_eq!(best.lr, 0.3);
        assert_eq!(score, 0.5);
        assert!(select_best(&trials[..1]).is_none());
    }

    #[test]
    fn test_refit_best_trains_on_combined_data() {
        let train = toy_dataset(32);
        let val = toy_dataset(8);
        let mut search = search(2, toy_space());
        let outcome = search.run(&train, &val).unwrap();

        let classifier =
            refit_best(&outcome, &train, &val, Arc::new(EncoderRegistry::new())).unwrap();
        assert!(classifier.is_trained());
        assert!(!classifier.config().early_stopping);

        let predicted = classifier.predict(val.examples()).unwrap();
        assert_eq!(predicted.len(), val.len());
    }
}
