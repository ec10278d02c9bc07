//! Proposal strategies for hyperparameter search

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::train::TrainConfig;

use super::error::Result;
use super::search::TrialResult;
use super::space::SearchSpace;

/// Proposes the configuration for the next trial.
///
/// The completed trial history is passed in so adaptive strategies (e.g.
/// model-based samplers that favor regions near good past trials) can use
/// it; independent strategies ignore it.
pub trait Sampler: Send {
    /// Propose a configuration for trial `trial_id`.
    fn propose(&mut self, trial_id: usize, history: &[TrialResult]) -> TrainConfig;
}

/// Independent random sampling from the search space.
///
/// Each proposal is an independent draw; past trials are ignored. For
/// low-dimensional spaces this is competitive with grid search at a
/// fraction of the budget (Bergstra & Bengio, 2012).
#[derive(Debug, Clone)]
pub struct RandomSampler {
    space: SearchSpace,
    rng: StdRng,
}

impl RandomSampler {
    /// Create a seeded random sampler.
    ///
    /// # Errors
    ///
    /// Returns [`super::SearchError::InvalidSpace`] if the space is
    /// malformed.
    pub fn new(space: SearchSpace, seed: u64) -> Result<Self> {
        space.validate()?;
        Ok(Self {
            space,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// The space this sampler draws from
    #[must_use]
    pub fn space(&self) -> &SearchSpace {
        &self.space
    }
}

impl Sampler for RandomSampler {
    fn propose(&mut self, _trial_id: usize, _history: &[TrialResult]) -> TrainConfig {
        self.space.sample(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_space() {
        let space = SearchSpace::new("hashing-64").with_batch_sizes(vec![]);
        assert!(RandomSampler::new(space, 42).is_err());
    }

    #[test]
    fn test_same_seed_same_proposals() {
        let space = SearchSpace::new("hashing-64");
        let mut a = RandomSampler::new(space.clone(), 42).unwrap();
        let mut b = RandomSampler::new(space, 42).unwrap();

        for trial_id in 0..10 {
            assert_eq!(a.propose(trial_id, &[]), b.propose(trial_id, &[]));
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let space = SearchSpace::new("hashing-64");
        let mut a = RandomSampler::new(space.clone(), 1).unwrap();
        let mut b = RandomSampler::new(space, 2).unwrap();

        let from_a: Vec<TrainConfig> = (0..5).map(|i| a.propose(i, &[])).collect();
        let from_b: Vec<TrainConfig> = (0..5).map(|i| b.propose(i, &[])).collect();
        assert_ne!(from_a, from_b);
    }
}
