//! Deterministic two-stage train/validation/test split

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::{DataError, Result};
use super::example::Dataset;

/// Partition a dataset into train/validation/test subsets.
///
/// `train_frac` and `val_frac` are fractions of the whole dataset; the test
/// subset receives the remainder. The split is two-stage: the test fraction
/// is carved off first, then the remainder is divided into train and
/// validation. A seeded permutation makes repeated calls with the same
/// dataset, fractions, and seed produce identical membership, which is what
/// makes hyperparameter comparisons reproducible.
///
/// # Errors
///
/// Returns [`DataError::InvalidFraction`] if either fraction is non-positive
/// or the two sum to more than 1.
///
/// # Example
///
/// ```
/// use afinar::data::{split, Dataset, Example};
///
/// let examples = (0..10).map(|i| Example::new(format!("note {i}"), i % 2)).collect();
/// let dataset = Dataset::new(2, examples)?;
/// let (train, val, test) = split(&dataset, 0.8, 0.1, 42)?;
/// assert_eq!(train.len() + val.len() + test.len(), 10);
/// # Ok::<(), afinar::data::DataError>(())
/// ```
pub fn split(
    dataset: &Dataset,
    train_frac: f64,
    val_frac: f64,
    seed: u64,
) -> Result<(Dataset, Dataset, Dataset)> {
    if train_frac <= 0.0 || val_frac <= 0.0 || train_frac + val_frac > 1.0 {
        return Err(DataError::InvalidFraction {
            train: train_frac,
            val: val_frac,
        });
    }

    let n = dataset.len();
    let mut indices: Vec<usize> = (0..n).collect();

    // Seeded Fisher-Yates permutation
    let mut rng = StdRng::seed_from_u64(seed);
    for i in (1..n).rev() {
        let j = rng.random_range(0..=i);
        indices.swap(i, j);
    }

    // Stage 1: carve the test fraction off the tail of the permutation.
    let remainder = ((train_frac + val_frac) * n as f64).round() as usize;
    let remainder = remainder.min(n);

    // Stage 2: split the remainder into train and validation.
    let train_len = ((train_frac / (train_frac + val_frac)) * remainder as f64).round() as usize;
    let train_len = train_len.min(remainder);

    let gather = |range: &[usize]| {
        range
            .iter()
            .map(|&i| dataset.examples()[i].clone())
            .collect::<Vec<_>>()
    };

    let train = Dataset::from_parts(dataset.num_classes(), gather(&indices[..train_len]));
    let val = Dataset::from_parts(
        dataset.num_classes(),
        gather(&indices[train_len..remainder]),
    );
    let test = Dataset::from_parts(dataset.num_classes(), gather(&indices[remainder..]));

    Ok((train, val, test))
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::data::Example;
    use proptest::prelude::*;
    use std::collections::HashSet;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_split_deterministic_for_all_seeds(seed in any::<u64>(), n in 3usize..200) {
            let examples: Vec<Example> =
                (0..n).map(|i| Example::new(format!("note {i}"), 0)).collect();
            let data = Dataset::new(1, examples).unwrap();

            let (t1, v1, s1) = split(&data, 0.8, 0.1, seed).unwrap();
            let (t2, v2, s2) = split(&data, 0.8, 0.1, seed).unwrap();

            prop_assert_eq!(t1.examples(), t2.examples());
            prop_assert_eq!(v1.examples(), v2.examples());
            prop_assert_eq!(s1.examples(), s2.examples());
        }

        #[test]
        fn prop_split_partitions_dataset(
            seed in any::<u64>(),
            n in 3usize..200,
            train_frac in 0.4f64..0.8,
            val_frac in 0.05f64..0.2,
        ) {
            let examples: Vec<Example> =
                (0..n).map(|i| Example::new(format!("note {i}"), 0)).collect();
            let data = Dataset::new(1, examples).unwrap();

            let (train, val, test) = split(&data, train_frac, val_frac, seed).unwrap();

            prop_assert_eq!(train.len() + val.len() + test.len(), n);

            let mut seen = HashSet::new();
            for subset in [&train, &val, &test] {
                for example in subset.examples() {
                    prop_assert!(seen.insert(example.text.clone()));
                }
            }
        }
    }
}
