//! End-to-end pipeline: split, search, refit, evaluate on held-out data.

use std::sync::Arc;

use afinar::encoder::EncoderRegistry;
use afinar::hpo::{refit_best, TrialStatus};
use afinar::metrics;
use afinar::{
    split, Dataset, Example, HyperparameterSearch, RandomSampler, SearchSpace,
};

/// Two classes with disjoint vocabularies, so a linear head over hashed
/// features can separate them.
fn synthetic_dataset() -> Dataset {
    let critical = [
        "acute respiratory failure with hypoxia",
        "severe sepsis with septic shock",
        "cardiac arrest with resuscitation",
        "intracranial hemorrhage traumatic",
        "acute renal failure requiring dialysis",
        "multiorgan dysfunction syndrome",
    ];
    let routine = [
        "routine followup wellness visit",
        "annual physical examination normal",
        "medication refill stable condition",
        "minor sprain outpatient treatment",
        "seasonal allergy consultation",
        "preventive screening no findings",
    ];

    let examples: Vec<Example> = (0..120)
        .map(|i| {
            if i % 2 == 0 {
                Example::new(format!("{} case {}", critical[(i / 2) % critical.len()], i), 1)
            } else {
                Example::new(format!("{} case {}", routine[(i / 2) % routine.len()], i), 0)
            }
        })
        .collect();
    Dataset::new(2, examples).unwrap()
}

#[test]
fn search_refit_and_evaluate() {
    let dataset = synthetic_dataset();
    let (train, validation, test) = split(&dataset, 0.8, 0.1, 42).unwrap();
    assert_eq!(train.len() + validation.len() + test.len(), 120);

    let space = SearchSpace::new("hashing-64")
        .with_lr_range(0.05, 0.5)
        .with_epoch_range(3, 5)
        .with_batch_sizes(vec![8, 16]);
    let sampler = RandomSampler::new(space, 42).unwrap();

    let registry = Arc::new(EncoderRegistry::new());
    let mut search = HyperparameterSearch::new(3, Box::new(sampler), Arc::clone(&registry));
    let outcome = search.run(&train, &validation).unwrap();

    assert_eq!(outcome.trials.len(), 3);
    assert!(outcome
        .trials
        .iter()
        .all(|t| t.status == TrialStatus::Completed));
    assert!((0.0..=1.0).contains(&outcome.best_score));

    let classifier = refit_best(&outcome, &train, &validation, registry).unwrap();
    let predicted = classifier.predict(test.examples()).unwrap();
    assert_eq!(predicted.len(), test.len());

    // Disjoint vocabularies and healthy learning rates: the final model
    // should do clearly better than chance on held-out data.
    let accuracy = metrics::accuracy(&predicted, &test.labels());
    assert!(accuracy >= 0.6, "test accuracy {accuracy} below 0.6");
}

#[test]
fn split_is_reproducible_across_runs() {
    let dataset = synthetic_dataset();
    let (train_a, val_a, test_a) = split(&dataset, 0.8, 0.1, 7).unwrap();
    let (train_b, val_b, test_b) = split(&dataset, 0.8, 0.1, 7).unwrap();

    assert_eq!(train_a.examples(), train_b.examples());
    assert_eq!(val_a.examples(), val_b.examples());
    assert_eq!(test_a.examples(), test_b.examples());
}
