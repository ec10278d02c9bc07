//! Classification metrics
//!
//! Binary metrics treat class 1 as the positive class. For more than two
//! classes, the macro-averaged variants compute the per-class score with
//! that class as positive and average over classes, so every class weighs
//! the same regardless of support.
//!
//! All functions take predicted and true labels as parallel slices and
//! return 0.0 for any undefined ratio (zero denominator) rather than NaN.

/// Fraction of predictions that match the true label.
///
/// Empty input yields 0.0.
///
/// # Panics
///
/// Panics if the slices differ in length; that is a caller bug.
#[must_use]
pub fn accuracy(predicted: &[usize], actual: &[usize]) -> f64 {
    check_lengths(predicted, actual);
    if predicted.is_empty() {
        return 0.0;
    }
    let correct = predicted.iter().zip(actual).filter(|(p, a)| p == a).count();
    correct as f64 / predicted.len() as f64
}

/// Binary precision: TP / (TP + FP), with class 1 positive
#[must_use]
pub fn precision(predicted: &[usize], actual: &[usize]) -> f64 {
    check_lengths(predicted, actual);
    class_precision(predicted, actual, 1)
}

/// Binary recall: TP / (TP + FN), with class 1 positive
#[must_use]
pub fn recall(predicted: &[usize], actual: &[usize]) -> f64 {
    check_lengths(predicted, actual);
    class_recall(predicted, actual, 1)
}

/// Binary F1: harmonic mean of precision and recall, with class 1 positive
#[must_use]
pub fn f1_score(predicted: &[usize], actual: &[usize]) -> f64 {
    check_lengths(predicted, actual);
    class_f1(predicted, actual, 1)
}

/// Macro-averaged precision over `num_classes` classes
#[must_use]
pub fn macro_precision(predicted: &[usize], actual: &[usize], num_classes: usize) -> f64 {
    check_lengths(predicted, actual);
    macro_average(num_classes, |class| class_precision(predicted, actual, class))
}

/// Macro-averaged recall over `num_classes` classes
#[must_use]
pub fn macro_recall(predicted: &[usize], actual: &[usize], num_classes: usize) -> f64 {
    check_lengths(predicted, actual);
    macro_average(num_classes, |class| class_recall(predicted, actual, class))
}

/// Macro-averaged F1 over `num_classes` classes
#[must_use]
pub fn macro_f1(predicted: &[usize], actual: &[usize], num_classes: usize) -> f64 {
    check_lengths(predicted, actual);
    macro_average(num_classes, |class| class_f1(predicted, actual, class))
}

fn check_lengths(predicted: &[usize], actual: &[usize]) {
    assert_eq!(
        predicted.len(),
        actual.len(),
        "predicted and actual label counts must match"
    );
}

fn macro_average(num_classes: usize, per_class: impl Fn(usize) -> f64) -> f64 {
    if num_classes == 0 {
        return 0.0;
    }
    (0..num_classes).map(per_class).sum::<f64>() / num_classes as f64
}

fn class_precision(predicted: &[usize], actual: &[usize], positive: usize) -> f64 {
    let tp = count(predicted, actual, |p, a| p == positive && a == positive);
    let fp = count(predicted, actual, |p, a| p == positive && a != positive);
    safe_ratio(tp, tp + fp)
}

fn class_recall(predicted: &[usize], actual: &[usize], positive: usize) -> f64 {
    let tp = count(predicted, actual, |p, a| p == positive && a == positive);
    let fn_ = count(predicted, actual, |p, a| p != positive && a == positive);
    safe_ratio(tp, tp + fn_)
}

fn class_f1(predicted: &[usize], actual: &[usize], positive: usize) -> f64 {
    let p = class_precision(predicted, actual, positive);
    let r = class_recall(predicted, actual, positive);
    if p + r == 0.0 {
        0.0
    } else {
        2.0 * p * r / (p + r)
    }
}

fn count(predicted: &[usize], actual: &[usize], pred: impl Fn(usize, usize) -> bool) -> usize {
    predicted
        .iter()
        .zip(actual)
        .filter(|(p, a)| pred(**p, **a))
        .count()
}

fn safe_ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
