//! Examples, text normalization, and the dataset container

use serde::{Deserialize, Serialize};

use super::error::{DataError, Result};

/// Filler words stripped during normalization. Diagnosis titles are full of
/// these and they carry no signal for the classification tasks.
const FILLER_WORDS: [&str; 4] = ["and", "or", "unspecified", "other"];

/// A single labeled text example.
///
/// The label is an integer category: binary for the mortality task
/// (0 = survived, 1 = deceased) or ternary for length-of-stay
/// (short/medium/long).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Free text (e.g. a diagnosis long title)
    pub text: String,
    /// Integer category, `< num_classes` of the owning dataset
    pub label: usize,
}

impl Example {
    /// Create a new example
    #[must_use]
    pub fn new(text: impl Into<String>, label: usize) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Normalize free text: strip punctuation, drop filler words, and collapse
/// whitespace.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    stripped
        .split_whitespace()
        .filter(|word| !FILLER_WORDS.contains(&word.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// An ordered collection of validated examples with a declared label space.
///
/// Construction normalizes every text and enforces the invariants: labels lie
/// in `0..num_classes` and no text is empty after normalization.
#[derive(Debug, Clone)]
pub struct Dataset {
    num_classes: usize,
    examples: Vec<Example>,
}

impl Dataset {
    /// Build a dataset, normalizing texts and validating every example.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::LabelOutOfRange`] or [`DataError::EmptyText`]
    /// for the first offending example.
    pub fn new(num_classes: usize, examples: Vec<Example>) -> Result<Self> {
        let mut validated = Vec::with_capacity(examples.len());
        for (index, mut example) in examples.into_iter().enumerate() {
            example.text = normalize_text(&example.text);
            if example.text.is_empty() {
                return Err(DataError::EmptyText { index });
            }
            if example.label >= num_classes {
                return Err(DataError::LabelOutOfRange {
                    label: example.label,
                    num_classes,
                    index,
                });
            }
            validated.push(example);
        }
        Ok(Self {
            num_classes,
            examples: validated,
        })
    }

    /// Build from examples that already satisfy the invariants.
    pub(crate) fn from_parts(num_classes: usize, examples: Vec<Example>) -> Self {
        Self {
            num_classes,
            examples,
        }
    }

    /// Declared number of label classes
    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Number of examples
    #[must_use]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Whether the dataset is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Examples in order
    #[must_use]
    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Labels in example order
    #[must_use]
    pub fn labels(&self) -> Vec<usize> {
        self.examples.iter().map(|e| e.label).collect()
    }

    /// Concatenate two datasets over the same label space (e.g. rejoining
    /// train and validation for the final refit).
    ///
    /// # Panics
    ///
    /// Panics if the label spaces differ; that is a caller bug.
    #[must_use]
    pub fn concat(&self, other: &Dataset) -> Dataset {
        assert_eq!(
            self.num_classes, other.num_classes,
            "cannot concatenate datasets with different label spaces"
        );
        let mut examples = self.examples.clone();
        examples.extend(other.examples.iter().cloned());
        Dataset {
            num_classes: self.num_classes,
            examples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize_text("Pneumonia, bacterial!"), "Pneumonia bacterial");
    }

    #[test]
    fn test_normalize_drops_filler_words() {
        assert_eq!(
            normalize_text("Pneumonia, unspecified and other conditions"),
            "Pneumonia conditions"
        );
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_text("  acute   renal  failure "), "acute renal failure");
    }

    #[test]
    fn test_dataset_new_validates_labels() {
        let examples = vec![Example::new("sepsis", 0), Example::new("fracture", 2)];
        let err = Dataset::new(2, examples).unwrap_err();
        assert!(matches!(
            err,
            crate::data::DataError::LabelOutOfRange {
                label: 2,
                num_classes: 2,
                index: 1
            }
        ));
    }

    #[test]
    fn test_dataset_new_rejects_empty_text() {
        // Nothing but punctuation and filler words survives normalization.
        let examples = vec![Example::new("and, or!", 0)];
        let err = Dataset::new(2, examples).unwrap_err();
        assert!(matches!(err, crate::data::DataError::EmptyText { index: 0 }));
    }

    #[test]
    fn test_dataset_accessors() {
        let examples = vec![Example::new("sepsis", 1), Example::new("fracture", 0)];
        let dataset = Dataset::new(2, examples).unwrap();

        assert_eq!(dataset.len(), 2);
        assert!(!dataset.is_empty());
        assert_eq!(dataset.num_classes(), 2);
        assert_eq!(dataset.labels(), vec![1, 0]);
        assert_eq!(dataset.examples()[0].text, "sepsis");
    }

    #[test]
    fn test_dataset_concat() {
        let a = Dataset::new(2, vec![Example::new("sepsis", 1)]).unwrap();
        let b = Dataset::new(2, vec![Example::new("fracture", 0)]).unwrap();

        let both = a.concat(&b);
        assert_eq!(both.len(), 2);
        assert_eq!(both.labels(), vec![1, 0]);
    }

    #[test]
    #[should_panic(expected = "different label spaces")]
    fn test_dataset_concat_mismatched_classes_panics() {
        let a = Dataset::new(2, vec![Example::new("sepsis", 1)]).unwrap();
        let b = Dataset::new(3, vec![Example::new("fracture", 2)]).unwrap();
        let _ = a.concat(&b);
    }
}
