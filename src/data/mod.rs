//! Labeled text examples and dataset handling
//!
//! This module provides:
//! - [`Example`] and [`Dataset`] with label-range and non-empty-text invariants
//! - [`normalize_text`] for punctuation stripping and filler-word removal
//! - [`split`], a deterministic two-stage train/validation/test splitter
//! - [`load_jsonl`] for pre-joined `{"text": ..., "label": ...}` records
//!
//! The upstream table joins (admissions, stays, diagnoses) are out of scope;
//! the crate consumes only the resulting labeled examples.

mod error;
mod example;
mod load;
mod split;

pub use error::{DataError, Result};
pub use example::{normalize_text, Dataset, Example};
pub use load::load_jsonl;
pub use split::split;
