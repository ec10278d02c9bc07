//! JSONL dataset loading
//!
//! One `{"text": ..., "label": ...}` object per line. The records are the
//! output of the upstream admission-table joins, which are not this crate's
//! concern.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::error::{DataError, Result};
use super::example::{Dataset, Example};

/// Load a JSONL file into a validated [`Dataset`].
///
/// Blank lines are skipped. Parse failures report the 1-based line number.
pub fn load_jsonl(path: impl AsRef<Path>, num_classes: usize) -> Result<Dataset> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut examples = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let example: Example =
            serde_json::from_str(&line).map_err(|source| DataError::Parse {
                line: i + 1,
                source,
            })?;
        examples.push(example);
    }

    Dataset::new(num_classes, examples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_jsonl() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"text": "acute sepsis", "label": 1}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"text": "hip fracture", "label": 0}}"#).unwrap();

        let dataset = load_jsonl(file.path(), 2).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.labels(), vec![1, 0]);
    }

    #[test]
    fn test_load_jsonl_reports_line_number() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"text": "acute sepsis", "label": 1}}"#).unwrap();
        writeln!(file, "not json").unwrap();

        let err = load_jsonl(file.path(), 2).unwrap_err();
        assert!(matches!(err, DataError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_load_jsonl_missing_file() {
        let err = load_jsonl("/nonexistent/data.jsonl", 2).unwrap_err();
        assert!(matches!(err, DataError::Io(_)));
    }
}
