use crate::value::{ArrayError, DatasetValue};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

/// A failed attempt to deserialize a dataset blob.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid array in dataset: {0}")]
    InvalidArray(#[from] ArrayError),
}

/// Deserialize exactly one dataset value from a byte source.
pub fn load_reader<R: Read>(reader: R) -> Result<DatasetValue, LoadError> {
    let raw: Value = serde_json::from_reader(reader)?;
    Ok(DatasetValue::decode(raw)?)
}

/// Deserialize a dataset blob from a file path.
///
/// The file handle is scoped to this call and closed on every exit path.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<DatasetValue, LoadError> {
    let file = File::open(path)?;
    load_reader(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_reader_round() {
        let blob = br#"{"train": {"audio": {"__ndarray__": {"shape": [2], "data": [1.0, 2.0]}}}}"#;
        let dataset = load_reader(&blob[..]).unwrap();

        let DatasetValue::Mapping(tree) = dataset else {
            panic!("expected a mapping");
        };
        let keys: Vec<&String> = tree.keys().collect();
        assert_eq!(keys, ["train"]);
    }

    #[test]
    fn test_load_reader_malformed() {
        let err = load_reader(&b"{not json"[..]).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_load_reader_invalid_array() {
        let blob = br#"{"__ndarray__": {"shape": [4], "data": [1.0]}}"#;
        let err = load_reader(&blob[..]).unwrap_err();
        assert!(matches!(err, LoadError::InvalidArray(_)));
    }

    #[test]
    fn test_load_reader_oversized_shape() {
        let blob = br#"{"__ndarray__": {"shape": [9223372036854775808, 2], "data": []}}"#;
        let err = load_reader(&blob[..]).unwrap_err();
        assert!(matches!(err, LoadError::InvalidArray(_)));
    }

    #[test]
    fn test_load_path_missing_file() {
        let err = load_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
