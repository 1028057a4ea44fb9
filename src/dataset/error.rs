//! Dataset loading error types

use std::fmt;
use thiserror::Error;

/// Which array of the input document a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Periods,
    Sages,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Periods => write!(f, "periods"),
            Collection::Sages => write!(f, "sages"),
        }
    }
}

/// A single malformed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIssue {
    pub collection: Collection,
    /// Position of the record in its array
    pub index: usize,
    pub message: String,
}

impl fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.collection, self.index, self.message)
    }
}

/// Errors that can occur while obtaining a dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not shaped like `{ periods: [...], sages: [...] }`
    #[error("Malformed document: {0}")]
    Structure(String),

    /// One or more records could not be decoded
    #[error("{} malformed record(s): {}", .0.len(), join_issues(.0))]
    Records(Vec<RecordIssue>),

    /// HTTP request failed
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The fetch did not finish within the configured timeout
    #[error("Fetch timed out after {0} ms")]
    Timeout(u64),
}

fn join_issues(issues: &[RecordIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<reqwest::Error> for DatasetError {
    fn from(err: reqwest::Error) -> Self {
        DatasetError::Fetch(err.to_string())
    }
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DatasetError::Structure("missing `sages` array".to_string());
        assert_eq!(err.to_string(), "Malformed document: missing `sages` array");

        let err = DatasetError::Records(vec![
            RecordIssue {
                collection: Collection::Sages,
                index: 3,
                message: "invalid type: string \"abc\", expected i32".to_string(),
            },
            RecordIssue {
                collection: Collection::Periods,
                index: 0,
                message: "missing field `end`".to_string(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "2 malformed record(s): sages[3]: invalid type: string \"abc\", expected i32; periods[0]: missing field `end`"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DatasetError = io_err.into();
        assert!(matches!(err, DatasetError::Io(_)));
    }
}
