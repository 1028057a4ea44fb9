//! Index error types
//!
//! Indexing never fails halfway: every problem found in the input is collected
//! into one `IndexError::Validation` so callers see the whole list at once.

use std::fmt;
use thiserror::Error;

/// A single problem found while indexing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Two periods share the same identifier
    DuplicatePeriod { id: String },

    /// A period ends before it starts
    InvertedPeriod { id: String, start: i32, end: i32 },

    /// A sage references a period that does not exist
    UnknownPeriod {
        /// Position of the sage in the input
        index: usize,
        sage: String,
        period_id: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::DuplicatePeriod { id } => {
                write!(f, "duplicate period id '{}'", id)
            }
            ValidationIssue::InvertedPeriod { id, start, end } => {
                write!(f, "period '{}' ends ({}) before it starts ({})", id, end, start)
            }
            ValidationIssue::UnknownPeriod {
                index,
                sage,
                period_id,
            } => write!(
                f,
                "sage #{} '{}' references unknown period '{}'",
                index, sage, period_id
            ),
        }
    }
}

/// Errors that can occur while building an index
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Validation failed: {}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),
}

impl IndexError {
    /// The individual issues behind this error
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            IndexError::Validation(issues) => issues,
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for index operations
pub type IndexResult<T> = Result<T, IndexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IndexError::Validation(vec![
            ValidationIssue::UnknownPeriod {
                index: 4,
                sage: "Rava".to_string(),
                period_id: "p9".to_string(),
            },
            ValidationIssue::InvertedPeriod {
                id: "savoraim".to_string(),
                start: 600,
                end: 500,
            },
        ]);

        assert_eq!(
            err.to_string(),
            "Validation failed: sage #4 'Rava' references unknown period 'p9'; \
             period 'savoraim' ends (500) before it starts (600)"
        );
        assert_eq!(err.issues().len(), 2);
    }
}
