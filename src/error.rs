//! Error types for replaying a workload against the oracle.
//!
//! Every variant is fatal: a corrupted stream or a delete of an unknown id
//! invalidates all later comparisons, so nothing here is retried.

use crate::store::ObjectId;

/// Failures surfaced by the oracle and its driver.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OracleError {
    /// A record has the wrong field count or an unparseable field
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number of the record
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// A delete referenced an id that is not in the store
    #[error("Operation {op_index} (line {line}): delete of unknown id {id}")]
    NotFound {
        /// 0-based index of the delete among the records of the stream
        op_index: usize,
        /// 1-based line number of the delete record; blank lines count
        line: usize,
        /// The id that was not present
        id: ObjectId,
    },

    /// Configuration asked for a query mode other than intersection or k-nearest
    #[error("Unknown query mode '{0}' (expected 'intersection', 'knn' or '<k>NN')")]
    UnknownQueryMode(String),

    /// Any other rejected configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading the workload or writing results failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OracleError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Attaches the stream position to a [`OracleError::NotFound`] raised by the store.
    pub(crate) fn at_operation(self, op_index: usize, line: usize) -> Self {
        match self {
            Self::NotFound { id, .. } => Self::NotFound { op_index, line, id },
            other => other,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, OracleError>;
