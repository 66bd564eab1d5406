use std::error::Error as StdError;
use std::sync::Arc;

use crate::value::ValueKind;

/// Convenience alias for series and frame operations.
pub type FrameResult<T> = Result<T, FrameError>;

/// Boxed error returned by user callbacks passed to filter and apply.
pub type CallbackError = Box<dyn StdError + Send + Sync>;

/// Errors produced by series, frames and the engines operating on them.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FrameError {
    #[error("expected {expected} values for the row, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("no series named '{0}'")]
    NameNotFound(String),

    #[error("series name '{0}' is not unique")]
    DuplicateName(String),

    #[error("row key {0} is neither a series name nor a column position")]
    MixedKeyType(String),

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    #[error("range {start}..={end} does not resolve within length {len}")]
    InvalidRange { start: isize, end: isize, len: usize },

    #[error("series '{0}' has no ordering comparator")]
    MissingComparator(String),

    #[error("series '{column}' expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("series '{column}' has {found} rows, expected {expected}")]
    RowCountMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error("callback failed: {0}")]
    Predicate(#[source] Arc<dyn StdError + Send + Sync>),
}

impl FrameError {
    pub fn index_out_of_range(index: isize, len: usize) -> Self {
        FrameError::IndexOutOfRange { index, len }
    }

    pub fn arity(expected: usize, found: usize) -> Self {
        FrameError::ArityMismatch { expected, found }
    }

    pub fn type_mismatch(column: impl Into<String>, expected: ValueKind, found: ValueKind) -> Self {
        FrameError::TypeMismatch {
            column: column.into(),
            expected,
            found,
        }
    }

    pub fn row_count(column: impl Into<String>, expected: usize, found: usize) -> Self {
        FrameError::RowCountMismatch {
            column: column.into(),
            expected,
            found,
        }
    }

    /// Wraps an error returned by a user callback.
    pub fn predicate(error: impl Into<CallbackError>) -> Self {
        FrameError::Predicate(Arc::from(error.into()))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FrameError::Cancelled)
    }
}
