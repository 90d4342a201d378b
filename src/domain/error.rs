//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::TreePath;

/// Domain errors are engine-level rule violations.
///
/// Every engine operation that returns one of these has left its structure untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("index {position} out of range for length {len}")]
    IndexOutOfRange { position: usize, len: usize },

    #[error("capacity {capacity} exceeded")]
    Capacity { capacity: usize },

    #[error("value {0} not found")]
    ValueNotFound(i64),

    #[error("{0} is empty")]
    Empty(&'static str),

    #[error("invalid path [{path}]: {reason}")]
    InvalidPath { path: TreePath, reason: String },

    #[error("node at [{path}] holds {actual}, expected {expected}")]
    ValueMismatch {
        path: TreePath,
        expected: i64,
        actual: i64,
    },

    #[error("value {0} already present")]
    Duplicate(i64),

    #[error("character {0:?} has no code in the current tree")]
    UnknownCharacter(char),

    #[error("cannot decode: {0}")]
    Decode(String),

    #[error("at least one character frequency is required")]
    NoFrequencies,

    #[error("total frequency {left} + {right} exceeds {max}", max = u64::MAX)]
    FrequencyOverflow { left: u64, right: u64 },
}

impl DomainError {
    pub(crate) fn invalid_path(path: &TreePath, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.clone(),
            reason: reason.into(),
        }
    }
}

/// Result type for engine operations.
pub type DomainResult<T> = Result<T, DomainError>;
