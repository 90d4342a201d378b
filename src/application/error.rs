//! Application-level errors (wraps domain errors)

use std::fmt;

use thiserror::Error;

use crate::domain::{Domain, DomainError, StructureKind};

/// A statement that could not be reduced to a [`Command`](crate::application::Command).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot parse '{statement}': {reason}")]
pub struct ParseError {
    pub statement: String,
    pub reason: String,
}

impl ParseError {
    pub fn new(statement: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            reason: reason.into(),
        }
    }
}

/// Application errors wrap domain errors and add parsing and workspace-state context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{kind} not created")]
    Precondition { kind: StructureKind },

    #[error("'{command}' targets the {command_domain} context but the active context is {active}")]
    Context {
        command: String,
        command_domain: Domain,
        active: Domain,
    },

    #[error("{verb} is not supported by {kind}")]
    UnsupportedOperation { verb: String, kind: StructureKind },

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApplicationError::Parse(_) => ErrorKind::Parse,
            ApplicationError::Domain(e) => ErrorKind::from(e),
            ApplicationError::Precondition { .. } => ErrorKind::Precondition,
            ApplicationError::Context { .. } => ErrorKind::Context,
            ApplicationError::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
            ApplicationError::Config { .. } => ErrorKind::Config,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Stable classification of every failure a statement can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Parse,
    Precondition,
    Context,
    UnsupportedOperation,
    Index,
    InvalidPath,
    Capacity,
    NotFound,
    Duplicate,
    UnknownCharacter,
    Decode,
    Empty,
    Config,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Parse => "ParseError",
            ErrorKind::Precondition => "PreconditionError",
            ErrorKind::Context => "ContextError",
            ErrorKind::UnsupportedOperation => "UnsupportedOperationError",
            ErrorKind::Index => "IndexError",
            ErrorKind::InvalidPath => "InvalidPathError",
            ErrorKind::Capacity => "CapacityError",
            ErrorKind::NotFound => "NotFoundError",
            ErrorKind::Duplicate => "DuplicateError",
            ErrorKind::UnknownCharacter => "UnknownCharacterError",
            ErrorKind::Decode => "DecodeError",
            ErrorKind::Empty => "EmptyError",
            ErrorKind::Config => "ConfigError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&DomainError> for ErrorKind {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::IndexOutOfRange { .. } => ErrorKind::Index,
            DomainError::Capacity { .. } | DomainError::FrequencyOverflow { .. } => {
                ErrorKind::Capacity
            }
            DomainError::ValueNotFound(_) => ErrorKind::NotFound,
            DomainError::Empty(_) | DomainError::NoFrequencies => ErrorKind::Empty,
            DomainError::InvalidPath { .. } | DomainError::ValueMismatch { .. } => {
                ErrorKind::InvalidPath
            }
            DomainError::Duplicate(_) => ErrorKind::Duplicate,
            DomainError::UnknownCharacter(_) => ErrorKind::UnknownCharacter,
            DomainError::Decode(_) => ErrorKind::Decode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_domain_error_when_wrapped_then_kind_follows_domain_variant() {
        let err = ApplicationError::from(DomainError::IndexOutOfRange {
            position: 9,
            len: 3,
        });
        assert_eq!(err.kind(), ErrorKind::Index);
        assert_eq!(err.to_string(), "index 9 out of range for length 3");
    }

    #[test]
    fn given_precondition_error_when_displayed_then_names_structure() {
        let err = ApplicationError::Precondition {
            kind: StructureKind::BinaryTree,
        };
        assert_eq!(err.to_string(), "binarytree not created");
        assert_eq!(err.kind().as_str(), "PreconditionError");
    }
}
