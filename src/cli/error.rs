//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::{ApplicationError, ErrorKind};
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    /// Script ran but at least one statement failed
    #[error("{failed} of {total} statements failed")]
    ScriptFailed { failed: usize, total: usize },
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::ScriptFailed { .. } => crate::exitcode::DATAERR,
            CliError::Infra(e) => match e {
                InfraError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                    crate::exitcode::NOINPUT
                }
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app.kind() {
                    ErrorKind::Config => crate::exitcode::CONFIG,
                    _ => crate::exitcode::DATAERR,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ParseError;
    use rstest::rstest;

    #[rstest]
    #[case(CliError::Usage("x".into()), crate::exitcode::USAGE)]
    #[case(CliError::ScriptFailed { failed: 1, total: 3 }, crate::exitcode::DATAERR)]
    #[case(
        CliError::from(ApplicationError::Config { message: "bad".into() }),
        crate::exitcode::CONFIG
    )]
    #[case(
        CliError::from(ApplicationError::from(ParseError::new("x", "y"))),
        crate::exitcode::DATAERR
    )]
    #[case(
        CliError::Infra(InfraError::io("read", std::io::Error::from(std::io::ErrorKind::NotFound))),
        crate::exitcode::NOINPUT
    )]
    #[case(
        CliError::Infra(InfraError::io("read", std::io::Error::from(std::io::ErrorKind::PermissionDenied))),
        crate::exitcode::IOERR
    )]
    fn given_error_when_mapping_then_sysexits_code(#[case] error: CliError, #[case] code: i32) {
        assert_eq!(error.exit_code(), code);
    }
}
