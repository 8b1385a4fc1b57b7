//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::{ApplicationError, ErrorCode};
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    /// The store refused a request.
    #[error("{message}")]
    Rejected { code: ErrorCode, message: String },
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
            CliError::Rejected { code, .. } => match code {
                ErrorCode::BadRequest => crate::exitcode::DATAERR,
                ErrorCode::NotFound => crate::exitcode::NOINPUT,
                ErrorCode::InternalServerError => crate::exitcode::SOFTWARE,
            },
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(ApplicationError::Config { .. }) => crate::exitcode::CONFIG,
                InfraError::Application(ApplicationError::Domain(DomainError::NotFound(_))) => {
                    crate::exitcode::NOINPUT
                }
                InfraError::Application(ApplicationError::Validation { .. })
                | InfraError::Application(ApplicationError::Domain(_)) => crate::exitcode::DATAERR,
                InfraError::Application(_) => crate::exitcode::SOFTWARE,
            },
        }
    }
}
