// vigil-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VigilError {
    // --- DOMAIN ERRORS (unknown report types, invalid conditions) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, parsing, backends) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- GENERIC / APPLICATION ERRORS ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl From<std::io::Error> for VigilError {
    fn from(err: std::io::Error) -> Self {
        VigilError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl VigilError {
    /// True for errors the caller can only fix by changing its input or configuration.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            VigilError::Domain(
                DomainError::UnknownReportType(_)
                    | DomainError::InvalidConditionSpec { .. }
                    | DomainError::DuplicateReportType { .. }
            )
        )
    }
}
