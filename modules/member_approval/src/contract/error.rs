use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemberApprovalError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Member storage is unavailable")]
    Unavailable,

    #[error("Internal error")]
    Internal,
}

impl MemberApprovalError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unavailable() -> Self {
        Self::Unavailable
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for MemberApprovalError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            InvalidArgument { field, message } => {
                Self::validation(format!("{}: {}", field, message))
            }
            FetchFailed { .. } => Self::unavailable(),
            PersistenceFailed { .. } => Self::internal(),
        }
    }
}
