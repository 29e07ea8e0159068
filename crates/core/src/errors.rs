use std::fmt;

use thiserror::Error;

/// Message returned for every authorization denial, whether or not the
/// target exists.
pub const FORBIDDEN_MESSAGE: &str = "Forbidden: you do not have permission to perform this action";

/// Which side of a session request failed participant validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    Student,
    Tutor,
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Student => f.write_str("student"),
            Participant::Tutor => f.write_str("tutor"),
        }
    }
}

#[derive(Error, Debug)]
pub enum EduError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid {0} ID")]
    InvalidParticipant(Participant),

    #[error("Invalid status value: {0}")]
    InvalidStatus(String),

    #[error("Invalid rating: {0}")]
    InvalidRating(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("{}", FORBIDDEN_MESSAGE)]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl EduError {
    /// True for errors caused by malformed or out-of-range input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EduError::Validation(_)
                | EduError::InvalidParticipant(_)
                | EduError::InvalidStatus(_)
                | EduError::InvalidRating(_)
                | EduError::InvalidRole(_)
        )
    }

    /// True for failures that are not the caller's fault.
    pub fn is_server_fault(&self) -> bool {
        matches!(self, EduError::Database(_) | EduError::Internal(_))
    }
}

pub type EduResult<T> = Result<T, EduError>;
