use thiserror::Error;

pub mod chat;
pub mod extensions;
pub mod files;
pub mod settings;
pub mod usages;
pub mod users;

pub type DomainResult<T> = Result<T, DomainError>;

/// Error taxonomy shared by all command/query handlers.
///
/// `NotFound` and `Forbidden` are deliberately distinct: a resource that
/// exists but belongs to another principal is reported as `Forbidden`,
/// never as `NotFound`. Handlers check existence first, ownership second.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("no handler registered for request type {0}")]
    HandlerNotFound(&'static str),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        DomainError::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        DomainError::Conflict(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal(message.into())
    }
}
