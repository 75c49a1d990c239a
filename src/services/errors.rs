use thiserror::Error;

use crate::repository::errors::RepositoryError;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The caller is not authenticated or presented bad credentials.
    #[error("unauthorized")]
    Unauthorized,
    /// The caller is authenticated but lacks the required role.
    #[error("forbidden")]
    Forbidden,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// The request collides with stored data.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Submitted payload failed validation.
    #[error("{0}")]
    Form(String),
    /// The request was abandoned before its changes were committed.
    #[error("cancelled")]
    Cancelled,
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Conflict(message) => ServiceError::Conflict(message),
            RepositoryError::ValidationError(message) => ServiceError::Form(message),
            RepositoryError::Cancelled => ServiceError::Cancelled,
            other => {
                log::error!("Repository failure: {other}");
                ServiceError::Internal
            }
        }
    }
}
