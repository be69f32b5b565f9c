use thiserror::Error;

use crate::relay::RelayError;
use crate::repository::errors::RepositoryError;

pub mod campaign;
pub mod email_queue;
pub mod export;
pub mod newsletter;
pub mod notification;
pub mod report;
pub mod transport;
pub mod visit;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<crate::domain::types::TypeConstraintError> for ServiceError {
    fn from(err: crate::domain::types::TypeConstraintError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}
