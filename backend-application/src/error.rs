use thiserror::Error;

use backend_domain::{DomainError, StoreError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<DomainError> for AppError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::AlreadyReviewed(_) => AppError::Conflict(value.to_string()),
            DomainError::InvalidValue { .. } | DomainError::MissingField(_) => {
                AppError::BadRequest(value.to_string())
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Duplicate(key) => AppError::Conflict(format!("{key} already exists")),
            StoreError::Conflict(message) => AppError::Conflict(message),
            StoreError::Backend(err) => AppError::Internal(err),
        }
    }
}
