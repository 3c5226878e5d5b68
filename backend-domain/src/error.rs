use thiserror::Error;

/// Rule violations detected by domain entities and value objects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("request already reviewed ({0})")]
    AlreadyReviewed(String),
}

/// Failures surfaced by store adapters behind the repository ports.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    Duplicate(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
