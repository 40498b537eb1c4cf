use thiserror::Error;

use crate::calendar::Validator;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Typed failure of a store operation.
///
/// Every store operation returns `Result<T, StoreError>`; the variant decides
/// the HTTP status the caller sees.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// One or more inputs were malformed. Carries every message.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// A write reported no effect.
    #[error("Write failed: {0}")]
    WriteFailed(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation(vec![message.into()])
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        StoreError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict(message.into())
    }

    pub fn write_failed(message: impl Into<String>) -> Self {
        StoreError::WriteFailed(message.into())
    }

    /// Short machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Validation(_) => "validation",
            StoreError::NotFound(_) => "not_found",
            StoreError::Conflict(_) => "conflict",
            StoreError::WriteFailed(_) => "write_failed",
            StoreError::Repository(RepositoryError::NotFound { .. }) => "not_found",
            StoreError::Repository(RepositoryError::AlreadyExists { .. }) => "conflict",
            StoreError::Repository(RepositoryError::InvalidData(_)) => "validation",
            StoreError::Repository(RepositoryError::ConnectionFailed(_)) => "unavailable",
            StoreError::Repository(_) => "internal",
        }
    }

    /// Human readable messages for the response body.
    pub fn messages(&self) -> Vec<String> {
        match self {
            StoreError::Validation(messages) => messages.clone(),
            StoreError::NotFound(m) | StoreError::Conflict(m) | StoreError::WriteFailed(m) => {
                vec![m.clone()]
            }
            StoreError::Repository(e) => vec![e.to_string()],
        }
    }
}

impl From<Validator> for StoreError {
    fn from(validator: Validator) -> Self {
        StoreError::Validation(validator.into_messages())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
