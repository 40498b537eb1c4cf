//! Pure functions for mapping storage errors to HTTP status codes.
//!
//! Following the Functional Core pattern, the core crate knows nothing about
//! HTTP types; the server turns these codes into responses.

use super::{RepositoryError, StoreError};

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `AlreadyExists` -> 409 (Conflict)
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed` -> 500 (Internal Server Error)
/// - `Serialization` -> 500 (Internal Server Error)
/// - `InvalidData` -> 400 (Bad Request)
///
/// # Examples
///
/// ```
/// use calshare_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::NotFound {
///     entity_type: "Schedule",
///     id: "65a1b2c3d4e5f60718293a4b".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 400,
    }
}

/// Maps a [`StoreError`] to an HTTP status code.
///
/// Wrapped repository errors use [`repository_error_to_status_code`].
pub fn store_error_to_status_code(error: &StoreError) -> u16 {
    match error {
        StoreError::Validation(_) => 400,
        StoreError::NotFound(_) => 404,
        StoreError::Conflict(_) => 409,
        StoreError::WriteFailed(_) => 500,
        StoreError::Repository(e) => repository_error_to_status_code(e),
    }
}
