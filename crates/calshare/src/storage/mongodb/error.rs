//! MongoDB error mapping.
//!
//! Maps `mongodb::error::Error` to `RepositoryError` from `calshare_core::storage`.

use calshare_core::storage::RepositoryError;
use mongodb::error::{ErrorKind, WriteFailure};

/// Server error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

/// Maps a MongoDB driver error to a RepositoryError.
///
/// - duplicate key → `AlreadyExists`
/// - server selection and I/O failures → `ConnectionFailed`
/// - BSON (de)serialization → `Serialization`
/// - everything else → `QueryFailed`
pub fn map_mongo_error(
    err: mongodb::error::Error,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY =>
        {
            RepositoryError::AlreadyExists {
                entity_type,
                id: id.into(),
            }
        }
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
            RepositoryError::ConnectionFailed(err.to_string())
        }
        ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
            RepositoryError::Serialization(err.to_string())
        }
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}
