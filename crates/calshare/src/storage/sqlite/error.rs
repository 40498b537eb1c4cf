//! SQLite error mapping.
//!
//! `rusqlite` failures are first classified by what went wrong for the
//! caller, then turned into a `RepositoryError` carrying the entity and,
//! when the call site knows it, the record id or email involved.

use calshare_core::storage::RepositoryError;
use rusqlite::{ffi, ErrorCode};

/// What a failed statement means for the repository.
#[derive(Debug, PartialEq, Eq)]
enum Failure {
    /// `users.email` UNIQUE or a primary key collision.
    Duplicate,
    /// A single-row query matched nothing.
    MissingRow,
    /// The database file could not be opened or is locked.
    Unavailable,
    Other,
}

fn classify(err: &rusqlite::Error) -> Failure {
    match err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            Failure::Duplicate
        }
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(
                e.code,
                ErrorCode::CannotOpen | ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ) =>
        {
            Failure::Unavailable
        }
        rusqlite::Error::QueryReturnedNoRows => Failure::MissingRow,
        _ => Failure::Other,
    }
}

fn map_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: Option<String>,
) -> RepositoryError {
    let inner = match &err {
        tokio_rusqlite::Error::Rusqlite(inner) => inner,
        tokio_rusqlite::Error::Close(_) => {
            return RepositoryError::ConnectionFailed("SQLite connection closed".to_string())
        }
        _ => return RepositoryError::QueryFailed(err.to_string()),
    };

    let key = || id.clone().unwrap_or_else(|| "unknown".to_string());
    match classify(inner) {
        Failure::Duplicate => RepositoryError::AlreadyExists {
            entity_type,
            id: key(),
        },
        Failure::MissingRow => RepositoryError::NotFound {
            entity_type,
            id: key(),
        },
        Failure::Unavailable => {
            RepositoryError::ConnectionFailed(format!("SQLite unavailable: {inner}"))
        }
        Failure::Other => RepositoryError::QueryFailed(inner.to_string()),
    }
}

/// Maps a failed call on the connection when no key is known.
pub fn map_tokio_rusqlite_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
) -> RepositoryError {
    map_error(err, entity_type, None)
}

/// Maps a failed call on the connection, reporting `id` (a record id or
/// an email) in NotFound and AlreadyExists errors.
pub fn map_tokio_rusqlite_error_with_id(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    map_error(err, entity_type, Some(id.into()))
}
