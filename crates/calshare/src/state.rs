//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. The stores hold repository trait objects, and the
//! concrete backend is chosen via feature flags.

use std::sync::Arc;

use calshare_core::storage::{
    EventRepository, RequestRepository, ScheduleRepository, UserRepository,
};

use crate::config::Config;
use crate::stores::{EventStore, RequestStore, ScheduleStore, UserStore};

// ============================================================================
// Compile-time feature validation
// ============================================================================

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "sqlite", feature = "mongodb"))]
compile_error!("Cannot enable both 'sqlite' and 'mongodb' storage features");

#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!("Cannot enable both 'sqlite' and 'inmemory' storage features");

#[cfg(all(feature = "mongodb", feature = "inmemory"))]
compile_error!("Cannot enable both 'mongodb' and 'inmemory' storage features");

#[cfg(not(any(feature = "inmemory", feature = "sqlite", feature = "mongodb")))]
compile_error!("Must enable exactly one storage feature: 'inmemory', 'sqlite', or 'mongodb'");

/// Shared application state.
///
/// Cloned for each request handler. Every store shares the same backend.
#[derive(Clone)]
pub struct AppState {
    pub users: UserStore,
    pub schedules: ScheduleStore,
    pub events: EventStore,
    pub requests: RequestStore,
}

impl AppState {
    /// Wires the stores to a single backend implementing every repository.
    pub fn from_repository<R>(repo: Arc<R>) -> Self
    where
        R: UserRepository + ScheduleRepository + EventRepository + RequestRepository + 'static,
    {
        let requests = RequestStore::new(repo.clone(), repo.clone(), repo.clone());

        Self {
            users: UserStore::new(repo.clone()),
            schedules: ScheduleStore::new(repo.clone(), repo.clone()),
            events: EventStore::new(repo.clone(), repo.clone(), repo, requests.clone()),
            requests,
        }
    }
}

// ============================================================================
// Factory functions for the storage backends
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage.
        /// Useful for local development without any external dependencies.
        pub async fn new(_config: &Config) -> Result<Self, anyhow::Error> {
            tracing::info!("Using in-memory storage");
            Ok(Self::from_repository(Arc::new(InMemoryRepository::new())))
        }
    }
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            tracing::info!(path = %config.sqlite_path, "Using SQLite storage");
            let repo = SqliteRepository::new(&config.sqlite_path).await?;
            Ok(Self::from_repository(Arc::new(repo)))
        }
    }
}

#[cfg(feature = "mongodb")]
mod mongodb {
    use super::*;
    use crate::storage::MongoRepository;

    impl AppState {
        /// Creates AppState with MongoDB storage.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            tracing::info!(database = %config.mongodb_database, "Using MongoDB storage");
            let repo = MongoRepository::new(&config.mongodb_uri, &config.mongodb_database).await?;
            Ok(Self::from_repository(Arc::new(repo)))
        }
    }
}

// ============================================================================
// Test support - provides Default implementation for unit tests
// ============================================================================

#[cfg(test)]
impl Default for AppState {
    /// Creates an AppState backed by a fresh in-memory repository.
    fn default() -> Self {
        Self::from_repository(Arc::new(crate::storage::InMemoryRepository::new()))
    }
}
