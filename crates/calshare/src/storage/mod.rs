//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `calshare_core::storage`. The implementations are selected
//! at compile time via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): `HashMap`s behind `tokio::sync::RwLock`, nothing persisted
//! - `sqlite`: SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//! - `mongodb`: MongoDB storage backend using the official driver
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.
//!
//! # Examples
//!
//! Build with SQLite:
//! ```bash
//! cargo build -p calshare --no-default-features --features sqlite
//! ```
//!
//! Build with MongoDB:
//! ```bash
//! cargo build -p calshare --no-default-features --features mongodb
//! ```

// The in-memory backend is always compiled: store and handler tests use it.
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "mongodb")]
pub mod mongodb;

#[cfg_attr(not(feature = "inmemory"), allow(unused_imports))]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;

#[cfg(feature = "mongodb")]
pub use mongodb::MongoRepository;
