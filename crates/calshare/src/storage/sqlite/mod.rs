//! SQLite storage backend (feature `sqlite`).
//!
//! Membership lists are rows in a `user_events` join table keyed by
//! `(user_id, event_id, kind)`. Calls run on the `tokio-rusqlite` connection
//! thread.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
