//! In-memory storage backend.
//!
//! Default backend and the one every store test runs against. Records live
//! in maps behind `tokio::sync::RwLock`s; a membership update happens inside
//! one write-lock section on the users map.

#[cfg_attr(not(feature = "inmemory"), allow(dead_code))]
mod repository;

pub use repository::InMemoryRepository;
