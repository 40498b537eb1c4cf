//! MongoDB storage backend implementation.
//!
//! Uses the official `mongodb` driver. Collections: `users`, `schedules`,
//! `events` and `requests`.

mod conversions;
mod error;
mod repository;

pub use repository::MongoRepository;
