//! calshare_core - shared types, validation and storage contracts.
//!
//! Following the Functional Core pattern, nothing in this crate performs I/O.
//! The server provides the repository implementations and the stores that
//! orchestrate them.

pub mod calendar;
pub mod serde;
pub mod storage;
