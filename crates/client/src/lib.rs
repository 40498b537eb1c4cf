//! calshare_client - CLI client for the calshare API.

pub mod cli;
pub mod client;
pub mod error;
pub mod output;

pub use client::CalshareClient;
pub use error::{ClientError, Result};
