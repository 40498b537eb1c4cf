//! Health check CLI commands.

use clap::{Parser, Subcommand};

/// Health check commands.
#[derive(Debug, Parser)]
pub struct HealthCommand {
    #[command(subcommand)]
    pub action: HealthAction,
}

/// Available health check actions.
#[derive(Debug, Subcommand)]
pub enum HealthAction {
    /// Check that the server is alive.
    Livez,
}
