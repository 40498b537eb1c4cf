//! User CLI commands.

use clap::{Parser, Subcommand};

/// User management commands.
#[derive(Debug, Parser)]
pub struct UsersCommand {
    #[command(subcommand)]
    pub action: UsersAction,
}

/// Available user actions.
#[derive(Debug, Subcommand)]
pub enum UsersAction {
    /// Register a new user.
    Create {
        /// User email.
        #[arg(long)]
        email: String,
        /// Display name.
        #[arg(long)]
        display_name: String,
    },
    /// Get user by ID.
    Get {
        /// User ID.
        id: String,
    },
    /// List events the user organizes or attends.
    Events {
        /// User ID.
        id: String,
    },
    /// List schedules owned by the user.
    Schedules {
        /// User ID.
        id: String,
    },
}
