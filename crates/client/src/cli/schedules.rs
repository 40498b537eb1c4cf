//! Schedule CLI commands.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

/// Schedule management commands.
#[derive(Debug, Parser)]
pub struct SchedulesCommand {
    #[command(subcommand)]
    pub action: SchedulesAction,
}

/// Available schedule actions.
#[derive(Debug, Subcommand)]
pub enum SchedulesAction {
    /// Create a schedule.
    Create {
        /// Owner user ID.
        #[arg(long)]
        user_id: String,
        /// Schedule name.
        #[arg(long)]
        name: String,
    },
    /// Get schedule by ID.
    Get {
        /// Schedule ID.
        id: String,
    },
    /// Rename a schedule or move it to another owner.
    Update {
        /// Schedule ID.
        id: String,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        /// New owner user ID.
        #[arg(long)]
        user_id: Option<String>,
    },
    /// Delete a schedule.
    Delete {
        /// Schedule ID.
        id: String,
    },
    /// List events in a schedule.
    Events {
        /// Schedule ID.
        id: String,
        /// Window start (RFC 3339).
        #[arg(long, requires = "end")]
        start: Option<DateTime<Utc>>,
        /// Window end (RFC 3339).
        #[arg(long, requires = "start")]
        end: Option<DateTime<Utc>>,
    },
    /// Check whether a time slot is free.
    Availability {
        /// Schedule ID.
        id: String,
        /// Slot start (RFC 3339).
        #[arg(long)]
        start: DateTime<Utc>,
        /// Slot end (RFC 3339).
        #[arg(long)]
        end: DateTime<Utc>,
    },
}
