//! Event CLI commands.

use chrono::{DateTime, Utc};
use clap::{ArgGroup, Parser, Subcommand};

/// Event commands.
#[derive(Debug, Parser)]
pub struct EventsCommand {
    #[command(subcommand)]
    pub action: EventsAction,
}

/// Available event actions.
#[derive(Debug, Subcommand)]
pub enum EventsAction {
    /// Create an event.
    Create {
        /// Organizer user ID.
        #[arg(long)]
        user_id: String,
        /// Event name.
        #[arg(long)]
        name: String,
        /// Start (RFC 3339).
        #[arg(long)]
        start: DateTime<Utc>,
        /// End (RFC 3339).
        #[arg(long)]
        end: DateTime<Utc>,
        /// Color code, e.g. "#ff0000".
        #[arg(long)]
        color_code: String,
        /// Classification label.
        #[arg(long)]
        classification: String,
        /// Schedule to place the event in.
        #[arg(long)]
        schedule_id: Option<String>,
        /// Schedule name shown with the event.
        #[arg(long)]
        schedule_name: Option<String>,
        /// Email of a user to share the event with.
        #[arg(long)]
        share_with: Option<String>,
    },
    /// Query events by one filter.
    #[command(group(
        ArgGroup::new("filter")
            .required(true)
            .args(["color_code", "classification", "start_date", "end_date"]),
    ))]
    List {
        #[arg(long)]
        color_code: Option<String>,
        #[arg(long)]
        classification: Option<String>,
        /// Narrow a color or classification query to one user.
        #[arg(long)]
        user_id: Option<String>,
        /// Events starting on this day (YYYY-MM-DD).
        #[arg(long)]
        start_date: Option<String>,
        /// Events ending on this day (YYYY-MM-DD).
        #[arg(long)]
        end_date: Option<String>,
    },
    /// Get event by ID.
    Get {
        /// Event ID.
        id: String,
    },
    /// Update an event. Omitted fields keep their values.
    Update {
        /// Event ID.
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        #[arg(long)]
        end: Option<DateTime<Utc>>,
        #[arg(long)]
        color_code: Option<String>,
        #[arg(long)]
        classification: Option<String>,
    },
    /// Delete an event.
    Delete {
        /// Event ID.
        id: String,
    },
}
