//! CLI command definitions.

pub mod events;
pub mod health;
pub mod requests;
pub mod schedules;
pub mod users;

use clap::{Parser, Subcommand, ValueEnum};

/// CLI client for the calshare API.
#[derive(Debug, Parser)]
#[command(name = "calshare-client")]
#[command(about = "CLI client for the calshare API", long_about = None)]
pub struct Cli {
    /// Server base URL.
    #[arg(long, env = "CALSHARE_URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// User management.
    Users(users::UsersCommand),
    /// Schedule management.
    Schedules(schedules::SchedulesCommand),
    /// Event management and queries.
    Events(events::EventsCommand),
    /// Sharing requests.
    Requests(requests::RequestsCommand),
    /// Server health checks.
    Health(health::HealthCommand),
}
