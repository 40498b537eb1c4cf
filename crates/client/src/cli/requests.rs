//! Sharing request CLI commands.

use clap::{Parser, Subcommand};

/// Sharing request commands.
#[derive(Debug, Parser)]
pub struct RequestsCommand {
    #[command(subcommand)]
    pub action: RequestsAction,
}

/// Available request actions.
#[derive(Debug, Subcommand)]
pub enum RequestsAction {
    /// List pending requests addressed to an email.
    List {
        #[arg(long)]
        email: String,
    },
    /// Accept a request.
    Accept {
        /// Request ID.
        id: String,
        /// ID of the receiving user.
        #[arg(long)]
        user_id: String,
    },
    /// Reject a request.
    Reject {
        /// Request ID.
        id: String,
        /// ID of the receiving user.
        #[arg(long)]
        user_id: String,
    },
}
