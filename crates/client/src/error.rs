//! Client error types.

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for client module.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status} ({kind}): {}", .messages.join("; "))]
    ServerError {
        status: u16,
        kind: String,
        messages: Vec<String>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error body returned by the server for every failed request.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub messages: Vec<String>,
}

impl ClientError {
    /// Builds the error for a non-success response from its status and raw body.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).ok();

        if status == 404 {
            let message = parsed
                .and_then(|b| b.messages.into_iter().next())
                .unwrap_or_else(|| "Resource not found".to_string());
            return ClientError::NotFound(message);
        }

        match parsed {
            Some(ErrorBody { error, messages }) => ClientError::ServerError {
                status,
                kind: error,
                messages,
            },
            None => ClientError::ServerError {
                status,
                kind: "unknown".to_string(),
                messages: if body.is_empty() {
                    Vec::new()
                } else {
                    vec![body.to_string()]
                },
            },
        }
    }

    /// Messages carried by a server error, if any.
    pub fn messages(&self) -> &[String] {
        match self {
            ClientError::ServerError { messages, .. } => messages,
            _ => &[],
        }
    }
}
