//! HTTP client for the calshare API.

pub mod events;
pub mod health;
pub mod requests;
pub mod schedules;
pub mod users;

use crate::error::{ClientError, Result};

/// HTTP client for the calshare API.
#[derive(Debug, Clone)]
pub struct CalshareClient {
    client: reqwest::Client,
    base_url: String,
}

impl CalshareClient {
    /// Create a new client with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from environment (CALSHARE_URL or default).
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("CALSHARE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        Self::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a successful JSON body or turn the response into a [`ClientError`].
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(ClientError::from)
        } else {
            Err(error_from(response).await)
        }
    }

    /// Handle responses with no body (204).
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from(response).await)
        }
    }
}

async fn error_from(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ClientError::from_response(status, &body)
}
