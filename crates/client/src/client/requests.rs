//! Sharing request API operations.

use super::CalshareClient;
use crate::error::Result;
use calshare_core::calendar::{ResolveShareRequest, ShareRequest};

impl CalshareClient {
    /// Pending requests addressed to `email`.
    pub async fn list_requests(&self, email: &str) -> Result<Vec<ShareRequest>> {
        let response = self
            .client
            .get(self.url("/api/requests"))
            .query(&[("email", email)])
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Accept a request as the receiving user.
    pub async fn accept_request(&self, request_id: &str, user_id: &str) -> Result<ShareRequest> {
        self.resolve("/api/requests/accept", request_id, user_id)
            .await
    }

    /// Reject a request as the receiving user.
    pub async fn reject_request(&self, request_id: &str, user_id: &str) -> Result<ShareRequest> {
        self.resolve("/api/requests/reject", request_id, user_id)
            .await
    }

    async fn resolve(&self, path: &str, request_id: &str, user_id: &str) -> Result<ShareRequest> {
        let response = self
            .client
            .post(self.url(path))
            .json(&ResolveShareRequest {
                request_id: request_id.to_string(),
                user_id: user_id.to_string(),
            })
            .send()
            .await?;
        self.handle_response(response).await
    }
}
