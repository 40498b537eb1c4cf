//! Health check operations.

use super::CalshareClient;
use crate::error::Result;

impl CalshareClient {
    /// Liveness check. Succeeds when the server answers 200.
    pub async fn livez(&self) -> Result<()> {
        let response = self.client.get(self.url("/livez")).send().await?;
        self.handle_empty_response(response).await
    }
}
