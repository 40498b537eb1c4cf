//! User API operations.

use super::CalshareClient;
use crate::error::Result;
use calshare_core::calendar::{CreateUserRequest, Event, Schedule, User};

impl CalshareClient {
    /// Register a new user.
    pub async fn create_user(&self, email: &str, display_name: &str) -> Result<User> {
        let response = self
            .client
            .post(self.url("/api/users"))
            .json(&CreateUserRequest {
                email: email.to_string(),
                display_name: display_name.to_string(),
            })
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get user by ID.
    pub async fn get_user(&self, id: &str) -> Result<User> {
        let response = self
            .client
            .get(self.url(&format!("/api/users/{id}")))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Events the user organizes or attends.
    pub async fn list_user_events(&self, id: &str) -> Result<Vec<Event>> {
        let response = self
            .client
            .get(self.url(&format!("/api/users/{id}/events")))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Schedules owned by the user.
    pub async fn list_user_schedules(&self, id: &str) -> Result<Vec<Schedule>> {
        let response = self
            .client
            .get(self.url(&format!("/api/users/{id}/schedules")))
            .send()
            .await?;
        self.handle_response(response).await
    }
}
