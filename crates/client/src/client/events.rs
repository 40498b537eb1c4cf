//! Event API operations.

use serde::Serialize;

use super::CalshareClient;
use crate::error::Result;
use calshare_core::calendar::{CreateEventRequest, CreatedResponse, Event, UpdateEventRequest};

/// Filter for `GET /api/events`. The server accepts exactly one filter,
/// with `user_id` narrowing the color and classification queries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListEventsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// YYYY-MM-DD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// YYYY-MM-DD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl CalshareClient {
    /// Create an event, sharing it when `share_event` is set.
    pub async fn create_event(&self, request: CreateEventRequest) -> Result<CreatedResponse> {
        let response = self
            .client
            .post(self.url("/api/events"))
            .json(&request)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Query events by a single filter.
    pub async fn list_events(&self, query: &ListEventsQuery) -> Result<Vec<Event>> {
        let response = self
            .client
            .get(self.url("/api/events"))
            .query(query)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get event by ID.
    pub async fn get_event(&self, id: &str) -> Result<Event> {
        let response = self
            .client
            .get(self.url(&format!("/api/events/{id}")))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Update an event.
    pub async fn update_event(&self, id: &str, request: UpdateEventRequest) -> Result<Event> {
        let response = self
            .client
            .put(self.url(&format!("/api/events/{id}")))
            .json(&request)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Delete an event.
    pub async fn delete_event(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/events/{id}")))
            .send()
            .await?;
        self.handle_empty_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_filters_are_not_sent() {
        let query = ListEventsQuery {
            color_code: Some("#ff0000".to_string()),
            user_id: Some("abc".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&query).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["color_code"], "#ff0000");
    }
}
