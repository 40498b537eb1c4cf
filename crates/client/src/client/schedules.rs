//! Schedule API operations.

use chrono::{DateTime, Utc};

use super::CalshareClient;
use crate::error::Result;
use calshare_core::calendar::{
    AvailabilityResponse, CreateScheduleRequest, CreatedResponse, Event, Schedule,
    UpdateScheduleRequest,
};

/// Time window sent as `start`/`end` query parameters.
fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> [(&'static str, String); 2] {
    [("start", start.to_rfc3339()), ("end", end.to_rfc3339())]
}

impl CalshareClient {
    /// Create a schedule and return its ID.
    pub async fn create_schedule(&self, user_id: &str, name: &str) -> Result<CreatedResponse> {
        let response = self
            .client
            .post(self.url("/api/schedules"))
            .json(&CreateScheduleRequest {
                user_id: user_id.to_string(),
                name: name.to_string(),
            })
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get schedule by ID.
    pub async fn get_schedule(&self, id: &str) -> Result<Schedule> {
        let response = self
            .client
            .get(self.url(&format!("/api/schedules/{id}")))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Update a schedule.
    pub async fn update_schedule(
        &self,
        id: &str,
        request: UpdateScheduleRequest,
    ) -> Result<Schedule> {
        let response = self
            .client
            .put(self.url(&format!("/api/schedules/{id}")))
            .json(&request)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Delete a schedule.
    pub async fn delete_schedule(&self, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/api/schedules/{id}")))
            .send()
            .await?;
        self.handle_empty_response(response).await
    }

    /// Events in a schedule, optionally limited to those overlapping a window.
    pub async fn list_schedule_events(
        &self,
        id: &str,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<Vec<Event>> {
        let mut request = self
            .client
            .get(self.url(&format!("/api/schedules/{id}/events")));
        if let Some((start, end)) = range {
            request = request.query(&window(start, end));
        }
        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Whether `[start, end)` is free in the schedule.
    pub async fn check_availability(
        &self,
        id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool> {
        let response = self
            .client
            .get(self.url(&format!("/api/schedules/{id}/availability")))
            .query(&window(start, end))
            .send()
            .await?;
        let body: AvailabilityResponse = self.handle_response(response).await?;
        Ok(body.available)
    }
}
