//! API request types for calshare operations.
//!
//! These types are shared between the server and client for type-safe API communication.
//! Following the Functional Core pattern, these are pure data types with no I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::RecordId;
use super::types::Event;
use crate::serde::{
    deserialize_datetime, deserialize_optional_string, deserialize_truthy_datetime,
    deserialize_truthy_string,
};

/// Request payload for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub display_name: String,
}

/// Request payload for creating a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub user_id: String,
    pub name: String,
}

/// Request payload for updating a schedule.
///
/// Only the provided fields are validated and applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateScheduleRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UpdateScheduleRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.name.is_none()
    }
}

/// Request payload for creating an event.
///
/// When `share_event` holds an email address, a sharing request is sent to
/// that user as part of the same operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub user_id: String,
    pub name: String,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub start: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub end: DateTime<Utc>,
    pub color_code: String,
    pub classification: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_string"
    )]
    pub schedule_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_string"
    )]
    pub schedule_name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_string"
    )]
    pub share_event: Option<String>,
}

impl CreateEventRequest {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        color_code: impl Into<String>,
        classification: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            start,
            end,
            color_code: color_code.into(),
            classification: classification.into(),
            schedule_id: None,
            schedule_name: None,
            share_event: None,
        }
    }

    /// Places the event in a schedule.
    pub fn in_schedule(mut self, schedule_id: impl Into<String>) -> Self {
        self.schedule_id = Some(schedule_id.into());
        self
    }

    /// Sets the schedule name shown with the event.
    pub fn with_schedule_name(mut self, schedule_name: impl Into<String>) -> Self {
        self.schedule_name = Some(schedule_name.into());
        self
    }

    /// Shares the event with the user registered under `email`.
    pub fn share_with(mut self, email: impl Into<String>) -> Self {
        self.share_event = Some(email.into());
        self
    }
}

/// Request payload for updating an event.
///
/// Falsy values (absent, `null`, `false`, `0`, `""`) keep the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_truthy_string"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_truthy_datetime"
    )]
    pub start: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_truthy_datetime"
    )]
    pub end: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_truthy_string"
    )]
    pub color_code: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_truthy_string"
    )]
    pub classification: Option<String>,
}

impl UpdateEventRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_color_code(mut self, color_code: impl Into<String>) -> Self {
        self.color_code = Some(color_code.into());
        self
    }

    pub fn with_classification(mut self, classification: impl Into<String>) -> Self {
        self.classification = Some(classification.into());
        self
    }

    /// Merges the provided fields into `event` and stamps `updated_at`.
    ///
    /// Empty strings never override: payloads built in code get the same
    /// treatment as deserialized ones.
    pub fn apply_to(self, event: &mut Event) {
        if let Some(name) = self.name.filter(|s| !s.is_empty()) {
            event.name = name;
        }
        if let Some(start) = self.start {
            event.start = start;
        }
        if let Some(end) = self.end {
            event.end = end;
        }
        if let Some(color_code) = self.color_code.filter(|s| !s.is_empty()) {
            event.color_code = color_code;
        }
        if let Some(classification) = self.classification.filter(|s| !s.is_empty()) {
            event.classification = classification;
        }
        event.updated_at = Utc::now();
    }
}

/// Request payload for accepting or rejecting a sharing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveShareRequest {
    pub request_id: String,
    pub user_id: String,
}

/// Response payload for operations that create a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: RecordId,
}

/// Response payload for an availability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    fn sample_event() -> Event {
        Event::new(RecordId::new(), "Planning", at(9), at(10), "#3B82F6", "work")
    }

    #[test]
    fn test_apply_to_overrides_provided_fields() {
        let mut event = sample_event();
        let before = event.updated_at;

        UpdateEventRequest::new()
            .with_name("Retro")
            .with_end(at(11))
            .apply_to(&mut event);

        assert_eq!(event.name, "Retro");
        assert_eq!(event.start, at(9));
        assert_eq!(event.end, at(11));
        assert_eq!(event.classification, "work");
        assert!(event.updated_at >= before);
    }

    #[test]
    fn test_apply_to_keeps_value_for_empty_string() {
        let mut event = sample_event();

        UpdateEventRequest::new()
            .with_classification("")
            .with_color_code("")
            .apply_to(&mut event);

        assert_eq!(event.classification, "work");
        assert_eq!(event.color_code, "#3B82F6");
    }

    #[test]
    fn test_update_payload_falsy_json_keeps_values() {
        let payload: UpdateEventRequest = serde_json::from_str(
            r#"{"classification": "", "name": 0, "color_code": null, "start": false}"#,
        )
        .unwrap();
        let mut event = sample_event();

        payload.apply_to(&mut event);

        assert_eq!(event.classification, "work");
        assert_eq!(event.name, "Planning");
        assert_eq!(event.color_code, "#3B82F6");
        assert_eq!(event.start, at(9));
    }

    #[test]
    fn test_create_event_payload_accepts_naive_datetimes() {
        let payload: CreateEventRequest = serde_json::from_str(
            r#"{
                "user_id": "65a1b2c3d4e5f60718293a4b",
                "name": "Standup",
                "start": "2024-01-01T10:00",
                "end": "2024-01-01T10:15",
                "color_code": "green",
                "classification": "work",
                "share_event": ""
            }"#,
        )
        .unwrap();

        assert_eq!(payload.start, at(10));
        assert_eq!(payload.share_event, None);
        assert_eq!(payload.schedule_id, None);
    }

    #[test]
    fn test_update_schedule_request_is_empty() {
        assert!(UpdateScheduleRequest::new().is_empty());
        assert!(!UpdateScheduleRequest::new().with_name("Home").is_empty());
    }
}
