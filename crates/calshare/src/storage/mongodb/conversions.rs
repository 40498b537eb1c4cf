//! MongoDB document shapes and filter builders.
//!
//! Identifiers are stored as hex strings in `_id`; timestamps as native BSON
//! dates (millisecond precision).

use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc, serde_helpers::chrono_datetime_as_bson_datetime, Document};
use serde::{Deserialize, Serialize};

use calshare_core::calendar::{
    Event, EventFilter, EventMemberships, RecordId, RequestStatus, Schedule, ShareRequest,
    TimeBounds, User,
};

pub const USERS: &str = "users";
pub const SCHEDULES: &str = "schedules";
pub const EVENTS: &str = "events";
pub const REQUESTS: &str = "requests";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub events: EventMemberships,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            events: user.events.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id,
            email: doc.email,
            display_name: doc.display_name,
            events: doc.events,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDocument {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub user_id: RecordId,
    pub name: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Schedule> for ScheduleDocument {
    fn from(schedule: &Schedule) -> Self {
        Self {
            id: schedule.id.clone(),
            user_id: schedule.user_id.clone(),
            name: schedule.name.clone(),
            created_at: schedule.created_at,
            updated_at: schedule.updated_at,
        }
    }
}

impl From<ScheduleDocument> for Schedule {
    fn from(doc: ScheduleDocument) -> Self {
        Self {
            id: doc.id,
            user_id: doc.user_id,
            name: doc.name,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDocument {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub user_id: RecordId,
    pub name: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub start: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub end: DateTime<Utc>,
    pub color_code: String,
    pub classification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_name: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<&Event> for EventDocument {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            user_id: event.user_id.clone(),
            name: event.name.clone(),
            start: event.start,
            end: event.end,
            color_code: event.color_code.clone(),
            classification: event.classification.clone(),
            schedule_id: event.schedule_id.clone(),
            schedule_name: event.schedule_name.clone(),
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

impl From<EventDocument> for Event {
    fn from(doc: EventDocument) -> Self {
        Self {
            id: doc.id,
            user_id: doc.user_id,
            name: doc.name,
            start: doc.start,
            end: doc.end,
            color_code: doc.color_code,
            classification: doc.classification,
            schedule_id: doc.schedule_id,
            schedule_name: doc.schedule_name,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDocument {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub sender_email: String,
    pub receiver_email: String,
    pub event: EventDocument,
    pub status: RequestStatus,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl From<&ShareRequest> for RequestDocument {
    fn from(request: &ShareRequest) -> Self {
        Self {
            id: request.id.clone(),
            sender_email: request.sender_email.clone(),
            receiver_email: request.receiver_email.clone(),
            event: EventDocument::from(&request.event),
            status: request.status,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

impl From<RequestDocument> for ShareRequest {
    fn from(doc: RequestDocument) -> Self {
        Self {
            id: doc.id,
            sender_email: doc.sender_email,
            receiver_email: doc.receiver_email,
            event: doc.event.into(),
            status: doc.status,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// Converts a chrono timestamp into a BSON date for query documents.
pub fn to_bson_date(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_chrono(dt)
}

/// Path of a membership list inside a user document.
pub fn membership_path(kind: calshare_core::calendar::MembershipKind) -> String {
    format!("events.{}", kind.as_str())
}

fn bounds_to_document(bounds: &TimeBounds) -> Document {
    let upper = if bounds.max_inclusive { "$lte" } else { "$lt" };
    let mut range = doc! { "$gte": to_bson_date(bounds.min) };
    range.insert(upper, to_bson_date(bounds.max));
    range
}

/// Translates an [`EventFilter`] into a MongoDB query document.
pub fn event_filter_to_document(filter: &EventFilter) -> Document {
    let mut query = Document::new();

    if let Some(user_id) = &filter.user_id {
        query.insert("user_id", user_id.as_str());
    }
    if let Some(schedule_id) = &filter.schedule_id {
        query.insert("schedule_id", schedule_id.as_str());
    }
    if let Some(color_code) = &filter.color_code {
        query.insert("color_code", color_code.as_str());
    }
    if let Some(classification) = &filter.classification {
        query.insert("classification", classification.as_str());
    }

    let mut start = filter
        .starts_within
        .as_ref()
        .map(bounds_to_document)
        .unwrap_or_default();
    let mut end = filter
        .ends_within
        .as_ref()
        .map(bounds_to_document)
        .unwrap_or_default();
    if let Some((from, until)) = filter.overlapping {
        start.insert("$lt", to_bson_date(until));
        end.insert("$gt", to_bson_date(from));
    }
    if !start.is_empty() {
        query.insert("start", start);
    }
    if !end.is_empty() {
        query.insert("end", end);
    }

    query
}

/// Sort order for event listings.
pub fn event_sort() -> Document {
    doc! { "start": 1, "end": 1, "_id": 1 }
}
