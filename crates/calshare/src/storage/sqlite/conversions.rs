//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use calshare_core::calendar::{
    Event, EventMemberships, MembershipKind, RecordId, RequestStatus, Schedule, ShareRequest, User,
};
use calshare_core::storage::RepositoryError;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;

// ============================================================================
// User conversions
// ============================================================================

/// Convert a SQLite row to a User with empty membership lists.
///
/// Expected columns: id, email, display_name, created_at, updated_at
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let email: String = row.get(1)?;
    let display_name: String = row.get(2)?;
    let created_at: String = row.get(3)?;
    let updated_at: String = row.get(4)?;

    Ok(User {
        id: parse_id(&id)?,
        email,
        display_name,
        events: EventMemberships::default(),
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Convert a membership row into its event id and list kind.
///
/// Expected columns: event_id, kind
pub fn row_to_membership(row: &Row) -> rusqlite::Result<(RecordId, MembershipKind)> {
    let event_id: String = row.get(0)?;
    let kind: String = row.get(1)?;
    Ok((parse_id(&event_id)?, parse_kind(&kind)?))
}

// ============================================================================
// Schedule conversions
// ============================================================================

/// Convert a SQLite row to a Schedule.
///
/// Expected columns: id, user_id, name, created_at, updated_at
pub fn row_to_schedule(row: &Row) -> rusqlite::Result<Schedule> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let name: String = row.get(2)?;
    let created_at: String = row.get(3)?;
    let updated_at: String = row.get(4)?;

    Ok(Schedule {
        id: parse_id(&id)?,
        user_id: parse_id(&user_id)?,
        name,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

// ============================================================================
// Event conversions
// ============================================================================

/// Convert a SQLite row to an Event.
///
/// Expected columns: id, user_id, name, start_at, end_at, color_code,
/// classification, schedule_id, schedule_name, created_at, updated_at
pub fn row_to_event(row: &Row) -> rusqlite::Result<Event> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let name: String = row.get(2)?;
    let start: String = row.get(3)?;
    let end: String = row.get(4)?;
    let color_code: String = row.get(5)?;
    let classification: String = row.get(6)?;
    let schedule_id: Option<String> = row.get(7)?;
    let schedule_name: Option<String> = row.get(8)?;
    let created_at: String = row.get(9)?;
    let updated_at: String = row.get(10)?;

    Ok(Event {
        id: parse_id(&id)?,
        user_id: parse_id(&user_id)?,
        name,
        start: parse_datetime(&start)?,
        end: parse_datetime(&end)?,
        color_code,
        classification,
        schedule_id: schedule_id.as_deref().map(parse_id).transpose()?,
        schedule_name,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

// ============================================================================
// Request conversions
// ============================================================================

/// Convert a SQLite row to a ShareRequest.
///
/// Expected columns: id, sender_email, receiver_email, event, status,
/// created_at, updated_at
pub fn row_to_request(row: &Row) -> rusqlite::Result<ShareRequest> {
    let id: String = row.get(0)?;
    let sender_email: String = row.get(1)?;
    let receiver_email: String = row.get(2)?;
    let event_json: String = row.get(3)?;
    let status: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(ShareRequest {
        id: parse_id(&id)?,
        sender_email,
        receiver_email,
        event: json_to_event_internal(&event_json)?,
        status: parse_status(&status)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Serialize an embedded event snapshot to JSON.
pub fn event_to_json(event: &Event) -> Result<String, RepositoryError> {
    serde_json::to_string(event).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

fn json_to_event_internal(json: &str) -> rusqlite::Result<Event> {
    serde_json::from_str(json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

// ============================================================================
// Helper functions
// ============================================================================

fn conversion_error(message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

/// Parse a record id from string.
fn parse_id(s: &str) -> rusqlite::Result<RecordId> {
    RecordId::parse(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_kind(s: &str) -> rusqlite::Result<MembershipKind> {
    match s {
        "organizing" => Ok(MembershipKind::Organizing),
        "attending" => Ok(MembershipKind::Attending),
        _ => Err(conversion_error(format!("Unknown membership kind: {s}"))),
    }
}

fn parse_status(s: &str) -> rusqlite::Result<RequestStatus> {
    RequestStatus::parse(s).ok_or_else(|| conversion_error(format!("Unknown request status: {s}")))
}

/// Format a DateTime<Utc> for SQLite storage.
///
/// Fixed-width RFC 3339 with microseconds and a `Z` suffix, so stored values
/// compare correctly as strings.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// `0000-01-01T00:00:00Z`, the first instant with a four-digit year.
pub fn min_storable() -> DateTime<Utc> {
    DateTime::from_timestamp(-62_167_219_200, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// `9999-12-31T23:59:59.999999Z`. Later years format as `+10000-…` and
/// would compare below every stored value.
pub fn max_storable() -> DateTime<Utc> {
    DateTime::from_timestamp_micros(253_402_300_799_999_999).unwrap_or(DateTime::<Utc>::MAX_UTC)
}
