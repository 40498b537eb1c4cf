//! SQLite schema definitions and SQL query constants.
//!
//! This module contains all SQL statements used by the SQLite repository,
//! following the Functional Core pattern - pure data, no I/O.

use calshare_core::calendar::EventFilter;

use chrono::{DateTime, Utc};

use super::conversions::{format_datetime, max_storable, min_storable};

/// SQL statement to create all tables.
///
/// Membership lists live in `user_events`; the composite primary key keeps
/// each list free of duplicates and `rowid` preserves append order.
pub const CREATE_TABLES: &str = r#"
-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Membership lists (organizing / attending)
CREATE TABLE IF NOT EXISTS user_events (
    user_id TEXT NOT NULL,
    event_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    PRIMARY KEY (user_id, event_id, kind)
);

-- Schedules table
CREATE TABLE IF NOT EXISTS schedules (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Events table
CREATE TABLE IF NOT EXISTS events (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    start_at TEXT NOT NULL,
    end_at TEXT NOT NULL,
    color_code TEXT NOT NULL,
    classification TEXT NOT NULL,
    schedule_id TEXT,
    schedule_name TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Sharing requests table (event snapshot stored as JSON)
CREATE TABLE IF NOT EXISTS requests (
    id TEXT PRIMARY KEY,
    sender_email TEXT NOT NULL,
    receiver_email TEXT NOT NULL,
    event TEXT NOT NULL,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_user_events_event_id ON user_events(event_id);
CREATE INDEX IF NOT EXISTS idx_schedules_user_id ON schedules(user_id);
CREATE INDEX IF NOT EXISTS idx_events_schedule_start ON events(schedule_id, start_at);
CREATE INDEX IF NOT EXISTS idx_events_user_id ON events(user_id);
CREATE INDEX IF NOT EXISTS idx_requests_receiver_status ON requests(receiver_email, status);
"#;

// User queries
pub const INSERT_USER: &str = r#"
INSERT INTO users (id, email, display_name, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, email, display_name, created_at, updated_at
FROM users
WHERE id = ?1
"#;

pub const SELECT_USER_BY_EMAIL: &str = r#"
SELECT id, email, display_name, created_at, updated_at
FROM users
WHERE email = ?1
"#;

pub const TOUCH_USER: &str = r#"
UPDATE users
SET updated_at = ?2
WHERE id = ?1
"#;

// Membership queries
pub const SELECT_MEMBERSHIPS_FOR_USER: &str = r#"
SELECT event_id, kind
FROM user_events
WHERE user_id = ?1
ORDER BY rowid ASC
"#;

pub const INSERT_MEMBERSHIP: &str = r#"
INSERT OR IGNORE INTO user_events (user_id, event_id, kind)
VALUES (?1, ?2, ?3)
"#;

pub const DELETE_MEMBERSHIP: &str = r#"
DELETE FROM user_events
WHERE user_id = ?1 AND event_id = ?2 AND kind = ?3
"#;

pub const SELECT_USERS_FOR_EVENT: &str = r#"
SELECT DISTINCT user_id
FROM user_events
WHERE event_id = ?1
"#;

pub const DELETE_MEMBERSHIPS_FOR_EVENT: &str = r#"
DELETE FROM user_events
WHERE event_id = ?1
"#;

// Schedule queries
pub const INSERT_SCHEDULE: &str = r#"
INSERT INTO schedules (id, user_id, name, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_SCHEDULE_BY_ID: &str = r#"
SELECT id, user_id, name, created_at, updated_at
FROM schedules
WHERE id = ?1
"#;

pub const SELECT_SCHEDULES_BY_USER: &str = r#"
SELECT id, user_id, name, created_at, updated_at
FROM schedules
WHERE user_id = ?1
ORDER BY created_at ASC, id ASC
"#;

pub const UPDATE_SCHEDULE: &str = r#"
UPDATE schedules
SET user_id = ?2, name = ?3, updated_at = ?4
WHERE id = ?1
"#;

pub const DELETE_SCHEDULE: &str = r#"
DELETE FROM schedules
WHERE id = ?1
"#;

// Event queries
pub const EVENT_COLUMNS: &str = "id, user_id, name, start_at, end_at, color_code, \
    classification, schedule_id, schedule_name, created_at, updated_at";

pub const INSERT_EVENT: &str = r#"
INSERT INTO events (id, user_id, name, start_at, end_at, color_code, classification,
                    schedule_id, schedule_name, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
"#;

pub const SELECT_EVENT_BY_ID: &str = r#"
SELECT id, user_id, name, start_at, end_at, color_code, classification,
       schedule_id, schedule_name, created_at, updated_at
FROM events
WHERE id = ?1
"#;

pub const UPDATE_EVENT: &str = r#"
UPDATE events
SET name = ?2, start_at = ?3, end_at = ?4, color_code = ?5, classification = ?6,
    schedule_id = ?7, schedule_name = ?8, updated_at = ?9
WHERE id = ?1
"#;

pub const DELETE_EVENT: &str = r#"
DELETE FROM events
WHERE id = ?1
"#;

// Request queries
pub const INSERT_REQUEST: &str = r#"
INSERT INTO requests (id, sender_email, receiver_email, event, status, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_REQUEST_BY_ID: &str = r#"
SELECT id, sender_email, receiver_email, event, status, created_at, updated_at
FROM requests
WHERE id = ?1
"#;

pub const SELECT_PENDING_REQUESTS_BY_RECEIVER: &str = r#"
SELECT id, sender_email, receiver_email, event, status, created_at, updated_at
FROM requests
WHERE receiver_email = ?1 AND status = 'pending'
ORDER BY created_at ASC, id ASC
"#;

pub const TRANSITION_REQUEST: &str = r#"
UPDATE requests
SET status = ?3, updated_at = ?4
WHERE id = ?1 AND status = ?2
"#;

pub const DELETE_REQUEST: &str = r#"
DELETE FROM requests
WHERE id = ?1
"#;

pub const DELETE_PENDING_REQUESTS_FOR_EVENT: &str = r#"
DELETE FROM requests
WHERE status = 'pending' AND json_extract(event, '$.id') = ?1
"#;

/// Lower bound clamped to the first storable instant.
fn format_lower(min: &DateTime<Utc>) -> String {
    format_datetime(&(*min).max(min_storable()))
}

/// Comparison and value for an upper bound. Bounds past the last storable
/// instant become `<=` that instant, which every stored value satisfies.
fn upper(max: &DateTime<Utc>, inclusive: bool) -> (&'static str, String) {
    let last = max_storable();
    if *max > last {
        ("<=", format_datetime(&last))
    } else {
        (if inclusive { "<=" } else { "<" }, format_datetime(max))
    }
}

/// Builds a `SELECT` over `events` for an [`EventFilter`].
///
/// Returns the SQL text and its positional parameters. Timestamps are stored
/// in a fixed-width UTC format, so string comparison orders them correctly
/// for years 0000 through 9999. Bounds outside that range are clamped.
pub fn select_events_matching(filter: &EventFilter) -> (String, Vec<String>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<String> = Vec::new();

    let mut push = |clause: &str, value: String| {
        params.push(value);
        clauses.push(clause.replace('?', &format!("?{}", params.len())));
    };

    if let Some(user_id) = &filter.user_id {
        push("user_id = ?", user_id.to_string());
    }
    if let Some(schedule_id) = &filter.schedule_id {
        push("schedule_id = ?", schedule_id.to_string());
    }
    if let Some(color_code) = &filter.color_code {
        push("color_code = ?", color_code.clone());
    }
    if let Some(classification) = &filter.classification {
        push("classification = ?", classification.clone());
    }
    if let Some(bounds) = &filter.starts_within {
        push("start_at >= ?", format_lower(&bounds.min));
        let (op, value) = upper(&bounds.max, bounds.max_inclusive);
        push(&format!("start_at {op} ?"), value);
    }
    if let Some(bounds) = &filter.ends_within {
        push("end_at >= ?", format_lower(&bounds.min));
        let (op, value) = upper(&bounds.max, bounds.max_inclusive);
        push(&format!("end_at {op} ?"), value);
    }
    if let Some((start, end)) = &filter.overlapping {
        let (op, value) = upper(end, false);
        push(&format!("start_at {op} ?"), value);
        let op = if *start < min_storable() { ">=" } else { ">" };
        push(&format!("end_at {op} ?"), format_lower(start));
    }

    let mut sql = format!("SELECT {EVENT_COLUMNS} FROM events");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY start_at ASC, end_at ASC, id ASC");

    (sql, params)
}

/// Builds a `SELECT` over `events` for a list of ids.
pub fn select_events_by_ids(count: usize) -> String {
    let placeholders: Vec<String> = (1..=count).map(|i| format!("?{i}")).collect();
    format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE id IN ({}) \
         ORDER BY start_at ASC, end_at ASC, id ASC",
        placeholders.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use calshare_core::calendar::{RecordId, TimeBounds};
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_create_tables_is_valid_sql() {
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS users"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS user_events"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS schedules"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS events"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS requests"));
    }

    #[test]
    fn test_membership_insert_is_set_like() {
        assert!(INSERT_MEMBERSHIP.contains("INSERT OR IGNORE"));
    }

    #[test]
    fn test_empty_filter_selects_everything() {
        let (sql, params) = select_events_matching(&EventFilter::new());
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY start_at ASC, end_at ASC, id ASC"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_filter_numbers_placeholders_in_order() {
        let schedule = RecordId::new();
        let filter = EventFilter::new()
            .schedule(schedule.clone())
            .classification("work");

        let (sql, params) = select_events_matching(&filter);

        assert!(sql.contains("WHERE schedule_id = ?1 AND classification = ?2"));
        assert_eq!(params, vec![schedule.to_string(), "work".to_string()]);
    }

    #[test]
    fn test_day_filter_is_half_open() {
        let day = TimeBounds::day(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let (sql, params) = select_events_matching(&EventFilter::new().starts_within(day));

        assert!(sql.contains("start_at >= ?1 AND start_at < ?2"));
        assert_eq!(params[0], "2024-01-01T00:00:00.000000Z");
        assert_eq!(params[1], "2024-01-02T00:00:00.000000Z");
    }

    #[test]
    fn test_day_filter_past_year_9999_is_clamped() {
        let day = TimeBounds::day(NaiveDate::from_ymd_opt(9999, 12, 31).unwrap());
        let (sql, params) = select_events_matching(&EventFilter::new().starts_within(day));

        assert!(sql.contains("start_at >= ?1 AND start_at <= ?2"));
        assert_eq!(params[0], "9999-12-31T00:00:00.000000Z");
        assert_eq!(params[1], "9999-12-31T23:59:59.999999Z");
    }

    #[test]
    fn test_overlap_filter() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap();
        let (sql, _) = select_events_matching(&EventFilter::new().overlapping(start, end));

        assert!(sql.contains("start_at < ?1 AND end_at > ?2"));
    }

    #[test]
    fn test_select_by_ids_placeholders() {
        assert!(select_events_by_ids(3).contains("IN (?1, ?2, ?3)"));
    }
}
