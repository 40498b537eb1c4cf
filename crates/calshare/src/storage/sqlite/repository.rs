//! SQLite repository implementation.
//!
//! Implements the repository traits from `calshare_core::storage` using SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use calshare_core::calendar::{
    Event, EventFilter, MembershipKind, RecordId, RequestStatus, Schedule, ShareRequest, User,
};
use calshare_core::storage::{
    EventRepository, RepositoryError, RequestRepository, Result, ScheduleRepository,
    UserRepository,
};

use super::conversions::{
    event_to_json, format_datetime, row_to_event, row_to_membership, row_to_request,
    row_to_schedule, row_to_user,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Loads a user row and fills in its membership lists.
fn load_user(
    conn: &rusqlite::Connection,
    sql: &str,
    key: &str,
) -> rusqlite::Result<Option<User>> {
    let Some(mut user) = conn.query_row(sql, [key], row_to_user).optional()? else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(schema::SELECT_MEMBERSHIPS_FOR_USER)?;
    let rows = stmt.query_map([user.id.as_str()], row_to_membership)?;
    for row in rows {
        let (event_id, kind) = row?;
        user.events.add(kind, event_id);
    }

    Ok(Some(user))
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all entity types.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, id: &RecordId) -> Result<Option<User>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| load_user(conn, schema::SELECT_USER_BY_ID, &id_str).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id.to_string()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();

        self.conn
            .call(move |conn| {
                load_user(conn, schema::SELECT_USER_BY_EMAIL, &email).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User"))
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let id = user.id.to_string();
        let email = user.email.clone();
        let display_name = user.display_name.clone();
        let created_at = format_datetime(&user.created_at);
        let updated_at = format_datetime(&user.updated_at);
        let memberships: Vec<(String, &'static str)> = user
            .events
            .organizing
            .iter()
            .map(|e| (e.to_string(), MembershipKind::Organizing.as_str()))
            .chain(
                user.events
                    .attending
                    .iter()
                    .map(|e| (e.to_string(), MembershipKind::Attending.as_str())),
            )
            .collect();
        let user_email = user.email.clone();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(
                    schema::INSERT_USER,
                    rusqlite::params![id, email, display_name, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                for (event_id, kind) in &memberships {
                    tx.execute(schema::INSERT_MEMBERSHIP, rusqlite::params![id, event_id, kind])
                        .map_err(wrap_err)?;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user_email))
    }

    async fn add_event_membership(
        &self,
        user_id: &RecordId,
        kind: MembershipKind,
        event_id: &RecordId,
    ) -> Result<bool> {
        let user_id_str = user_id.to_string();
        let event_id_str = event_id.to_string();
        let now = format_datetime(&Utc::now());

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let touched = tx
                    .execute(schema::TOUCH_USER, rusqlite::params![user_id_str, now])
                    .map_err(wrap_err)?;
                if touched == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                let inserted = tx
                    .execute(
                        schema::INSERT_MEMBERSHIP,
                        rusqlite::params![user_id_str, event_id_str, kind.as_str()],
                    )
                    .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(inserted > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user_id.to_string()))
    }

    async fn remove_event_membership(
        &self,
        user_id: &RecordId,
        kind: MembershipKind,
        event_id: &RecordId,
    ) -> Result<bool> {
        let user_id_str = user_id.to_string();
        let event_id_str = event_id.to_string();
        let now = format_datetime(&Utc::now());

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let removed = tx
                    .execute(
                        schema::DELETE_MEMBERSHIP,
                        rusqlite::params![user_id_str, event_id_str, kind.as_str()],
                    )
                    .map_err(wrap_err)?;
                if removed > 0 {
                    tx.execute(schema::TOUCH_USER, rusqlite::params![user_id_str, now])
                        .map_err(wrap_err)?;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(removed > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user_id.to_string()))
    }

    async fn unlink_event(&self, event_id: &RecordId) -> Result<u64> {
        let event_id_str = event_id.to_string();
        let now = format_datetime(&Utc::now());

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let user_ids: Vec<String> = {
                    let mut stmt = tx
                        .prepare(schema::SELECT_USERS_FOR_EVENT)
                        .map_err(wrap_err)?;
                    let rows = stmt
                        .query_map([&event_id_str], |row| row.get::<_, String>(0))
                        .map_err(wrap_err)?;
                    rows.collect::<rusqlite::Result<_>>().map_err(wrap_err)?
                };
                tx.execute(schema::DELETE_MEMBERSHIPS_FOR_EVENT, [&event_id_str])
                    .map_err(wrap_err)?;
                for user_id in &user_ids {
                    tx.execute(schema::TOUCH_USER, rusqlite::params![user_id, now])
                        .map_err(wrap_err)?;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(user_ids.len() as u64)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Event", event_id.to_string()))
    }
}

// ============================================================================
// ScheduleRepository implementation
// ============================================================================

#[async_trait]
impl ScheduleRepository for SqliteRepository {
    async fn get_schedule(&self, id: &RecordId) -> Result<Option<Schedule>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_SCHEDULE_BY_ID, [&id_str], row_to_schedule)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Schedule", id.to_string()))
    }

    async fn get_schedules_by_user(&self, user_id: &RecordId) -> Result<Vec<Schedule>> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_SCHEDULES_BY_USER)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&user_id_str], row_to_schedule)
                    .map_err(wrap_err)?;

                let mut schedules = Vec::new();
                for row_result in rows {
                    schedules.push(row_result.map_err(wrap_err)?);
                }
                Ok(schedules)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_schedule(&self, schedule: &Schedule) -> Result<()> {
        let id = schedule.id.to_string();
        let user_id = schedule.user_id.to_string();
        let name = schedule.name.clone();
        let created_at = format_datetime(&schedule.created_at);
        let updated_at = format_datetime(&schedule.updated_at);
        let schedule_id = schedule.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_SCHEDULE,
                    rusqlite::params![id, user_id, name, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Schedule", schedule_id))
    }

    async fn update_schedule(&self, schedule: &Schedule) -> Result<()> {
        let id = schedule.id.to_string();
        let user_id = schedule.user_id.to_string();
        let name = schedule.name.clone();
        let updated_at = format_datetime(&schedule.updated_at);
        let schedule_id = schedule.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_SCHEDULE,
                        rusqlite::params![id, user_id, name, updated_at],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Schedule", schedule_id))
    }

    async fn delete_schedule(&self, id: &RecordId) -> Result<bool> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_SCHEDULE, [&id_str])
                    .map_err(wrap_err)?;
                Ok(rows > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Schedule", id.to_string()))
    }
}

// ============================================================================
// EventRepository implementation
// ============================================================================

#[async_trait]
impl EventRepository for SqliteRepository {
    async fn get_event(&self, id: &RecordId) -> Result<Option<Event>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_EVENT_BY_ID, [&id_str], row_to_event)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Event", id.to_string()))
    }

    async fn get_events_by_ids(&self, ids: &[RecordId]) -> Result<Vec<Event>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = schema::select_events_by_ids(ids.len());
        let params: Vec<String> = ids.iter().map(|id| id.to_string()).collect();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(params.iter()), row_to_event)
                    .map_err(wrap_err)?;

                let mut events = Vec::new();
                for row_result in rows {
                    events.push(row_result.map_err(wrap_err)?);
                }
                Ok(events)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn find_events(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let (sql, params) = schema::select_events_matching(filter);

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(params.iter()), row_to_event)
                    .map_err(wrap_err)?;

                let mut events = Vec::new();
                for row_result in rows {
                    events.push(row_result.map_err(wrap_err)?);
                }
                Ok(events)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_event(&self, event: &Event) -> Result<()> {
        let id = event.id.to_string();
        let user_id = event.user_id.to_string();
        let name = event.name.clone();
        let start = format_datetime(&event.start);
        let end = format_datetime(&event.end);
        let color_code = event.color_code.clone();
        let classification = event.classification.clone();
        let schedule_id = event.schedule_id.as_ref().map(|s| s.to_string());
        let schedule_name = event.schedule_name.clone();
        let created_at = format_datetime(&event.created_at);
        let updated_at = format_datetime(&event.updated_at);
        let event_id = event.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_EVENT,
                    rusqlite::params![
                        id,
                        user_id,
                        name,
                        start,
                        end,
                        color_code,
                        classification,
                        schedule_id,
                        schedule_name,
                        created_at,
                        updated_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Event", event_id))
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        let id = event.id.to_string();
        let name = event.name.clone();
        let start = format_datetime(&event.start);
        let end = format_datetime(&event.end);
        let color_code = event.color_code.clone();
        let classification = event.classification.clone();
        let schedule_id = event.schedule_id.as_ref().map(|s| s.to_string());
        let schedule_name = event.schedule_name.clone();
        let updated_at = format_datetime(&event.updated_at);
        let event_id = event.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_EVENT,
                        rusqlite::params![
                            id,
                            name,
                            start,
                            end,
                            color_code,
                            classification,
                            schedule_id,
                            schedule_name,
                            updated_at
                        ],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Event", event_id))
    }

    async fn delete_event(&self, id: &RecordId) -> Result<bool> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_EVENT, [&id_str])
                    .map_err(wrap_err)?;
                Ok(rows > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Event", id.to_string()))
    }
}

// ============================================================================
// RequestRepository implementation
// ============================================================================

#[async_trait]
impl RequestRepository for SqliteRepository {
    async fn get_request(&self, id: &RecordId) -> Result<Option<ShareRequest>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_REQUEST_BY_ID, [&id_str], row_to_request)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "ShareRequest", id.to_string()))
    }

    async fn get_pending_requests(&self, receiver_email: &str) -> Result<Vec<ShareRequest>> {
        let email = receiver_email.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_PENDING_REQUESTS_BY_RECEIVER)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([&email], row_to_request).map_err(wrap_err)?;

                let mut requests = Vec::new();
                for row_result in rows {
                    requests.push(row_result.map_err(wrap_err)?);
                }
                Ok(requests)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_request(&self, request: &ShareRequest) -> Result<()> {
        let id = request.id.to_string();
        let sender_email = request.sender_email.clone();
        let receiver_email = request.receiver_email.clone();
        let event_json = event_to_json(&request.event)?;
        let status = request.status.as_str();
        let created_at = format_datetime(&request.created_at);
        let updated_at = format_datetime(&request.updated_at);
        let request_id = request.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_REQUEST,
                    rusqlite::params![
                        id,
                        sender_email,
                        receiver_email,
                        event_json,
                        status,
                        created_at,
                        updated_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "ShareRequest", request_id))
    }

    async fn transition_request(
        &self,
        id: &RecordId,
        from: RequestStatus,
        to: RequestStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let id_str = id.to_string();
        let updated_at = format_datetime(&updated_at);

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::TRANSITION_REQUEST,
                        rusqlite::params![id_str, from.as_str(), to.as_str(), updated_at],
                    )
                    .map_err(wrap_err)?;
                Ok(rows > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "ShareRequest", id.to_string()))
    }

    async fn delete_request(&self, id: &RecordId) -> Result<bool> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_REQUEST, [&id_str])
                    .map_err(wrap_err)?;
                Ok(rows > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "ShareRequest", id.to_string()))
    }

    async fn delete_pending_for_event(&self, event_id: &RecordId) -> Result<u64> {
        let id_str = event_id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_PENDING_REQUESTS_FOR_EVENT, [&id_str])
                    .map_err(wrap_err)?;
                Ok(rows as u64)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "ShareRequest"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calshare_core::calendar::TimeBounds;
    use chrono::{NaiveDate, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
    }

    async fn setup() -> SqliteRepository {
        SqliteRepository::new_in_memory().await.unwrap()
    }

    fn event(user_id: &RecordId, name: &str, day: u32, hour: u32) -> Event {
        Event::new(user_id.clone(), name, at(day, hour), at(day, hour + 1), "blue", "work")
    }

    // ==================== User Tests ====================

    #[tokio::test]
    async fn test_user_create_and_get() {
        let repo = setup().await;
        let user = User::new("ada@example.com", "Ada");

        repo.create_user(&user).await.unwrap();

        let by_id = repo.get_user(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ada@example.com");
        assert_eq!(by_id.display_name, "Ada");
        assert!(by_id.events.is_empty());

        let by_email = repo.get_user_by_email("ada@example.com").await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_user_get_nonexistent() {
        let repo = setup().await;
        assert!(repo.get_user(&RecordId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_duplicate_email() {
        let repo = setup().await;
        repo.create_user(&User::new("ada@example.com", "Ada"))
            .await
            .unwrap();

        let result = repo.create_user(&User::new("ada@example.com", "Ada 2")).await;
        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_membership_append_order_and_dedup() {
        let repo = setup().await;
        let user = User::new("ada@example.com", "Ada");
        repo.create_user(&user).await.unwrap();
        let first = RecordId::new();
        let second = RecordId::new();

        for id in [&first, &second, &first] {
            repo.add_event_membership(&user.id, MembershipKind::Organizing, id)
                .await
                .unwrap();
        }
        repo.add_event_membership(&user.id, MembershipKind::Attending, &second)
            .await
            .unwrap();

        let stored = repo.get_user(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.events.organizing, vec![first.clone(), second.clone()]);
        assert_eq!(stored.events.attending, vec![second.clone()]);

        assert!(repo
            .remove_event_membership(&user.id, MembershipKind::Organizing, &first)
            .await
            .unwrap());
        assert_eq!(repo.unlink_event(&second).await.unwrap(), 1);
        assert!(repo.get_user(&user.id).await.unwrap().unwrap().events.is_empty());
    }

    #[tokio::test]
    async fn test_membership_add_unknown_user() {
        let repo = setup().await;
        let result = repo
            .add_event_membership(&RecordId::new(), MembershipKind::Attending, &RecordId::new())
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    // ==================== Schedule Tests ====================

    #[tokio::test]
    async fn test_schedule_crud() {
        let repo = setup().await;
        let owner = RecordId::new();
        let mut schedule = Schedule::new(owner.clone(), "Work");

        repo.create_schedule(&schedule).await.unwrap();
        schedule.name = "Office".to_string();
        repo.update_schedule(&schedule).await.unwrap();

        let by_user = repo.get_schedules_by_user(&owner).await.unwrap();
        assert_eq!(by_user.len(), 1);
        assert_eq!(by_user[0].name, "Office");

        assert!(repo.delete_schedule(&schedule.id).await.unwrap());
        assert!(!repo.delete_schedule(&schedule.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_schedule_update_nonexistent() {
        let repo = setup().await;
        let result = repo
            .update_schedule(&Schedule::new(RecordId::new(), "Work"))
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    // ==================== Event Tests ====================

    #[tokio::test]
    async fn test_event_create_update_delete() {
        let repo = setup().await;
        let schedule = RecordId::new();
        let mut e = event(&RecordId::new(), "Planning", 10, 9).in_schedule(schedule, "Work");

        repo.create_event(&e).await.unwrap();
        e.name = "Retro".to_string();
        repo.update_event(&e).await.unwrap();

        let stored = repo.get_event(&e.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Retro");
        assert_eq!(stored.start, at(10, 9));
        assert_eq!(stored.schedule_name.as_deref(), Some("Work"));

        assert!(repo.delete_event(&e.id).await.unwrap());
        assert!(repo.get_event(&e.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_events_by_start_day() {
        let repo = setup().await;
        let user = RecordId::new();
        repo.create_event(&event(&user, "late", 10, 15)).await.unwrap();
        repo.create_event(&event(&user, "early", 10, 8)).await.unwrap();
        repo.create_event(&event(&user, "next day", 11, 0))
            .await
            .unwrap();

        let day = TimeBounds::day(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        let found = repo
            .find_events(&EventFilter::new().starts_within(day))
            .await
            .unwrap();

        let names: Vec<_> = found.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["early", "late"]);
    }

    #[tokio::test]
    async fn test_find_overlapping_events() {
        let repo = setup().await;
        let schedule = RecordId::new();
        let user = RecordId::new();
        let mut standup = event(&user, "standup", 1, 10).in_schedule(schedule.clone(), "Work");
        standup.start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 30, 0).unwrap();
        standup.end = Utc.with_ymd_and_hms(2024, 6, 1, 10, 45, 0).unwrap();
        repo.create_event(&standup).await.unwrap();

        let overlapping = repo
            .find_events(
                &EventFilter::new()
                    .schedule(schedule.clone())
                    .overlapping(at(1, 10), at(1, 11)),
            )
            .await
            .unwrap();
        assert_eq!(overlapping.len(), 1);

        let clear = repo
            .find_events(
                &EventFilter::new()
                    .schedule(schedule)
                    .overlapping(at(1, 9), at(1, 10)),
            )
            .await
            .unwrap();
        assert!(clear.is_empty());
    }

    #[tokio::test]
    async fn test_get_events_by_ids() {
        let repo = setup().await;
        let e = event(&RecordId::new(), "Planning", 10, 9);
        repo.create_event(&e).await.unwrap();

        let found = repo
            .get_events_by_ids(&[RecordId::new(), e.id.clone()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, e.id);
        assert!(repo.get_events_by_ids(&[]).await.unwrap().is_empty());
    }

    // ==================== Request Tests ====================

    #[tokio::test]
    async fn test_request_lifecycle() {
        let repo = setup().await;
        let mut e = event(&RecordId::new(), "Lunch", 10, 12);
        e.created_at = at(1, 0);
        e.updated_at = at(1, 0);
        let request = ShareRequest::pending("ada@example.com", "bob@example.com", e.clone());
        repo.create_request(&request).await.unwrap();

        let pending = repo.get_pending_requests("bob@example.com").await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].event, e);

        assert!(repo
            .transition_request(
                &request.id,
                RequestStatus::Pending,
                RequestStatus::Rejected,
                Utc::now()
            )
            .await
            .unwrap());
        assert!(!repo
            .transition_request(
                &request.id,
                RequestStatus::Pending,
                RequestStatus::Accepted,
                Utc::now()
            )
            .await
            .unwrap());

        let stored = repo.get_request(&request.id).await.unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Rejected);
        assert!(repo.delete_request(&request.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_pending_for_event_keeps_resolved() {
        let repo = setup().await;
        let lunch = event(&RecordId::new(), "Lunch", 10, 12);
        let other = event(&RecordId::new(), "Gym", 10, 7);

        let pending = ShareRequest::pending("ada@example.com", "bob@example.com", lunch.clone());
        let accepted = ShareRequest::pending("ada@example.com", "cy@example.com", lunch.clone());
        let unrelated = ShareRequest::pending("ada@example.com", "bob@example.com", other);
        for request in [&pending, &accepted, &unrelated] {
            repo.create_request(request).await.unwrap();
        }
        repo.transition_request(
            &accepted.id,
            RequestStatus::Pending,
            RequestStatus::Accepted,
            Utc::now(),
        )
        .await
        .unwrap();

        assert_eq!(repo.delete_pending_for_event(&lunch.id).await.unwrap(), 1);
        assert!(repo.get_request(&pending.id).await.unwrap().is_none());
        assert!(repo.get_request(&accepted.id).await.unwrap().is_some());
        assert!(repo.get_request(&unrelated.id).await.unwrap().is_some());
        assert_eq!(repo.delete_pending_for_event(&lunch.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_events_on_last_storable_day() {
        let repo = setup().await;
        let mut e = event(&RecordId::new(), "Last", 1, 0);
        e.start = Utc.with_ymd_and_hms(9999, 12, 31, 12, 0, 0).unwrap();
        e.end = Utc.with_ymd_and_hms(9999, 12, 31, 13, 0, 0).unwrap();
        repo.create_event(&e).await.unwrap();

        let day = TimeBounds::day(NaiveDate::from_ymd_opt(9999, 12, 31).unwrap());
        let found = repo
            .find_events(&EventFilter::new().starts_within(day))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}
