use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::calendar::{
    Event, EventFilter, MembershipKind, RecordId, RequestStatus, Schedule, ShareRequest, User,
};

use super::Result;

/// Repository for user operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID.
    async fn get_user(&self, id: &RecordId) -> Result<Option<User>>;

    /// Gets a user by their email address.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Creates a new user. Fails with `AlreadyExists` if the email is taken.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Appends an event id to one of the user's membership lists.
    ///
    /// The append is atomic and set-like. Returns `false` if the id was
    /// already present. Fails with `NotFound` if the user does not exist.
    async fn add_event_membership(
        &self,
        user_id: &RecordId,
        kind: MembershipKind,
        event_id: &RecordId,
    ) -> Result<bool>;

    /// Removes an event id from one of the user's membership lists.
    ///
    /// Returns `false` if the id was not present.
    async fn remove_event_membership(
        &self,
        user_id: &RecordId,
        kind: MembershipKind,
        event_id: &RecordId,
    ) -> Result<bool>;

    /// Removes an event id from every user's lists. Returns the number of
    /// users that changed.
    async fn unlink_event(&self, event_id: &RecordId) -> Result<u64>;
}

/// Repository for schedule operations.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn get_schedule(&self, id: &RecordId) -> Result<Option<Schedule>>;

    /// Gets all schedules owned by a user, oldest first.
    async fn get_schedules_by_user(&self, user_id: &RecordId) -> Result<Vec<Schedule>>;

    async fn create_schedule(&self, schedule: &Schedule) -> Result<()>;

    /// Replaces a stored schedule. Fails with `NotFound` if it does not exist.
    async fn update_schedule(&self, schedule: &Schedule) -> Result<()>;

    /// Deletes a schedule. Returns `false` if nothing was deleted.
    async fn delete_schedule(&self, id: &RecordId) -> Result<bool>;
}

/// Repository for event operations.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn get_event(&self, id: &RecordId) -> Result<Option<Event>>;

    /// Gets every event whose id is in `ids`. Unknown ids are skipped.
    async fn get_events_by_ids(&self, ids: &[RecordId]) -> Result<Vec<Event>>;

    /// Gets every event matching `filter`, sorted by start.
    async fn find_events(&self, filter: &EventFilter) -> Result<Vec<Event>>;

    async fn create_event(&self, event: &Event) -> Result<()>;

    /// Replaces a stored event. Fails with `NotFound` if it does not exist.
    async fn update_event(&self, event: &Event) -> Result<()>;

    /// Deletes an event. Returns `false` if nothing was deleted.
    async fn delete_event(&self, id: &RecordId) -> Result<bool>;
}

/// Repository for sharing request operations.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn get_request(&self, id: &RecordId) -> Result<Option<ShareRequest>>;

    /// Gets pending requests addressed to `receiver_email`, oldest first.
    async fn get_pending_requests(&self, receiver_email: &str) -> Result<Vec<ShareRequest>>;

    async fn create_request(&self, request: &ShareRequest) -> Result<()>;

    /// Moves a request from `from` to `to` if it is still in `from`.
    ///
    /// Returns `false` when the request is missing or in another state, so
    /// two concurrent transitions cannot both succeed.
    async fn transition_request(
        &self,
        id: &RecordId,
        from: RequestStatus,
        to: RequestStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool>;

    /// Deletes a request. Returns `false` if nothing was deleted.
    async fn delete_request(&self, id: &RecordId) -> Result<bool>;

    /// Deletes the pending requests that embed `event_id`. Resolved requests
    /// are kept. Returns how many were deleted.
    async fn delete_pending_for_event(&self, event_id: &RecordId) -> Result<u64>;
}
