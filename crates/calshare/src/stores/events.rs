//! Event store.
//!
//! Creating an event touches up to three collections: the event itself, an
//! optional sharing request and the organizer's `organizing` list. Every
//! precondition is checked before the first write, and later failures undo
//! the earlier writes.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use calshare_core::calendar::{
    validation::{check_date, check_datetime, check_email, check_id, check_interval, check_string},
    CreateEventRequest, Event, EventFilter, MembershipKind, RecordId, TimeBounds,
    UpdateEventRequest, Validator,
};
use calshare_core::storage::{
    EventRepository, RepositoryError, ScheduleRepository, StoreError, StoreResult,
    UserRepository,
};

use super::{parse_id, RequestStore};

#[derive(Clone)]
pub struct EventStore {
    users: Arc<dyn UserRepository>,
    schedules: Arc<dyn ScheduleRepository>,
    events: Arc<dyn EventRepository>,
    requests: RequestStore,
}

impl EventStore {
    pub fn new(
        users: Arc<dyn UserRepository>,
        schedules: Arc<dyn ScheduleRepository>,
        events: Arc<dyn EventRepository>,
        requests: RequestStore,
    ) -> Self {
        Self {
            users,
            schedules,
            events,
            requests,
        }
    }

    /// Creates an event, optionally shares it, and links it to its organizer.
    ///
    /// Returns the new event id.
    pub async fn create_event(&self, payload: CreateEventRequest) -> StoreResult<RecordId> {
        let mut validator = Validator::new();
        let user_id = validator.check(check_id(&payload.user_id, "userId"));
        let name = validator.check(check_string(&payload.name, "Event Name"));
        let color_code = validator.check(check_string(&payload.color_code, "Color Code"));
        let classification =
            validator.check(check_string(&payload.classification, "Classification"));
        let interval = validator.check(check_interval(payload.start, payload.end));
        let schedule_id = validator.check(
            payload
                .schedule_id
                .as_deref()
                .map(|v| check_id(v, "scheduleId"))
                .transpose(),
        );
        let schedule_name = validator.check(
            payload
                .schedule_name
                .as_deref()
                .map(|v| check_string(v, "Schedule Name"))
                .transpose(),
        );
        let share_with = validator.check(
            payload
                .share_event
                .as_deref()
                .map(|v| check_email(v, "shareEvent"))
                .transpose(),
        );
        let (
            Some(user_id),
            Some(name),
            Some(color_code),
            Some(classification),
            Some(()),
            Some(schedule_id),
            Some(mut schedule_name),
            Some(share_with),
        ) = (
            user_id,
            name,
            color_code,
            classification,
            interval,
            schedule_id,
            schedule_name,
            share_with,
        )
        else {
            return Err(validator.into());
        };

        let organizer = self
            .users
            .get_user(&user_id)
            .await?
            .ok_or_else(|| StoreError::not_found("User not found with this userId"))?;

        if let Some(schedule_id) = &schedule_id {
            let schedule = self.schedules.get_schedule(schedule_id).await?.ok_or_else(|| {
                StoreError::not_found("Schedule not found with this scheduleId")
            })?;
            if schedule_name.is_none() {
                schedule_name = Some(schedule.name);
            }
        }

        if let Some(email) = &share_with {
            if email == &organizer.email {
                return Err(StoreError::validation(
                    "You cannot share an event with yourself",
                ));
            }
            if self.users.get_user_by_email(email).await?.is_none() {
                return Err(StoreError::not_found(format!(
                    "No user registered with email {email}"
                )));
            }
        }

        let mut event = Event::new(
            user_id,
            name,
            payload.start,
            payload.end,
            color_code,
            classification,
        );
        event.schedule_id = schedule_id;
        event.schedule_name = schedule_name;

        self.events.create_event(&event).await?;

        let request_id = match &share_with {
            Some(email) => {
                match self
                    .requests
                    .create_request(&organizer.email, email, &event)
                    .await
                {
                    Ok(id) => Some(id),
                    Err(e) => {
                        self.discard(&event.id, None).await;
                        return Err(match e {
                            StoreError::Repository(e) => {
                                StoreError::write_failed(format!("Could not share event: {e}"))
                            }
                            other => other,
                        });
                    }
                }
            }
            None => None,
        };

        if let Err(e) = self
            .users
            .add_event_membership(&organizer.id, MembershipKind::Organizing, &event.id)
            .await
        {
            tracing::error!(
                event_id = %event.id,
                user_id = %organizer.id,
                error = %e,
                "Failed to link event to organizer"
            );
            self.discard(&event.id, request_id.as_ref()).await;
            return Err(StoreError::write_failed(
                "Could not add the event to the organizer's list",
            ));
        }

        tracing::info!(
            event_id = %event.id,
            user_id = %event.user_id,
            shared = request_id.is_some(),
            "Created event"
        );

        Ok(event.id)
    }

    /// Best-effort removal of writes made by a failed `create_event`.
    async fn discard(&self, event_id: &RecordId, request_id: Option<&RecordId>) {
        if let Some(request_id) = request_id {
            if let Err(e) = self.requests.delete_request(request_id).await {
                tracing::warn!(request_id = %request_id, error = %e, "Failed to discard request");
            }
        }
        if let Err(e) = self.events.delete_event(event_id).await {
            tracing::warn!(event_id = %event_id, error = %e, "Failed to discard event");
        }
    }

    pub async fn get_event_by_id(&self, id: &str) -> StoreResult<Option<Event>> {
        let id = parse_id(id, "eventId")?;
        Ok(self.events.get_event(&id).await?)
    }

    /// Events the user attends or organizes, sorted by start.
    pub async fn get_events_by_user(&self, user_id: &str) -> StoreResult<Vec<Event>> {
        let user_id = parse_id(user_id, "userId")?;
        let user = self
            .users
            .get_user(&user_id)
            .await?
            .ok_or_else(|| StoreError::not_found("User not found with this userId"))?;

        let ids = user.events.all_event_ids();
        if ids.is_empty() {
            return Err(StoreError::not_found("No events found for this user"));
        }

        let events = self.events.get_events_by_ids(&ids).await?;
        if events.is_empty() {
            return Err(StoreError::not_found("No events found for this user"));
        }
        Ok(events)
    }

    /// Unlinks an event from every membership list, discards its pending
    /// sharing requests, then deletes it.
    ///
    /// The event record goes last so a failed cleanup leaves it in place and
    /// the call can be retried. Removing an id that is already gone fails
    /// with `NotFound`.
    pub async fn remove_event(&self, event_id: &str) -> StoreResult<()> {
        let event_id = parse_id(event_id, "eventId")?;
        let not_found = || StoreError::not_found(format!("Event not found with id {event_id}"));

        if self.events.get_event(&event_id).await?.is_none() {
            return Err(not_found());
        }
        let unlinked = self.users.unlink_event(&event_id).await?;
        let discarded = self.requests.delete_pending_for_event(&event_id).await?;
        if !self.events.delete_event(&event_id).await? {
            return Err(not_found());
        }

        tracing::info!(event_id = %event_id, unlinked, discarded, "Deleted event");
        Ok(())
    }

    /// Merges the truthy fields of `payload` into the stored event.
    pub async fn update_event(
        &self,
        event_id: &str,
        mut payload: UpdateEventRequest,
    ) -> StoreResult<Event> {
        let event_id = parse_id(event_id, "eventId")?;

        let mut validator = Validator::new();
        let name = check_override(&mut validator, payload.name.take(), "Event Name");
        let color_code = check_override(&mut validator, payload.color_code.take(), "Color Code");
        let classification = check_override(
            &mut validator,
            payload.classification.take(),
            "Classification",
        );
        let (Some(name), Some(color_code), Some(classification)) =
            (name, color_code, classification)
        else {
            return Err(validator.into());
        };
        payload.name = name;
        payload.color_code = color_code;
        payload.classification = classification;

        let mut event = self
            .events
            .get_event(&event_id)
            .await?
            .ok_or_else(|| StoreError::not_found(format!("Event not found with id {event_id}")))?;

        payload.apply_to(&mut event);
        check_interval(event.start, event.end).map_err(StoreError::validation)?;

        self.events.update_event(&event).await.map_err(|e| match e {
            RepositoryError::NotFound { .. } => {
                StoreError::not_found(format!("Event not found with id {event_id}"))
            }
            other => other.into(),
        })?;

        tracing::info!(event_id = %event.id, "Updated event");
        Ok(event)
    }

    pub async fn get_events_by_schedule(&self, schedule_id: &str) -> StoreResult<Vec<Event>> {
        let schedule_id = parse_id(schedule_id, "scheduleId")?;
        let events = self
            .events
            .find_events(&EventFilter::new().schedule(schedule_id))
            .await?;
        if events.is_empty() {
            return Err(StoreError::not_found("No events found for this schedule"));
        }
        Ok(events)
    }

    pub async fn get_events_by_color_code(&self, color_code: &str) -> StoreResult<Vec<Event>> {
        let color_code = check_string(color_code, "Color Code").map_err(StoreError::validation)?;
        Ok(self
            .events
            .find_events(&EventFilter::new().color_code(color_code))
            .await?)
    }

    pub async fn get_events_by_color_code_per_user(
        &self,
        user_id: &str,
        color_code: &str,
    ) -> StoreResult<Vec<Event>> {
        let mut validator = Validator::new();
        let user_id = validator.check(check_id(user_id, "userId"));
        let color_code = validator.check(check_string(color_code, "Color Code"));
        let (Some(user_id), Some(color_code)) = (user_id, color_code) else {
            return Err(validator.into());
        };
        Ok(self
            .events
            .find_events(&EventFilter::new().user(user_id).color_code(color_code))
            .await?)
    }

    /// Events starting on the given UTC day (`YYYY-MM-DD`).
    pub async fn get_events_by_start_date(&self, date: &str) -> StoreResult<Vec<Event>> {
        let date = check_date(date, "startDate").map_err(StoreError::validation)?;
        Ok(self
            .events
            .find_events(&EventFilter::new().starts_within(TimeBounds::day(date)))
            .await?)
    }

    /// Events ending on the given UTC day (`YYYY-MM-DD`).
    pub async fn get_events_by_end_date(&self, date: &str) -> StoreResult<Vec<Event>> {
        let date = check_date(date, "endDate").map_err(StoreError::validation)?;
        Ok(self
            .events
            .find_events(&EventFilter::new().ends_within(TimeBounds::day(date)))
            .await?)
    }

    pub async fn get_events_by_classification(
        &self,
        classification: &str,
    ) -> StoreResult<Vec<Event>> {
        let classification =
            check_string(classification, "Classification").map_err(StoreError::validation)?;
        Ok(self
            .events
            .find_events(&EventFilter::new().classification(classification))
            .await?)
    }

    pub async fn get_events_by_classification_by_user(
        &self,
        user_id: &str,
        classification: &str,
    ) -> StoreResult<Vec<Event>> {
        let mut validator = Validator::new();
        let user_id = validator.check(check_id(user_id, "userId"));
        let classification = validator.check(check_string(classification, "Classification"));
        let (Some(user_id), Some(classification)) = (user_id, classification) else {
            return Err(validator.into());
        };
        Ok(self
            .events
            .find_events(
                &EventFilter::new()
                    .user(user_id)
                    .classification(classification),
            )
            .await?)
    }

    /// Events in the schedule whose start lies in `[start, end]`.
    pub async fn get_events_by_date_range(
        &self,
        schedule_id: &str,
        start: &str,
        end: &str,
    ) -> StoreResult<Vec<Event>> {
        let (schedule_id, start, end) =
            parse_window(schedule_id, start, end, "Start Date must be before End Date")?;
        Ok(self
            .events
            .find_events(
                &EventFilter::new()
                    .schedule(schedule_id)
                    .starts_within(TimeBounds::closed(start, end)),
            )
            .await?)
    }

    /// Returns `true` when no event in the schedule overlaps `[start, end)`.
    pub async fn check_event_availability(
        &self,
        schedule_id: &str,
        start: &str,
        end: &str,
    ) -> StoreResult<bool> {
        let (schedule_id, start, end) = parse_window(
            schedule_id,
            start,
            end,
            "Start date and time must be before end date and time",
        )?;
        let overlapping = self
            .events
            .find_events(&EventFilter::new().schedule(schedule_id).overlapping(start, end))
            .await?;

        tracing::debug!(overlapping = overlapping.len(), "Checked availability");
        Ok(overlapping.is_empty())
    }
}

/// Validates a schedule id and a `start < end` window together.
fn parse_window(
    schedule_id: &str,
    start: &str,
    end: &str,
    order_message: &str,
) -> StoreResult<(RecordId, DateTime<Utc>, DateTime<Utc>)> {
    let mut validator = Validator::new();
    let schedule_id = validator.check(check_id(schedule_id, "scheduleId"));
    let start = validator.check(check_datetime(start, "start"));
    let end = validator.check(check_datetime(end, "end"));
    let (Some(schedule_id), Some(start), Some(end)) = (schedule_id, start, end) else {
        return Err(validator.into());
    };
    if start >= end {
        return Err(StoreError::validation(order_message));
    }
    Ok((schedule_id, start, end))
}

/// Trims an optional override. Returns `None` when the value is blank,
/// after recording the message in `validator`.
fn check_override(
    validator: &mut Validator,
    value: Option<String>,
    field: &str,
) -> Option<Option<String>> {
    match value.filter(|s| !s.is_empty()) {
        Some(value) => validator.check(check_string(&value, field)).map(Some),
        None => Some(None),
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use calshare_core::calendar::{CreateScheduleRequest, ShareRequest, User};
    use calshare_core::storage::{RequestRepository, Result as RepoResult};

    use super::*;
    use crate::storage::InMemoryRepository;
    use crate::stores::test_support::{at, stores, user, Stores};

    fn new_event(
        organizer: &User,
        name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CreateEventRequest {
        CreateEventRequest::new(organizer.id.as_str(), name, start, end, "#3B82F6", "work")
    }

    async fn schedule(s: &Stores, owner: &User, name: &str) -> RecordId {
        s.schedules
            .create_schedule(CreateScheduleRequest {
                user_id: owner.id.to_string(),
                name: name.to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_without_share_creates_no_request() {
        let s = stores();
        let organizer = user(&s, "ada@example.com").await;

        let id = s
            .events
            .create_event(new_event(&organizer, "Standup", at(1, 10, 0), at(1, 10, 15)))
            .await
            .unwrap();

        assert_eq!(s.repo.request_count().await, 0);
        let organizer = s.repo.get_user(&organizer.id).await.unwrap().unwrap();
        assert_eq!(organizer.events.organizing, vec![id]);
    }

    #[tokio::test]
    async fn test_create_with_share_embeds_event_in_request() {
        let s = stores();
        let organizer = user(&s, "ada@example.com").await;
        let receiver = user(&s, "grace@example.com").await;

        let id = s
            .events
            .create_event(
                new_event(&organizer, "Lunch", at(1, 12, 0), at(1, 13, 0))
                    .share_with("Grace@Example.com"),
            )
            .await
            .unwrap();

        let pending = s
            .requests
            .get_requests_for_receiver(&receiver.email)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].sender_email, organizer.email);
        let stored = s.events.get_event_by_id(id.as_str()).await.unwrap().unwrap();
        assert_eq!(pending[0].event, stored);

        let receiver = s.repo.get_user(&receiver.id).await.unwrap().unwrap();
        assert!(receiver.events.is_empty());
    }

    #[tokio::test]
    async fn test_create_with_unknown_receiver_writes_nothing() {
        let s = stores();
        let organizer = user(&s, "ada@example.com").await;

        let err = s
            .events
            .create_event(
                new_event(&organizer, "Lunch", at(1, 12, 0), at(1, 13, 0))
                    .share_with("nobody@example.com"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(s.repo.event_count().await, 0);
        assert_eq!(s.repo.request_count().await, 0);
        let organizer = s.repo.get_user(&organizer.id).await.unwrap().unwrap();
        assert!(organizer.events.organizing.is_empty());
    }

    #[tokio::test]
    async fn test_create_collects_validation_errors() {
        let s = stores();

        let mut payload =
            CreateEventRequest::new("bad", " ", at(1, 11, 0), at(1, 10, 0), "", "work");
        payload.share_event = Some("not-an-email".to_string());
        let err = s.events.create_event(payload).await.unwrap_err();

        assert_eq!(err.kind(), "validation");
        assert_eq!(err.messages().len(), 5);
        assert_eq!(s.repo.event_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_requires_existing_organizer_and_schedule() {
        let s = stores();
        let organizer = user(&s, "ada@example.com").await;

        let ghost = User::new("ghost@example.com", "Ghost");
        let err = s
            .events
            .create_event(new_event(&ghost, "Standup", at(1, 10, 0), at(1, 11, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = s
            .events
            .create_event(
                new_event(&organizer, "Standup", at(1, 10, 0), at(1, 11, 0))
                    .in_schedule(RecordId::new().as_str()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(s.repo.event_count().await, 0);
    }

    #[tokio::test]
    async fn test_schedule_name_defaults_to_schedule() {
        let s = stores();
        let organizer = user(&s, "ada@example.com").await;
        let work = schedule(&s, &organizer, "Work").await;

        let id = s
            .events
            .create_event(
                new_event(&organizer, "Standup", at(1, 10, 0), at(1, 11, 0))
                    .in_schedule(work.as_str()),
            )
            .await
            .unwrap();

        let event = s.events.get_event_by_id(id.as_str()).await.unwrap().unwrap();
        assert_eq!(event.schedule_id, Some(work));
        assert_eq!(event.schedule_name.as_deref(), Some("Work"));
    }

    /// Request repository whose inserts always fail.
    struct RejectingRequests(InMemoryRepository);

    #[async_trait]
    impl RequestRepository for RejectingRequests {
        async fn get_request(&self, id: &RecordId) -> RepoResult<Option<ShareRequest>> {
            self.0.get_request(id).await
        }

        async fn get_pending_requests(
            &self,
            receiver_email: &str,
        ) -> RepoResult<Vec<ShareRequest>> {
            self.0.get_pending_requests(receiver_email).await
        }

        async fn create_request(&self, _request: &ShareRequest) -> RepoResult<()> {
            Err(RepositoryError::ConnectionFailed("connection reset".to_string()))
        }

        async fn transition_request(
            &self,
            id: &RecordId,
            from: calshare_core::calendar::RequestStatus,
            to: calshare_core::calendar::RequestStatus,
            updated_at: DateTime<Utc>,
        ) -> RepoResult<bool> {
            self.0.transition_request(id, from, to, updated_at).await
        }

        async fn delete_request(&self, id: &RecordId) -> RepoResult<bool> {
            self.0.delete_request(id).await
        }

        async fn delete_pending_for_event(&self, event_id: &RecordId) -> RepoResult<u64> {
            self.0.delete_pending_for_event(event_id).await
        }
    }

    #[tokio::test]
    async fn test_failed_request_insert_leaves_no_event() {
        let s = stores();
        let organizer = user(&s, "ada@example.com").await;
        user(&s, "grace@example.com").await;

        let repo = Arc::new(s.repo.clone());
        let requests = RequestStore::new(
            repo.clone(),
            repo.clone(),
            Arc::new(RejectingRequests(s.repo.clone())),
        );
        let events = EventStore::new(repo.clone(), repo.clone(), repo, requests);

        let err = events
            .create_event(
                new_event(&organizer, "Lunch", at(1, 12, 0), at(1, 13, 0))
                    .share_with("grace@example.com"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::WriteFailed(_)));
        assert_eq!(s.repo.event_count().await, 0);
        let organizer = s.repo.get_user(&organizer.id).await.unwrap().unwrap();
        assert!(organizer.events.organizing.is_empty());
    }

    #[tokio::test]
    async fn test_get_events_by_user_unions_lists() {
        let s = stores();
        let organizer = user(&s, "ada@example.com").await;
        let receiver = user(&s, "grace@example.com").await;

        let err = s
            .events
            .get_events_by_user(receiver.id.as_str())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let shared = s
            .events
            .create_event(
                new_event(&organizer, "Lunch", at(2, 12, 0), at(2, 13, 0))
                    .share_with(&receiver.email),
            )
            .await
            .unwrap();
        let own = s
            .events
            .create_event(new_event(&receiver, "Gym", at(1, 7, 0), at(1, 8, 0)))
            .await
            .unwrap();
        let pending = s
            .requests
            .get_requests_for_receiver(&receiver.email)
            .await
            .unwrap();
        s.requests
            .accept_request(calshare_core::calendar::ResolveShareRequest {
                request_id: pending[0].id.to_string(),
                user_id: receiver.id.to_string(),
            })
            .await
            .unwrap();

        let events = s
            .events
            .get_events_by_user(receiver.id.as_str())
            .await
            .unwrap();
        let ids: Vec<RecordId> = events.into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![own, shared]);
    }

    #[tokio::test]
    async fn test_get_events_by_user_when_events_are_gone() {
        let s = stores();
        let organizer = user(&s, "ada@example.com").await;
        s.repo
            .add_event_membership(&organizer.id, MembershipKind::Organizing, &RecordId::new())
            .await
            .unwrap();

        let err = s
            .events
            .get_events_by_user(organizer.id.as_str())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_event_twice() {
        let s = stores();
        let organizer = user(&s, "ada@example.com").await;
        let receiver = user(&s, "grace@example.com").await;
        let id = s
            .events
            .create_event(
                new_event(&organizer, "Lunch", at(1, 12, 0), at(1, 13, 0))
                    .share_with(&receiver.email),
            )
            .await
            .unwrap();
        let pending = s
            .requests
            .get_requests_for_receiver(&receiver.email)
            .await
            .unwrap();
        s.requests
            .accept_request(calshare_core::calendar::ResolveShareRequest {
                request_id: pending[0].id.to_string(),
                user_id: receiver.id.to_string(),
            })
            .await
            .unwrap();

        s.events.remove_event(id.as_str()).await.unwrap();

        let err = s.events.remove_event(id.as_str()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let organizer = s.repo.get_user(&organizer.id).await.unwrap().unwrap();
        let receiver = s.repo.get_user(&receiver.id).await.unwrap().unwrap();
        assert!(organizer.events.is_empty());
        assert!(receiver.events.is_empty());
    }

    /// User repository whose `unlink_event` always fails.
    struct FailingUnlink(InMemoryRepository);

    #[async_trait]
    impl UserRepository for FailingUnlink {
        async fn get_user(&self, id: &RecordId) -> RepoResult<Option<User>> {
            self.0.get_user(id).await
        }

        async fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
            self.0.get_user_by_email(email).await
        }

        async fn create_user(&self, user: &User) -> RepoResult<()> {
            self.0.create_user(user).await
        }

        async fn add_event_membership(
            &self,
            user_id: &RecordId,
            kind: MembershipKind,
            event_id: &RecordId,
        ) -> RepoResult<bool> {
            self.0.add_event_membership(user_id, kind, event_id).await
        }

        async fn remove_event_membership(
            &self,
            user_id: &RecordId,
            kind: MembershipKind,
            event_id: &RecordId,
        ) -> RepoResult<bool> {
            self.0.remove_event_membership(user_id, kind, event_id).await
        }

        async fn unlink_event(&self, _event_id: &RecordId) -> RepoResult<u64> {
            Err(RepositoryError::ConnectionFailed("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failed_unlink_keeps_event_for_retry() {
        let s = stores();
        let organizer = user(&s, "ada@example.com").await;
        let id = s
            .events
            .create_event(new_event(&organizer, "Standup", at(1, 10, 0), at(1, 10, 15)))
            .await
            .unwrap();

        let repo = Arc::new(s.repo.clone());
        let events = EventStore::new(
            Arc::new(FailingUnlink(s.repo.clone())),
            repo.clone(),
            repo,
            s.requests.clone(),
        );
        assert!(events.remove_event(id.as_str()).await.is_err());
        assert!(s.events.get_event_by_id(id.as_str()).await.unwrap().is_some());

        s.events.remove_event(id.as_str()).await.unwrap();

        assert_eq!(s.repo.event_count().await, 0);
        let organizer = s.repo.get_user(&organizer.id).await.unwrap().unwrap();
        assert!(organizer.events.organizing.is_empty());
    }

    #[tokio::test]
    async fn test_remove_event_discards_pending_requests() {
        let s = stores();
        let organizer = user(&s, "ada@example.com").await;
        let receiver = user(&s, "grace@example.com").await;
        let id = s
            .events
            .create_event(
                new_event(&organizer, "Lunch", at(1, 12, 0), at(1, 13, 0))
                    .share_with(&receiver.email),
            )
            .await
            .unwrap();
        assert_eq!(s.repo.request_count().await, 1);

        s.events.remove_event(id.as_str()).await.unwrap();

        let pending = s
            .requests
            .get_requests_for_receiver(&receiver.email)
            .await
            .unwrap();
        assert!(pending.is_empty());
        assert_eq!(s.repo.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_keeps_values_for_falsy_input() {
        let s = stores();
        let organizer = user(&s, "ada@example.com").await;
        let id = s
            .events
            .create_event(new_event(&organizer, "Standup", at(1, 10, 0), at(1, 10, 15)))
            .await
            .unwrap();

        let payload: UpdateEventRequest = serde_json::from_value(serde_json::json!({
            "name": 0,
            "classification": "",
            "color_code": null,
            "start": false,
            "end": "2024-01-01T10:30:00Z"
        }))
        .unwrap();
        let updated = s.events.update_event(id.as_str(), payload).await.unwrap();

        assert_eq!(updated.name, "Standup");
        assert_eq!(updated.classification, "work");
        assert_eq!(updated.color_code, "#3B82F6");
        assert_eq!(updated.start, at(1, 10, 0));
        assert_eq!(updated.end, at(1, 10, 30));

        let stored = s.events.get_event_by_id(id.as_str()).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_update_rejects_inverted_interval_and_missing_event() {
        let s = stores();
        let organizer = user(&s, "ada@example.com").await;
        let id = s
            .events
            .create_event(new_event(&organizer, "Standup", at(1, 10, 0), at(1, 11, 0)))
            .await
            .unwrap();

        let err = s
            .events
            .update_event(id.as_str(), UpdateEventRequest::new().with_start(at(1, 12, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = s
            .events
            .update_event(RecordId::new().as_str(), UpdateEventRequest::new().with_name("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_rejects_blank_strings() {
        let s = stores();
        let organizer = user(&s, "ada@example.com").await;
        let id = s
            .events
            .create_event(new_event(&organizer, "Standup", at(1, 10, 0), at(1, 10, 15)))
            .await
            .unwrap();

        let payload: UpdateEventRequest = serde_json::from_value(serde_json::json!({
            "name": "   ",
            "classification": " "
        }))
        .unwrap();
        let err = s.events.update_event(id.as_str(), payload).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(err.messages().len(), 2);

        let stored = s.events.get_event_by_id(id.as_str()).await.unwrap().unwrap();
        assert_eq!(stored.name, "Standup");
        assert_eq!(stored.classification, "work");

        let updated = s
            .events
            .update_event(id.as_str(), UpdateEventRequest::new().with_name("  Retro "))
            .await
            .unwrap();
        assert_eq!(updated.name, "Retro");
    }

    #[tokio::test]
    async fn test_availability_uses_overlap_rule() {
        let s = stores();
        let organizer = user(&s, "ada@example.com").await;
        let work = schedule(&s, &organizer, "Work").await;
        let other = schedule(&s, &organizer, "Home").await;

        let available = s
            .events
            .check_event_availability(work.as_str(), "2024-01-01T10:00", "2024-01-01T11:00")
            .await
            .unwrap();
        assert!(available);

        s.events
            .create_event(
                new_event(&organizer, "Early", at(1, 9, 0), at(1, 10, 0))
                    .in_schedule(work.as_str()),
            )
            .await
            .unwrap();
        s.events
            .create_event(
                new_event(&organizer, "Elsewhere", at(1, 10, 30), at(1, 10, 45))
                    .in_schedule(other.as_str()),
            )
            .await
            .unwrap();
        let available = s
            .events
            .check_event_availability(work.as_str(), "2024-01-01T10:00", "2024-01-01T11:00")
            .await
            .unwrap();
        assert!(available);

        s.events
            .create_event(
                new_event(&organizer, "Standup", at(1, 10, 30), at(1, 10, 45))
                    .in_schedule(work.as_str()),
            )
            .await
            .unwrap();
        let available = s
            .events
            .check_event_availability(work.as_str(), "2024-01-01T10:00", "2024-01-01T11:00")
            .await
            .unwrap();
        assert!(!available);

        let err = s
            .events
            .check_event_availability(work.as_str(), "2024-01-01T11:00", "2024-01-01T10:00")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_query_family() {
        let s = stores();
        let ada = user(&s, "ada@example.com").await;
        let grace = user(&s, "grace@example.com").await;
        let work = schedule(&s, &ada, "Work").await;

        let mut standup =
            new_event(&ada, "Standup", at(1, 10, 0), at(1, 10, 15)).in_schedule(work.as_str());
        standup.color_code = "green".to_string();
        let standup = s.events.create_event(standup).await.unwrap();

        let mut party =
            new_event(&ada, "Party", at(2, 22, 0), at(3, 1, 0)).in_schedule(work.as_str());
        party.classification = "social".to_string();
        let party = s.events.create_event(party).await.unwrap();

        let mut run = new_event(&grace, "Run", at(1, 7, 0), at(1, 8, 0));
        run.color_code = "green".to_string();
        let run = s.events.create_event(run).await.unwrap();

        let ids = |events: Vec<Event>| events.into_iter().map(|e| e.id).collect::<Vec<_>>();

        assert_eq!(
            ids(s.events.get_events_by_schedule(work.as_str()).await.unwrap()),
            vec![standup.clone(), party.clone()]
        );
        assert_eq!(
            ids(s.events.get_events_by_color_code("green").await.unwrap()),
            vec![run.clone(), standup.clone()]
        );
        assert_eq!(
            ids(s
                .events
                .get_events_by_color_code_per_user(ada.id.as_str(), "green")
                .await
                .unwrap()),
            vec![standup.clone()]
        );
        assert_eq!(
            ids(s.events.get_events_by_classification("social").await.unwrap()),
            vec![party.clone()]
        );
        assert_eq!(
            ids(s
                .events
                .get_events_by_classification_by_user(grace.id.as_str(), "work")
                .await
                .unwrap()),
            vec![run.clone()]
        );
        assert_eq!(
            ids(s.events.get_events_by_start_date("2024-01-02").await.unwrap()),
            vec![party.clone()]
        );
        assert_eq!(
            ids(s.events.get_events_by_end_date("2024-01-03").await.unwrap()),
            vec![party.clone()]
        );
        assert_eq!(
            ids(s
                .events
                .get_events_by_date_range(work.as_str(), "2024-01-01T10:00", "2024-01-02T00:00")
                .await
                .unwrap()),
            vec![standup]
        );
        assert!(s
            .events
            .get_events_by_color_code("purple")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_query_validation() {
        let s = stores();

        let err = s.events.get_events_by_schedule("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = s
            .events
            .get_events_by_schedule(RecordId::new().as_str())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = s.events.get_events_by_start_date("yesterday").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = s
            .events
            .get_events_by_date_range("nope", "2024-01-02", "2024-01-01")
            .await
            .unwrap_err();
        assert_eq!(err.messages().len(), 1);

        let err = s
            .events
            .get_events_by_date_range(RecordId::new().as_str(), "2024-01-02", "2024-01-01")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
