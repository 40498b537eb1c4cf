//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use calshare_core::calendar::{
    filter_events, sort_events_by_start, Event, EventFilter, MembershipKind, RecordId,
    RequestStatus, Schedule, ShareRequest, User,
};
use calshare_core::storage::{
    EventRepository, RepositoryError, RequestRepository, Result, ScheduleRepository,
    UserRepository,
};

/// In-memory storage backend for testing.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    users: Arc<RwLock<HashMap<RecordId, User>>>,
    schedules: Arc<RwLock<HashMap<RecordId, Schedule>>>,
    events: Arc<RwLock<HashMap<RecordId, Event>>>,
    requests: Arc<RwLock<HashMap<RecordId, ShareRequest>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            schedules: Arc::new(RwLock::new(HashMap::new())),
            events: Arc::new(RwLock::new(HashMap::new())),
            requests: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored sharing requests.
    #[cfg(test)]
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Number of stored events.
    #[cfg(test)]
    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: &RecordId) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.id.to_string(),
            });
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.email.clone(),
            });
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn add_event_membership(
        &self,
        user_id: &RecordId,
        kind: MembershipKind,
        event_id: &RecordId,
    ) -> Result<bool> {
        let mut users = self.users.write().await;
        let user = users.get_mut(user_id).ok_or_else(|| RepositoryError::NotFound {
            entity_type: "User",
            id: user_id.to_string(),
        })?;
        let added = user.events.add(kind, event_id.clone());
        if added {
            user.updated_at = Utc::now();
        }
        Ok(added)
    }

    async fn remove_event_membership(
        &self,
        user_id: &RecordId,
        kind: MembershipKind,
        event_id: &RecordId,
    ) -> Result<bool> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(user_id) else {
            return Ok(false);
        };
        let removed = user.events.remove(kind, event_id);
        if removed {
            user.updated_at = Utc::now();
        }
        Ok(removed)
    }

    async fn unlink_event(&self, event_id: &RecordId) -> Result<u64> {
        let mut users = self.users.write().await;
        let now = Utc::now();
        let mut changed = 0;
        for user in users.values_mut() {
            if user.events.unlink(event_id) {
                user.updated_at = now;
                changed += 1;
            }
        }
        Ok(changed)
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryRepository {
    async fn get_schedule(&self, id: &RecordId) -> Result<Option<Schedule>> {
        let schedules = self.schedules.read().await;
        Ok(schedules.get(id).cloned())
    }

    async fn get_schedules_by_user(&self, user_id: &RecordId) -> Result<Vec<Schedule>> {
        let schedules = self.schedules.read().await;
        let mut result: Vec<Schedule> = schedules
            .values()
            .filter(|s| &s.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(result)
    }

    async fn create_schedule(&self, schedule: &Schedule) -> Result<()> {
        let mut schedules = self.schedules.write().await;
        if schedules.contains_key(&schedule.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Schedule",
                id: schedule.id.to_string(),
            });
        }
        schedules.insert(schedule.id.clone(), schedule.clone());
        Ok(())
    }

    async fn update_schedule(&self, schedule: &Schedule) -> Result<()> {
        let mut schedules = self.schedules.write().await;
        if !schedules.contains_key(&schedule.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "Schedule",
                id: schedule.id.to_string(),
            });
        }
        schedules.insert(schedule.id.clone(), schedule.clone());
        Ok(())
    }

    async fn delete_schedule(&self, id: &RecordId) -> Result<bool> {
        let mut schedules = self.schedules.write().await;
        Ok(schedules.remove(id).is_some())
    }
}

#[async_trait]
impl EventRepository for InMemoryRepository {
    async fn get_event(&self, id: &RecordId) -> Result<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.get(id).cloned())
    }

    async fn get_events_by_ids(&self, ids: &[RecordId]) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        let mut result: Vec<Event> = ids.iter().filter_map(|id| events.get(id).cloned()).collect();
        sort_events_by_start(&mut result);
        Ok(result)
    }

    async fn find_events(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        let mut result: Vec<Event> = filter_events(events.values(), filter)
            .into_iter()
            .cloned()
            .collect();
        sort_events_by_start(&mut result);
        Ok(result)
    }

    async fn create_event(&self, event: &Event) -> Result<()> {
        let mut events = self.events.write().await;
        if events.contains_key(&event.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Event",
                id: event.id.to_string(),
            });
        }
        events.insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        let mut events = self.events.write().await;
        if !events.contains_key(&event.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "Event",
                id: event.id.to_string(),
            });
        }
        events.insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn delete_event(&self, id: &RecordId) -> Result<bool> {
        let mut events = self.events.write().await;
        Ok(events.remove(id).is_some())
    }
}

#[async_trait]
impl RequestRepository for InMemoryRepository {
    async fn get_request(&self, id: &RecordId) -> Result<Option<ShareRequest>> {
        let requests = self.requests.read().await;
        Ok(requests.get(id).cloned())
    }

    async fn get_pending_requests(&self, receiver_email: &str) -> Result<Vec<ShareRequest>> {
        let requests = self.requests.read().await;
        let mut result: Vec<ShareRequest> = requests
            .values()
            .filter(|r| r.receiver_email == receiver_email && r.status == RequestStatus::Pending)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(result)
    }

    async fn create_request(&self, request: &ShareRequest) -> Result<()> {
        let mut requests = self.requests.write().await;
        if requests.contains_key(&request.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "ShareRequest",
                id: request.id.to_string(),
            });
        }
        requests.insert(request.id.clone(), request.clone());
        Ok(())
    }

    async fn transition_request(
        &self,
        id: &RecordId,
        from: RequestStatus,
        to: RequestStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut requests = self.requests.write().await;
        match requests.get_mut(id) {
            Some(request) if request.status == from => {
                request.status = to;
                request.updated_at = updated_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_request(&self, id: &RecordId) -> Result<bool> {
        let mut requests = self.requests.write().await;
        Ok(requests.remove(id).is_some())
    }

    async fn delete_pending_for_event(&self, event_id: &RecordId) -> Result<u64> {
        let mut requests = self.requests.write().await;
        let before = requests.len();
        requests
            .retain(|_, r| !(r.event.id == *event_id && r.status == RequestStatus::Pending));
        Ok((before - requests.len()) as u64)
    }
}
