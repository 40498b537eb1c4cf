use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::RecordId;

/// Which membership list an event id lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipKind {
    /// The user created the event.
    Organizing,
    /// The user accepted a sharing request for the event.
    Attending,
}

impl MembershipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipKind::Organizing => "organizing",
            MembershipKind::Attending => "attending",
        }
    }
}

/// Per-user lists of event ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMemberships {
    #[serde(default)]
    pub organizing: Vec<RecordId>,
    #[serde(default)]
    pub attending: Vec<RecordId>,
}

impl EventMemberships {
    /// Returns the list for the given kind.
    pub fn list(&self, kind: MembershipKind) -> &[RecordId] {
        match kind {
            MembershipKind::Organizing => &self.organizing,
            MembershipKind::Attending => &self.attending,
        }
    }

    /// Appends an id unless it is already present. Returns true if added.
    pub fn add(&mut self, kind: MembershipKind, event_id: RecordId) -> bool {
        let list = match kind {
            MembershipKind::Organizing => &mut self.organizing,
            MembershipKind::Attending => &mut self.attending,
        };
        if list.contains(&event_id) {
            return false;
        }
        list.push(event_id);
        true
    }

    /// Removes an id from one list. Returns true if it was present.
    pub fn remove(&mut self, kind: MembershipKind, event_id: &RecordId) -> bool {
        let list = match kind {
            MembershipKind::Organizing => &mut self.organizing,
            MembershipKind::Attending => &mut self.attending,
        };
        let before = list.len();
        list.retain(|id| id != event_id);
        list.len() != before
    }

    /// Removes an id from both lists. Returns true if anything changed.
    pub fn unlink(&mut self, event_id: &RecordId) -> bool {
        let organizing = self.remove(MembershipKind::Organizing, event_id);
        let attending = self.remove(MembershipKind::Attending, event_id);
        organizing || attending
    }

    /// Attending ids followed by organizing ids, without duplicates.
    pub fn all_event_ids(&self) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> =
            Vec::with_capacity(self.attending.len() + self.organizing.len());
        for id in self.attending.iter().chain(self.organizing.iter()) {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.organizing.is_empty() && self.attending.is_empty()
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub events: EventMemberships,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with empty membership lists.
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::new(),
            email: email.into(),
            display_name: display_name.into(),
            events: EventMemberships::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets a specific ID for this user (useful for testing).
    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }
}

/// A named schedule owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: RecordId,
    pub user_id: RecordId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    pub fn new(user_id: RecordId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::new(),
            user_id,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A timed event organized by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: RecordId,
    /// The organizer.
    pub user_id: RecordId,
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Display color (CSS color value).
    pub color_code: String,
    pub classification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Creates a new event without a schedule.
    pub fn new(
        user_id: RecordId,
        name: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        color_code: impl Into<String>,
        classification: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::new(),
            user_id,
            name: name.into(),
            start,
            end,
            color_code: color_code.into(),
            classification: classification.into(),
            schedule_id: None,
            schedule_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Places this event in a schedule.
    pub fn in_schedule(mut self, schedule_id: RecordId, schedule_name: impl Into<String>) -> Self {
        self.schedule_id = Some(schedule_id);
        self.schedule_name = Some(schedule_name.into());
        self
    }

    /// Sets a specific ID for this event (useful for testing).
    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = id;
        self
    }

    /// Returns true if this event's interval intersects `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }
}

/// Lifecycle of a sharing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RequestStatus::Pending),
            "accepted" => Some(RequestStatus::Accepted),
            "rejected" => Some(RequestStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

/// An invitation for another user to attend an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRequest {
    pub id: RecordId,
    pub sender_email: String,
    pub receiver_email: String,
    /// Snapshot of the event at the time it was shared.
    pub event: Event,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShareRequest {
    /// Creates a new pending request.
    pub fn pending(
        sender_email: impl Into<String>,
        receiver_email: impl Into<String>,
        event: Event,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::new(),
            sender_email: sender_email.into(),
            receiver_email: receiver_email.into(),
            event,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_memberships_add_is_set_like() {
        let mut lists = EventMemberships::default();
        let id = RecordId::new();

        assert!(lists.add(MembershipKind::Organizing, id.clone()));
        assert!(!lists.add(MembershipKind::Organizing, id.clone()));
        assert_eq!(lists.organizing, vec![id]);
        assert!(lists.attending.is_empty());
    }

    #[test]
    fn test_memberships_unlink_removes_from_both_lists() {
        let mut lists = EventMemberships::default();
        let id = RecordId::new();
        let other = RecordId::new();
        lists.add(MembershipKind::Organizing, id.clone());
        lists.add(MembershipKind::Attending, id.clone());
        lists.add(MembershipKind::Attending, other.clone());

        assert!(lists.unlink(&id));
        assert!(lists.organizing.is_empty());
        assert_eq!(lists.attending, vec![other]);
        assert!(!lists.unlink(&id));
    }

    #[test]
    fn test_all_event_ids_deduplicates() {
        let mut lists = EventMemberships::default();
        let shared = RecordId::new();
        let own = RecordId::new();
        lists.add(MembershipKind::Attending, shared.clone());
        lists.add(MembershipKind::Organizing, own.clone());
        lists.add(MembershipKind::Organizing, shared.clone());

        assert_eq!(lists.all_event_ids(), vec![shared, own]);
    }

    #[test]
    fn test_event_overlap_rule() {
        let event = Event::new(RecordId::new(), "Standup", at(10, 30), at(10, 45), "#fff", "work");

        assert!(event.overlaps(at(10, 0), at(11, 0)));
        assert!(!event.overlaps(at(10, 45), at(11, 0)));
        assert!(!event.overlaps(at(9, 0), at(10, 30)));
    }

    #[test]
    fn test_request_status_round_trip() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Accepted,
            RequestStatus::Rejected,
        ] {
            assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RequestStatus::parse("unknown"), None);
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Accepted.is_terminal());
    }

    #[test]
    fn test_pending_request_embeds_event() {
        let event = Event::new(RecordId::new(), "Lunch", at(12, 0), at(13, 0), "red", "social");
        let request = ShareRequest::pending("a@example.com", "b@example.com", event.clone());

        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.event, event);
    }
}
