use chrono::{DateTime, Days, NaiveDate, Utc};

use super::id::RecordId;
use super::types::Event;

/// Bounds on a timestamp field.
///
/// The lower bound is always inclusive. The upper bound is inclusive for
/// explicit ranges and exclusive for whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBounds {
    pub min: DateTime<Utc>,
    pub max: DateTime<Utc>,
    pub max_inclusive: bool,
}

impl TimeBounds {
    /// `[min, max]`
    pub fn closed(min: DateTime<Utc>, max: DateTime<Utc>) -> Self {
        Self {
            min,
            max,
            max_inclusive: true,
        }
    }

    /// The UTC day containing `date`, as `[00:00, next day 00:00)`.
    pub fn day(date: NaiveDate) -> Self {
        let min = date.and_time(chrono::NaiveTime::MIN).and_utc();
        let max = date
            .checked_add_days(Days::new(1))
            .map(|next| next.and_time(chrono::NaiveTime::MIN).and_utc())
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            min,
            max,
            max_inclusive: false,
        }
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.min && if self.max_inclusive { t <= self.max } else { t < self.max }
    }
}

/// Predicate over stored events.
///
/// Every field that is set must match. Backends translate this into their
/// own query language; [`EventFilter::matches`] is the reference semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub user_id: Option<RecordId>,
    pub schedule_id: Option<RecordId>,
    pub color_code: Option<String>,
    pub classification: Option<String>,
    pub starts_within: Option<TimeBounds>,
    pub ends_within: Option<TimeBounds>,
    /// Events intersecting `(start, end)`.
    pub overlapping: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user_id: RecordId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn schedule(mut self, schedule_id: RecordId) -> Self {
        self.schedule_id = Some(schedule_id);
        self
    }

    pub fn color_code(mut self, color_code: impl Into<String>) -> Self {
        self.color_code = Some(color_code.into());
        self
    }

    pub fn classification(mut self, classification: impl Into<String>) -> Self {
        self.classification = Some(classification.into());
        self
    }

    pub fn starts_within(mut self, bounds: TimeBounds) -> Self {
        self.starts_within = Some(bounds);
        self
    }

    pub fn ends_within(mut self, bounds: TimeBounds) -> Self {
        self.ends_within = Some(bounds);
        self
    }

    pub fn overlapping(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.overlapping = Some((start, end));
        self
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.user_id.as_ref().is_none_or(|id| &event.user_id == id)
            && self
                .schedule_id
                .as_ref()
                .is_none_or(|id| event.schedule_id.as_ref() == Some(id))
            && self
                .color_code
                .as_deref()
                .is_none_or(|c| event.color_code == c)
            && self
                .classification
                .as_deref()
                .is_none_or(|c| event.classification == c)
            && self.starts_within.is_none_or(|b| b.contains(event.start))
            && self.ends_within.is_none_or(|b| b.contains(event.end))
            && self
                .overlapping
                .is_none_or(|(start, end)| event.overlaps(start, end))
    }
}

/// Filters events with an [`EventFilter`].
pub fn filter_events<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    filter: &EventFilter,
) -> Vec<&'a Event> {
    events.into_iter().filter(|e| filter.matches(e)).collect()
}

/// Sorts events by start time, then end time, then id.
pub fn sort_events_by_start(events: &mut [Event]) {
    events.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| a.end.cmp(&b.end))
            .then_with(|| a.id.cmp(&b.id))
    });
}
