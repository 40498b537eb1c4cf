mod id;
mod operations;
mod requests;
mod types;
pub mod validation;

pub use id::{InvalidRecordId, RecordId};
pub use operations::{filter_events, sort_events_by_start, EventFilter, TimeBounds};
pub use requests::{
    AvailabilityResponse, CreateEventRequest, CreateScheduleRequest, CreateUserRequest,
    CreatedResponse, ResolveShareRequest, UpdateEventRequest, UpdateScheduleRequest,
};
pub use types::{
    Event, EventMemberships, MembershipKind, RequestStatus, Schedule, ShareRequest, User,
};
pub use validation::Validator;
