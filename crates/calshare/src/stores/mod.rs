//! Data-access operations behind the HTTP handlers.
//!
//! Each store validates its input, talks to one or more repositories and
//! returns a [`StoreResult`](calshare_core::storage::StoreResult). Stores
//! hold repository trait objects, so the same code runs against every
//! storage backend.

mod events;
mod requests;
mod schedules;
mod users;

pub use events::EventStore;
pub use requests::RequestStore;
pub use schedules::ScheduleStore;
pub use users::UserStore;

use calshare_core::calendar::{validation::check_id, RecordId};
use calshare_core::storage::{StoreError, StoreResult};

/// Validates a single identifier argument.
fn parse_id(value: &str, field: &str) -> StoreResult<RecordId> {
    check_id(value, field).map_err(StoreError::validation)
}
