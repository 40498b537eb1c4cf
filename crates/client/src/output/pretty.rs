//! Pretty output formatting.

use calshare_core::calendar::{Event, Schedule, ShareRequest, User};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

fn format_list<T>(title: &str, empty: &str, items: &[T], format: fn(&T) -> String) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    let mut output = format!("{} ({})\n", title, items.len());
    output.push_str(&"-".repeat(40));
    for item in items {
        output.push_str(&format!("\n{}", format(item)));
        output.push('\n');
    }
    output
}

/// Format a user for display.
pub fn format_user(user: &User) -> String {
    format!(
        "{}\n  ID: {}\n  Email: {}\n  Organizing: {}\n  Attending: {}",
        user.display_name,
        user.id,
        user.email,
        user.events.organizing.len(),
        user.events.attending.len()
    )
}

/// Format a schedule for display.
pub fn format_schedule(schedule: &Schedule) -> String {
    format!(
        "{}\n  ID: {}\n  Owner: {}",
        schedule.name, schedule.id, schedule.user_id
    )
}

/// Format schedules for display.
pub fn format_schedules(schedules: &[Schedule]) -> String {
    format_list("SCHEDULES", "No schedules found.", schedules, format_schedule)
}

/// Format an event for display.
pub fn format_event(event: &Event) -> String {
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  Organizer: {}\n  Start: {}\n  End: {}\n  Color: {}",
        event.name,
        event.classification,
        event.id,
        event.user_id,
        event.start.format(TIME_FORMAT),
        event.end.format(TIME_FORMAT),
        event.color_code
    );
    match (&event.schedule_id, &event.schedule_name) {
        (Some(id), Some(name)) => output.push_str(&format!("\n  Schedule: {} ({})", name, id)),
        (Some(id), None) => output.push_str(&format!("\n  Schedule: {}", id)),
        (None, Some(name)) => output.push_str(&format!("\n  Schedule: {}", name)),
        (None, None) => {}
    }
    output
}

/// Format events for display.
pub fn format_events(events: &[Event]) -> String {
    format_list("EVENTS", "No events found.", events, format_event)
}

/// Format a sharing request for display.
pub fn format_request(request: &ShareRequest) -> String {
    format!(
        "{} -> {} [{}]\n  ID: {}\n  Event: {} ({})",
        request.sender_email,
        request.receiver_email,
        request.status.as_str(),
        request.id,
        request.event.name,
        request.event.id
    )
}

/// Format sharing requests for display.
pub fn format_requests(requests: &[ShareRequest]) -> String {
    format_list("REQUESTS", "No pending requests.", requests, format_request)
}
