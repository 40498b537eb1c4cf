//! Schedule CRUD handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use calshare_core::calendar::{
    AvailabilityResponse, CreateScheduleRequest, CreatedResponse, Event, Schedule,
    UpdateScheduleRequest,
};
use calshare_core::storage::StoreError;

use super::{json_body, AppError};
use crate::state::AppState;

/// Optional time window for schedule queries.
#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Create a schedule (POST /api/schedules).
pub async fn create_schedule(
    State(state): State<AppState>,
    body: Result<Json<CreateScheduleRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = json_body(body)?;
    let id = state.schedules.create_schedule(payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// Get a schedule by ID (GET /api/schedules/{id}).
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Schedule>, AppError> {
    state
        .schedules
        .get_schedule_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Schedule not found with id {id}")))
}

/// Update a schedule (PUT /api/schedules/{id}).
pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateScheduleRequest>, JsonRejection>,
) -> Result<Json<Schedule>, AppError> {
    let payload = json_body(body)?;
    Ok(Json(state.schedules.update_schedule(&id, payload).await?))
}

/// Delete a schedule (DELETE /api/schedules/{id}).
pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.schedules.remove_schedule(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Events in a schedule (GET /api/schedules/{id}/events).
///
/// With both `start` and `end` only events starting inside the window are
/// returned.
pub async fn list_schedule_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(window): Query<WindowQuery>,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = match (window.start.as_deref(), window.end.as_deref()) {
        (None, None) => state.events.get_events_by_schedule(&id).await?,
        (Some(start), Some(end)) => {
            state
                .events
                .get_events_by_date_range(&id, start, end)
                .await?
        }
        _ => {
            return Err(StoreError::validation(
                "Both start and end are required for a date range",
            )
            .into())
        }
    };
    Ok(Json(events))
}

/// Whether a time slot is free (GET /api/schedules/{id}/availability).
pub async fn check_availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(window): Query<WindowQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let available = state
        .events
        .check_event_availability(
            &id,
            window.start.as_deref().unwrap_or_default(),
            window.end.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(AvailabilityResponse { available }))
}
