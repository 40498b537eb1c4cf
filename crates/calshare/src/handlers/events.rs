//! Event handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use calshare_core::calendar::{CreateEventRequest, CreatedResponse, Event, UpdateEventRequest};
use calshare_core::storage::StoreError;

use super::{json_body, AppError};
use crate::state::AppState;

/// Filters for listing events. Exactly one of `color_code`,
/// `classification`, `start_date` or `end_date` must be set; `user_id`
/// narrows the first two.
#[derive(Debug, Default, Deserialize)]
pub struct ListEventsQuery {
    pub color_code: Option<String>,
    pub classification: Option<String>,
    pub user_id: Option<String>,
    /// YYYY-MM-DD
    pub start_date: Option<String>,
    /// YYYY-MM-DD
    pub end_date: Option<String>,
}

/// Create an event (POST /api/events).
pub async fn create_event(
    State(state): State<AppState>,
    body: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = json_body(body)?;
    tracing::debug!(payload = ?payload, "Received create event request");

    let id = state.events.create_event(payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// Query events (GET /api/events).
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<Vec<Event>>, AppError> {
    let ListEventsQuery {
        color_code,
        classification,
        user_id,
        start_date,
        end_date,
    } = query;

    let events = match (color_code, classification, start_date, end_date, user_id) {
        (Some(color), None, None, None, None) => {
            state.events.get_events_by_color_code(&color).await?
        }
        (Some(color), None, None, None, Some(user_id)) => {
            state
                .events
                .get_events_by_color_code_per_user(&user_id, &color)
                .await?
        }
        (None, Some(classification), None, None, None) => {
            state
                .events
                .get_events_by_classification(&classification)
                .await?
        }
        (None, Some(classification), None, None, Some(user_id)) => {
            state
                .events
                .get_events_by_classification_by_user(&user_id, &classification)
                .await?
        }
        (None, None, Some(date), None, None) => state.events.get_events_by_start_date(&date).await?,
        (None, None, None, Some(date), None) => state.events.get_events_by_end_date(&date).await?,
        _ => {
            return Err(StoreError::validation(
                "Provide exactly one of color_code, classification, start_date or end_date; \
                 user_id may only narrow color_code or classification",
            )
            .into())
        }
    };

    Ok(Json(events))
}

/// Get an event by ID (GET /api/events/{id}).
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppError> {
    state
        .events
        .get_event_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Event not found with id {id}")))
}

/// Update an event (PUT /api/events/{id}).
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<Json<Event>, AppError> {
    let payload = json_body(body)?;
    Ok(Json(state.events.update_event(&id, payload).await?))
}

/// Delete an event (DELETE /api/events/{id}).
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.events.remove_event(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
