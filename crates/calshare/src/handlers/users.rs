//! User handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use calshare_core::calendar::{CreateUserRequest, Event, Schedule, User};

use super::{json_body, AppError};
use crate::state::AppState;

/// Register a user (POST /api/users).
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = json_body(body)?;
    let user = state.users.create_user(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by ID (GET /api/users/{id}).
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    state
        .users
        .get_user(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("User not found with id {id}")))
}

/// Events a user organizes or attends (GET /api/users/{id}/events).
pub async fn list_user_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.events.get_events_by_user(&id).await?))
}

/// Schedules owned by a user (GET /api/users/{id}/schedules).
pub async fn list_user_schedules(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Schedule>>, AppError> {
    Ok(Json(state.schedules.get_schedule_by_user(&id).await?))
}
