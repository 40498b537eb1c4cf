//! Sharing request handlers.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;

use calshare_core::calendar::{ResolveShareRequest, ShareRequest};

use super::{json_body, AppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PendingRequestsQuery {
    #[serde(default)]
    pub email: String,
}

/// Pending requests for a receiver (GET /api/requests?email=...).
pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<PendingRequestsQuery>,
) -> Result<Json<Vec<ShareRequest>>, AppError> {
    Ok(Json(
        state.requests.get_requests_for_receiver(&query.email).await?,
    ))
}

/// Accept a request (POST /api/requests/accept).
pub async fn accept_request(
    State(state): State<AppState>,
    body: Result<Json<ResolveShareRequest>, JsonRejection>,
) -> Result<Json<ShareRequest>, AppError> {
    let payload = json_body(body)?;
    Ok(Json(state.requests.accept_request(payload).await?))
}

/// Reject a request (POST /api/requests/reject).
pub async fn reject_request(
    State(state): State<AppState>,
    body: Result<Json<ResolveShareRequest>, JsonRejection>,
) -> Result<Json<ShareRequest>, AppError> {
    let payload = json_body(body)?;
    Ok(Json(state.requests.reject_request(payload).await?))
}
