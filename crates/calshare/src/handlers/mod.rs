pub mod error;
pub mod events;
pub mod health;
pub mod requests;
pub mod schedules;
pub mod users;

pub use error::AppError;

use axum::{extract::rejection::JsonRejection, Json};
use calshare_core::storage::StoreError;

/// Unwraps a JSON body, reporting malformed payloads as validation errors.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        AppError::from(StoreError::validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    })
}
