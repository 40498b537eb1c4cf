use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use calshare_core::storage::{
    repository_error_to_status_code, store_error_to_status_code, RepositoryError, StoreError,
};

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub messages: Vec<String>,
}

pub struct AppError(pub anyhow::Error);

impl AppError {
    /// 404 for a lookup that returned nothing.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(StoreError::not_found(message).into())
    }

    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        if let Some(store_error) = self.0.downcast_ref::<StoreError>() {
            let code = store_error_to_status_code(store_error);
            return (
                StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                ErrorBody {
                    error: store_error.kind(),
                    messages: store_error.messages(),
                },
            );
        }

        if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let store_error = StoreError::Repository(repo_error.clone());
            let code = repository_error_to_status_code(repo_error);
            return (
                StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                ErrorBody {
                    error: store_error.kind(),
                    messages: store_error.messages(),
                },
            );
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody {
                error: "internal",
                messages: vec![self.0.to_string()],
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %self.0, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
