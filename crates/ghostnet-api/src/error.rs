use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use ghostnet_db::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Caller-recoverable failures carry a field-qualified message; anything
/// unexpected from the infrastructure lands in `Internal` and is never
/// dressed up as a validation problem.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Constraint(msg) => {
                // Pre-checks usually catch duplicates; this is the race
                // window where the DB constraint fires first.
                ApiError::Conflict(format!("uniqueness constraint violated: {}", msg))
            }
            other => ApiError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(err) => {
                error!("internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Blocking-task join failures are infrastructure faults.
pub(crate) fn join_error(e: tokio::task::JoinError) -> ApiError {
    ApiError::Internal(anyhow::anyhow!("blocking task join error: {}", e))
}
