//! Typed API error for HTTP handlers.
//!
//! Converts domain errors into proper HTTP responses with JSON body and
//! status codes. Handlers return `Result<Json<T>, ApiError>` instead of
//! losing error context with bare `StatusCode`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use herbarium_service::ServiceError;
use herbarium_storage::StorageError;

/// API error with HTTP status code and human-readable message.
///
/// Converts to JSON response: `{"error": "message"}`.
///
/// `Internal` logs the real error server-side and returns a static message
/// to the client — no error detail leakage.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request — missing/malformed field, bad multipart body.
    BadRequest(String),
    /// 401 Unauthorized — API key header absent.
    Unauthorized(String),
    /// 403 Forbidden — API key header present but wrong.
    Forbidden(String),
    /// 404 Not Found — plant id or artifact key doesn't exist.
    NotFound(String),
    /// 409 Conflict — uniqueness violation or mismatched bilingual pair.
    Conflict(String),
    /// 500 Internal Server Error — unexpected failure. Details logged, not exposed.
    Internal(anyhow::Error),
    /// 500 Internal Server Error — required server configuration absent.
    /// Unlike `Internal`, the message is stable and returned to the client.
    Misconfigured(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
            }
            Self::Misconfigured(msg) => {
                tracing::error!(error = %msg, "server misconfigured");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(v) => Self::BadRequest(v.to_string()),
            ServiceError::Storage(StorageError::NotFound { entity, id }) => {
                Self::NotFound(format!("{entity} {id} not found"))
            }
            ServiceError::Storage(StorageError::ArtifactNotFound(key)) => {
                Self::NotFound(format!("artifact '{key}' not found"))
            }
            ServiceError::Storage(StorageError::Conflict(msg)) => Self::Conflict(msg),
            ServiceError::Storage(other) => Self::Internal(other.into()),
        }
    }
}
