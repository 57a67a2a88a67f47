//! Helpers for running the synchronous service layer in async handlers.
//!
//! Every storage touch goes through `spawn_blocking`; these helpers
//! eliminate the join-error and domain-error mapping boilerplate.

use tokio::task::spawn_blocking;

use crate::api_error::ApiError;
use herbarium_service::ServiceError;

/// Runs a blocking closure and returns the raw value for response shaping.
pub async fn blocking_result<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("join error: {e}")))?
        .map_err(ApiError::from)
}
