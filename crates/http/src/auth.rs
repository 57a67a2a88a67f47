//! Shared-secret gate for mutating routes.
//!
//! The key is compared against the `x-api-key` request header. The core
//! does not generate or rotate the secret; it only checks it, before any
//! validation runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::sync::Arc;

use crate::api_error::ApiError;
use crate::AppState;

/// Extractor guarding authenticated routes. Succeeds only when the request
/// carries the configured API key; list it before the body extractor so the
/// check runs first.
#[derive(Debug, Clone, Copy)]
pub struct ApiKey;

impl FromRequestParts<Arc<AppState>> for ApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.api_key.as_deref() else {
            return Err(ApiError::Misconfigured("server API key is not configured".to_owned()));
        };
        match parts.headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
            None => Err(ApiError::Unauthorized("missing API key".to_owned())),
            Some(key) if key == expected => Ok(Self),
            Some(_) => Err(ApiError::Forbidden("invalid API key".to_owned())),
        }
    }
}
