//! Static passthrough for stored image artifacts.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api_error::ApiError;
use crate::blocking::blocking_result;
use crate::AppState;

pub async fn fetch_upload(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    let service = Arc::clone(&state.service);
    let lookup_key = key.clone();
    let bytes = blocking_result(move || service.fetch_image(&lookup_key)).await?;
    Ok(([(header::CONTENT_TYPE, content_type_for(&key))], bytes).into_response())
}

fn content_type_for(key: &str) -> &'static str {
    match key.rsplit_once('.').map(|(_, ext)| ext) {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
