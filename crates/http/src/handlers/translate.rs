//! Display-language translation lookup for the form client.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::response_types::TranslationResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TranslateQuery {
    pub text: String,
}

/// Infallible by contract: a failed external lookup degrades to the source
/// text, so this handler never surfaces an error.
pub async fn translate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TranslateQuery>,
) -> Json<TranslationResponse> {
    let text_ja = state.translator.translate(&query.text).await;
    Json(TranslationResponse { text_en: query.text, text_ja })
}
