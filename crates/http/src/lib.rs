//! HTTP API server for herbarium.

pub mod api_error;
mod auth;
mod blocking;
mod handlers;
mod response_types;

use axum::{
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use herbarium_service::{PlantService, Translator};

pub use response_types::{PlantResponse, TranslationResponse};

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Plant repository orchestration (validation, dimensions, artifacts).
    pub service: Arc<PlantService>,
    /// Display-only translation collaborator.
    pub translator: Arc<Translator>,
    /// Shared secret expected in `x-api-key` on mutating routes.
    pub api_key: Option<String>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/plants",
            get(handlers::plants::list_plants).post(handlers::plants::create_plant),
        )
        .route("/plants/sort_by_date", get(handlers::plants::list_plants_by_date))
        .route("/plants/search", get(handlers::plants::search_plants))
        .route(
            "/plants/{id}",
            get(handlers::plants::get_plant)
                .put(handlers::plants::update_plant)
                .delete(handlers::plants::delete_plant),
        )
        .route("/uploads/{key}", get(handlers::uploads::fetch_upload))
        .route("/translate", get(handlers::translate::translate))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
