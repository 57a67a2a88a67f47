//! CRUD and listing handlers for plant records.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use serde::Deserialize;
use std::sync::Arc;

use herbarium_core::{Language, PlantForm, SortOrder};
use herbarium_service::ImageUpload;

use crate::api_error::ApiError;
use crate::auth::ApiKey;
use crate::blocking::blocking_result;
use crate::response_types::PlantResponse;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LangQuery {
    #[serde(default)]
    pub lang: Language,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default)]
    pub lang: Language,
}

pub async fn list_plants(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Vec<PlantResponse>>, ApiError> {
    let service = Arc::clone(&state.service);
    let plants = blocking_result(move || service.list(SortOrder::Insertion)).await?;
    Ok(Json(plants.into_iter().map(|p| PlantResponse::from_plant(p, query.lang)).collect()))
}

pub async fn list_plants_by_date(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LangQuery>,
) -> Result<Json<Vec<PlantResponse>>, ApiError> {
    let service = Arc::clone(&state.service);
    let plants = blocking_result(move || service.list(SortOrder::ByDate)).await?;
    Ok(Json(plants.into_iter().map(|p| PlantResponse::from_plant(p, query.lang)).collect()))
}

pub async fn search_plants(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PlantResponse>>, ApiError> {
    let service = Arc::clone(&state.service);
    let lang = query.lang;
    let plants = blocking_result(move || service.search(&query.q, lang)).await?;
    Ok(Json(plants.into_iter().map(|p| PlantResponse::from_plant(p, lang)).collect()))
}

pub async fn get_plant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<LangQuery>,
) -> Result<Json<PlantResponse>, ApiError> {
    let service = Arc::clone(&state.service);
    let plant = blocking_result(move || service.get(id)).await?;
    Ok(Json(PlantResponse::from_plant(plant, query.lang)))
}

pub async fn create_plant(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    multipart: Multipart,
) -> Result<(StatusCode, Json<PlantResponse>), ApiError> {
    let submission = read_plant_form(multipart).await?;
    let service = Arc::clone(&state.service);
    let form = submission.form;
    let image = submission.image;
    let plant = blocking_result(move || service.create(&form, image)).await?;
    Ok((StatusCode::CREATED, Json(PlantResponse::from_plant(plant, submission.lang))))
}

pub async fn update_plant(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<PlantResponse>, ApiError> {
    let submission = read_plant_form(multipart).await?;
    let service = Arc::clone(&state.service);
    let form = submission.form;
    let image = submission.image;
    let lang = submission.lang;
    let plant = blocking_result(move || service.update(id, lang, &form, image)).await?;
    Ok(Json(PlantResponse::from_plant(plant, lang)))
}

pub async fn delete_plant(
    State(state): State<Arc<AppState>>,
    _auth: ApiKey,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let service = Arc::clone(&state.service);
    blocking_result(move || service.delete(id)).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

struct PlantSubmission {
    form: PlantForm,
    image: Option<ImageUpload>,
    lang: Language,
}

/// Drains a multipart body into the raw form record. Text fields land in
/// `PlantForm` by wire name, `image` becomes an upload, and `lang` scopes
/// the update's language context.
async fn read_plant_form(mut multipart: Multipart) -> Result<PlantSubmission, ApiError> {
    let mut submission = PlantSubmission {
        form: PlantForm::default(),
        image: None,
        lang: Language::default(),
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };
        if name == "image" {
            let filename = field.file_name().unwrap_or_default().to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("unreadable image upload: {e}")))?;
            if !filename.is_empty() && !bytes.is_empty() {
                submission.image = Some(ImageUpload { filename, bytes: bytes.to_vec() });
            }
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(format!("unreadable field '{name}': {e}")))?;
            if name == "lang" {
                submission.lang = text.parse().unwrap_or_default();
            } else {
                submission.form.set_field(&name, text);
            }
        }
    }

    Ok(submission)
}
