use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;

use crate::domain::DomainError;
use crate::forms::{VenueForm, GENRES, STATES};
use crate::services::venue_service;

#[derive(Debug, Deserialize)]
pub struct SearchPayload {
    #[serde(default)]
    pub search_term: String,
}

/// GET /venues - venues grouped by (city, state)
pub async fn list_venues(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match venue_service::list_grouped(&db).await {
        Ok(areas) => Json(json!({ "areas": areas })).into_response(),
        Err(e) => {
            tracing::error!("Failed to list venues: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An error occurred. Venues could not be listed." })),
            )
                .into_response()
        }
    }
}

/// POST /venues/search - partial-name search
pub async fn search_venues(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<SearchPayload>,
) -> impl IntoResponse {
    match venue_service::search(&db, &payload.search_term).await {
        Ok(results) => Json(json!({
            "results": results,
            "search_term": payload.search_term
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Venue search failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An error occurred. Search could not be completed." })),
            )
                .into_response()
        }
    }
}

/// GET /venues/:id - detail view with past/upcoming shows
pub async fn get_venue(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match venue_service::detail(&db, id).await {
        Ok(venue) => Json(json!({ "venue": venue })).into_response(),
        Err(DomainError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Venue not found" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to load venue {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An error occurred. Venue could not be loaded." })),
            )
                .into_response()
        }
    }
}

/// GET /venues/create - blank form plus select vocabularies
pub async fn new_venue_form() -> impl IntoResponse {
    Json(json!({
        "form": VenueForm::default(),
        "genres": GENRES,
        "states": STATES
    }))
}

/// POST /venues/create
pub async fn create_venue(
    State(db): State<DatabaseConnection>,
    Json(form): Json<VenueForm>,
) -> impl IntoResponse {
    if let Err(errors) = form.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": errors, "form": form })),
        )
            .into_response();
    }

    match venue_service::create(&db, &form).await {
        Ok(model) => (
            StatusCode::CREATED,
            Json(json!({
                "message": format!("Venue {} was successfully listed!", model.name),
                "venue": model
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create venue: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("An error occurred. Venue {} could not be listed.", form.name)
                })),
            )
                .into_response()
        }
    }
}

/// DELETE /venues/:id - blocked while dependent shows exist
pub async fn delete_venue(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match venue_service::delete(&db, id).await {
        Ok(()) => Json(json!({ "message": "Venue was successfully deleted." })).into_response(),
        Err(DomainError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Venue not found" })),
        )
            .into_response(),
        Err(DomainError::Constraint(msg)) => {
            tracing::warn!("Venue delete blocked: {}", msg);
            (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "An error occurred. Venue cannot be deleted while it has shows booked."
                })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to delete venue {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An error occurred. Venue could not be deleted." })),
            )
                .into_response()
        }
    }
}

/// GET /venues/:id/edit - form populated from the record
pub async fn edit_venue_form(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match venue_service::get(&db, id).await {
        Ok(model) => Json(json!({
            "form": VenueForm::from_model(&model),
            "genres": GENRES,
            "states": STATES,
            "venue": { "id": model.id, "name": model.name }
        }))
        .into_response(),
        Err(DomainError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Venue not found" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to load venue {} for edit: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An error occurred. Venue could not be loaded." })),
            )
                .into_response()
        }
    }
}

/// POST /venues/:id/edit - full replace of all mutable fields
pub async fn update_venue(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(form): Json<VenueForm>,
) -> impl IntoResponse {
    if let Err(errors) = form.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": errors, "form": form })),
        )
            .into_response();
    }

    match venue_service::update(&db, id, &form).await {
        Ok(model) => Json(json!({
            "message": format!("Venue {} was successfully updated!", model.name),
            "venue": model
        }))
        .into_response(),
        Err(DomainError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Venue not found" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update venue {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("An error occurred. Venue {} could not be updated.", form.name)
                })),
            )
                .into_response()
        }
    }
}
