use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::api::venue::SearchPayload;
use crate::domain::DomainError;
use crate::forms::{ArtistForm, GENRES, STATES};
use crate::services::artist_service;

/// GET /artists - flat id/name listing
pub async fn list_artists(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match artist_service::list(&db).await {
        Ok(artists) => Json(json!({ "artists": artists })).into_response(),
        Err(e) => {
            tracing::error!("Failed to list artists: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An error occurred. Artists could not be listed." })),
            )
                .into_response()
        }
    }
}

/// POST /artists/search - partial-name search
pub async fn search_artists(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<SearchPayload>,
) -> impl IntoResponse {
    match artist_service::search(&db, &payload.search_term).await {
        Ok(results) => Json(json!({
            "results": results,
            "search_term": payload.search_term
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Artist search failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An error occurred. Search could not be completed." })),
            )
                .into_response()
        }
    }
}

/// GET /artists/:id - detail view with past/upcoming shows
pub async fn get_artist(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match artist_service::detail(&db, id).await {
        Ok(artist) => Json(json!({ "artist": artist })).into_response(),
        Err(DomainError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Artist not found" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to load artist {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An error occurred. Artist could not be loaded." })),
            )
                .into_response()
        }
    }
}

/// GET /artists/create - blank form plus select vocabularies
pub async fn new_artist_form() -> impl IntoResponse {
    Json(json!({
        "form": ArtistForm::default(),
        "genres": GENRES,
        "states": STATES
    }))
}

/// POST /artists/create
pub async fn create_artist(
    State(db): State<DatabaseConnection>,
    Json(form): Json<ArtistForm>,
) -> impl IntoResponse {
    if let Err(errors) = form.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": errors, "form": form })),
        )
            .into_response();
    }

    match artist_service::create(&db, &form).await {
        Ok(model) => (
            StatusCode::CREATED,
            Json(json!({
                "message": format!("Artist {} was successfully listed!", model.name),
                "artist": model
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create artist: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("An error occurred. Artist {} could not be listed.", form.name)
                })),
            )
                .into_response()
        }
    }
}

/// GET /artists/:id/edit - form populated from the record
pub async fn edit_artist_form(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match artist_service::get(&db, id).await {
        Ok(model) => Json(json!({
            "form": ArtistForm::from_model(&model),
            "genres": GENRES,
            "states": STATES,
            "artist": { "id": model.id, "name": model.name }
        }))
        .into_response(),
        Err(DomainError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Artist not found" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to load artist {} for edit: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An error occurred. Artist could not be loaded." })),
            )
                .into_response()
        }
    }
}

/// POST /artists/:id/edit - full replace of all mutable fields
pub async fn update_artist(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Json(form): Json<ArtistForm>,
) -> impl IntoResponse {
    if let Err(errors) = form.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": errors, "form": form })),
        )
            .into_response();
    }

    match artist_service::update(&db, id, &form).await {
        Ok(model) => Json(json!({
            "message": format!("Artist {} was successfully updated!", model.name),
            "artist": model
        }))
        .into_response(),
        Err(DomainError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Artist not found" })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to update artist {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("An error occurred. Artist {} could not be updated.", form.name)
                })),
            )
                .into_response()
        }
    }
}
