use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::forms::{ShowForm, ValidationErrors};
use crate::services::{artist_service, show_service, venue_service};

/// GET /shows - every show joined with its venue and artist, past and
/// upcoming alike
pub async fn list_shows(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match show_service::list(&db).await {
        Ok(shows) => Json(json!({ "shows": shows })).into_response(),
        Err(e) => {
            tracing::error!("Failed to list shows: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An error occurred. Shows could not be listed." })),
            )
                .into_response()
        }
    }
}

/// GET /shows/create - blank form
pub async fn new_show_form() -> impl IntoResponse {
    Json(json!({ "form": ShowForm::default() }))
}

/// POST /shows/create
///
/// Field validation first, then referential checks against the store; the
/// insert only runs once both artist and venue are known to exist.
pub async fn create_show(
    State(db): State<DatabaseConnection>,
    Json(form): Json<ShowForm>,
) -> impl IntoResponse {
    if let Err(errors) = form.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": errors, "form": form })),
        )
            .into_response();
    }

    // validate() guarantees these are present and parseable
    let artist_id = form.artist_id.unwrap_or_default();
    let venue_id = form.venue_id.unwrap_or_default();
    let start_time = match form.start_time_utc() {
        Some(t) => t,
        None => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": "start_time must be an RFC 3339 timestamp" })),
            )
                .into_response()
        }
    };

    let mut errors = ValidationErrors::default();
    match artist_service::exists(&db, artist_id).await {
        Ok(false) => errors.add("artist_id", format!("no artist with id {}", artist_id)),
        Ok(true) => {}
        Err(e) => {
            tracing::error!("Artist lookup failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An error occurred. Show could not be listed." })),
            )
                .into_response();
        }
    }
    match venue_service::exists(&db, venue_id).await {
        Ok(false) => errors.add("venue_id", format!("no venue with id {}", venue_id)),
        Ok(true) => {}
        Err(e) => {
            tracing::error!("Venue lookup failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An error occurred. Show could not be listed." })),
            )
                .into_response();
        }
    }
    if !errors.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": errors, "form": form })),
        )
            .into_response();
    }

    match show_service::create(&db, artist_id, venue_id, start_time).await {
        Ok(model) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Show was successfully listed!",
                "show": model
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create show: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "An error occurred. Show could not be listed." })),
            )
                .into_response()
        }
    }
}
