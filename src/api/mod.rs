pub mod artist;
pub mod health;
pub mod show;
pub mod venue;

use axum::{
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

pub fn api_router(db: DatabaseConnection) -> Router {
    Router::new()
        .route("/", get(health::home))
        .route("/health", get(health::health_check))
        // Venues
        .route("/venues", get(venue::list_venues))
        .route("/venues/search", post(venue::search_venues))
        .route(
            "/venues/create",
            get(venue::new_venue_form).post(venue::create_venue),
        )
        .route("/venues/:id", get(venue::get_venue))
        .route("/venues/:id", delete(venue::delete_venue))
        .route(
            "/venues/:id/edit",
            get(venue::edit_venue_form).post(venue::update_venue),
        )
        // Artists (no delete route)
        .route("/artists", get(artist::list_artists))
        .route("/artists/search", post(artist::search_artists))
        .route(
            "/artists/create",
            get(artist::new_artist_form).post(artist::create_artist),
        )
        .route("/artists/:id", get(artist::get_artist))
        .route(
            "/artists/:id/edit",
            get(artist::edit_artist_form).post(artist::update_artist),
        )
        // Shows
        .route("/shows", get(show::list_shows))
        .route(
            "/shows/create",
            get(show::new_show_form).post(show::create_show),
        )
        .fallback(not_found)
        .with_state(db)
}

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Page not found" })),
    )
}
