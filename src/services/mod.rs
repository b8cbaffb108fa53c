//! Services layer
//!
//! Query/aggregation and record-store operations as pure functions over a
//! database connection, kept free of the HTTP layer.

pub mod artist_service;
pub mod show_service;
pub mod venue_service;

use serde::Serialize;

/// One name-search match with its upcoming-show count.
#[derive(Debug, Serialize)]
pub struct SearchEntry {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Result of a partial-name search over venues or artists.
#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchEntry>,
}
