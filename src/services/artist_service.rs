//! Artist queries, aggregation, and transactional mutations.
//!
//! Artists have no delete operation: unlike venues, the observed interface
//! never removes an artist, so no dependent-show guard exists here.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;

use crate::domain::DomainError;
use crate::forms::{deserialize_genres, serialize_genres, ArtistForm};
use crate::models::{artist, venue};
use crate::services::show_service;
use crate::services::{SearchEntry, SearchResults};

#[derive(Debug, Serialize)]
pub struct ArtistSummary {
    pub id: i32,
    pub name: String,
}

/// One of an artist's shows with the venue attached, for the detail page.
#[derive(Debug, Serialize)]
pub struct ArtistShowEntry {
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

/// Assembled read-only projection of an artist plus its partitioned shows.
#[derive(Debug, Serialize)]
pub struct ArtistDetail {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub past_shows: Vec<ArtistShowEntry>,
    pub upcoming_shows: Vec<ArtistShowEntry>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

/// Flat artist listing: id and name only, in store order.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<ArtistSummary>, DomainError> {
    let artists = artist::Entity::find()
        .order_by_asc(artist::Column::Id)
        .all(db)
        .await?;

    Ok(artists
        .into_iter()
        .map(|a| ArtistSummary {
            id: a.id,
            name: a.name,
        })
        .collect())
}

/// Case-insensitive substring search on artist name, with the count of shows
/// starting strictly after now attached to each match.
pub async fn search(db: &DatabaseConnection, term: &str) -> Result<SearchResults, DomainError> {
    let matches = artist::Entity::find()
        .filter(artist::Column::Name.contains(term))
        .all(db)
        .await?;

    let now = Utc::now();
    let mut data = Vec::with_capacity(matches.len());

    for artist_model in matches {
        let shows = show_service::shows_for_artist(db, artist_model.id).await?;
        data.push(SearchEntry {
            id: artist_model.id,
            name: artist_model.name,
            num_upcoming_shows: show_service::count_upcoming(&shows, now)?,
        });
    }

    Ok(SearchResults {
        count: data.len(),
        data,
    })
}

/// Fetch an artist record by id, for edit-form population.
pub async fn get(db: &DatabaseConnection, id: i32) -> Result<artist::Model, DomainError> {
    artist::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)
}

/// Whether an artist with this id exists. Used by the show form's
/// referential check.
pub async fn exists(db: &DatabaseConnection, id: i32) -> Result<bool, DomainError> {
    Ok(artist::Entity::find_by_id(id).one(db).await?.is_some())
}

/// Assemble the artist detail view: scalar fields, deserialized genres, and
/// shows partitioned into past and upcoming with the venue joined on.
pub async fn detail(db: &DatabaseConnection, id: i32) -> Result<ArtistDetail, DomainError> {
    let artist_model = get(db, id).await?;
    let shows = show_service::shows_for_artist(db, id).await?;

    let now = Utc::now();
    let mut past_shows = Vec::new();
    let mut upcoming_shows = Vec::new();

    for show_model in shows {
        let venue_model = venue::Entity::find_by_id(show_model.venue_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                DomainError::Internal(format!(
                    "show {} references missing venue {}",
                    show_model.id, show_model.venue_id
                ))
            })?;

        let entry = ArtistShowEntry {
            venue_id: venue_model.id,
            venue_name: venue_model.name,
            venue_image_link: venue_model.image_link,
            start_time: show_model.start_time.clone(),
        };

        if show_service::is_past(&show_model.start_time, now)? {
            past_shows.push(entry);
        } else {
            upcoming_shows.push(entry);
        }
    }

    Ok(ArtistDetail {
        id: artist_model.id,
        name: artist_model.name,
        city: artist_model.city,
        state: artist_model.state,
        phone: artist_model.phone,
        genres: deserialize_genres(&artist_model.genres),
        image_link: artist_model.image_link,
        facebook_link: artist_model.facebook_link,
        website_link: artist_model.website_link,
        seeking_venue: artist_model.seeking_venue,
        seeking_description: artist_model.seeking_description,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    })
}

/// Insert a validated artist inside a transaction.
pub async fn create(
    db: &DatabaseConnection,
    form: &ArtistForm,
) -> Result<artist::Model, DomainError> {
    let txn = db.begin().await?;
    let now = Utc::now().to_rfc3339();

    let new_artist = artist::ActiveModel {
        name: Set(form.name.clone()),
        city: Set(form.city.clone()),
        state: Set(form.state.clone()),
        phone: Set(form.phone.clone()),
        genres: Set(serialize_genres(&form.genres)),
        image_link: Set(form.image_link.clone()),
        facebook_link: Set(form.facebook_link.clone()),
        website_link: Set(form.website_link.clone()),
        seeking_venue: Set(form.seeking_venue),
        seeking_description: Set(form.seeking_description.clone()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_artist.insert(&txn).await?;
    txn.commit().await?;

    Ok(model)
}

/// Full replace of all mutable fields, inside a transaction.
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    form: &ArtistForm,
) -> Result<artist::Model, DomainError> {
    let txn = db.begin().await?;

    let artist_model = artist::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound)?;

    let mut active: artist::ActiveModel = artist_model.into();
    active.name = Set(form.name.clone());
    active.city = Set(form.city.clone());
    active.state = Set(form.state.clone());
    active.phone = Set(form.phone.clone());
    active.genres = Set(serialize_genres(&form.genres));
    active.image_link = Set(form.image_link.clone());
    active.facebook_link = Set(form.facebook_link.clone());
    active.website_link = Set(form.website_link.clone());
    active.seeking_venue = Set(form.seeking_venue);
    active.seeking_description = Set(form.seeking_description.clone());
    active.updated_at = Set(Utc::now().to_rfc3339());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(model)
}
