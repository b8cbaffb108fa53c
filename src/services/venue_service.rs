//! Venue queries, aggregation, and transactional mutations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};
use serde::Serialize;

use crate::domain::DomainError;
use crate::forms::{deserialize_genres, serialize_genres, VenueForm};
use crate::models::{artist, show, venue};
use crate::services::show_service;
use crate::services::{SearchEntry, SearchResults};

#[derive(Debug, Serialize)]
pub struct VenueSummary {
    pub id: i32,
    pub name: String,
}

/// Venues sharing a (city, state) pair, in first-seen order of the pair.
#[derive(Debug, Serialize)]
pub struct CityGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

/// One of a venue's shows with the artist attached, for the detail page.
#[derive(Debug, Serialize)]
pub struct VenueShowEntry {
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

/// Assembled read-only projection of a venue plus its partitioned shows.
#[derive(Debug, Serialize)]
pub struct VenueDetail {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub past_shows: Vec<VenueShowEntry>,
    pub upcoming_shows: Vec<VenueShowEntry>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

/// All venues grouped by (city, state). Groups appear in first-seen order,
/// venues within a group in store order. Per-venue upcoming-show counts are
/// not part of this listing.
pub async fn list_grouped(db: &DatabaseConnection) -> Result<Vec<CityGroup>, DomainError> {
    let venues = venue::Entity::find().all(db).await?;

    let mut groups: Vec<CityGroup> = Vec::new();

    for venue_model in venues {
        let summary = VenueSummary {
            id: venue_model.id,
            name: venue_model.name,
        };

        match groups
            .iter_mut()
            .find(|g| g.city == venue_model.city && g.state == venue_model.state)
        {
            Some(group) => group.venues.push(summary),
            None => groups.push(CityGroup {
                city: venue_model.city,
                state: venue_model.state,
                venues: vec![summary],
            }),
        }
    }

    Ok(groups)
}

/// Case-insensitive substring search on venue name, with the count of shows
/// starting strictly after now attached to each match.
pub async fn search(db: &DatabaseConnection, term: &str) -> Result<SearchResults, DomainError> {
    let matches = venue::Entity::find()
        .filter(venue::Column::Name.contains(term))
        .all(db)
        .await?;

    let now = Utc::now();
    let mut data = Vec::with_capacity(matches.len());

    for venue_model in matches {
        let shows = show_service::shows_for_venue(db, venue_model.id).await?;
        data.push(SearchEntry {
            id: venue_model.id,
            name: venue_model.name,
            num_upcoming_shows: show_service::count_upcoming(&shows, now)?,
        });
    }

    Ok(SearchResults {
        count: data.len(),
        data,
    })
}

/// Fetch a venue record by id, for edit-form population.
pub async fn get(db: &DatabaseConnection, id: i32) -> Result<venue::Model, DomainError> {
    venue::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound)
}

/// Whether a venue with this id exists. Used by the show form's
/// referential check.
pub async fn exists(db: &DatabaseConnection, id: i32) -> Result<bool, DomainError> {
    Ok(venue::Entity::find_by_id(id).one(db).await?.is_some())
}

/// Assemble the venue detail view: scalar fields, deserialized genres, and
/// shows partitioned into past and upcoming with the artist joined on.
pub async fn detail(db: &DatabaseConnection, id: i32) -> Result<VenueDetail, DomainError> {
    let venue_model = get(db, id).await?;
    let shows = show_service::shows_for_venue(db, id).await?;

    let now = Utc::now();
    let mut past_shows = Vec::new();
    let mut upcoming_shows = Vec::new();

    for show_model in shows {
        let artist_model = artist::Entity::find_by_id(show_model.artist_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                DomainError::Internal(format!(
                    "show {} references missing artist {}",
                    show_model.id, show_model.artist_id
                ))
            })?;

        let entry = VenueShowEntry {
            artist_id: artist_model.id,
            artist_name: artist_model.name,
            artist_image_link: artist_model.image_link,
            start_time: show_model.start_time.clone(),
        };

        if show_service::is_past(&show_model.start_time, now)? {
            past_shows.push(entry);
        } else {
            upcoming_shows.push(entry);
        }
    }

    Ok(VenueDetail {
        id: venue_model.id,
        name: venue_model.name,
        city: venue_model.city,
        state: venue_model.state,
        address: venue_model.address,
        phone: venue_model.phone,
        genres: deserialize_genres(&venue_model.genres),
        image_link: venue_model.image_link,
        facebook_link: venue_model.facebook_link,
        website_link: venue_model.website_link,
        seeking_talent: venue_model.seeking_talent,
        seeking_description: venue_model.seeking_description,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    })
}

/// Insert a validated venue inside a transaction.
pub async fn create(db: &DatabaseConnection, form: &VenueForm) -> Result<venue::Model, DomainError> {
    let txn = db.begin().await?;
    let now = Utc::now().to_rfc3339();

    let new_venue = venue::ActiveModel {
        name: Set(form.name.clone()),
        city: Set(form.city.clone()),
        state: Set(form.state.clone()),
        address: Set(form.address.clone()),
        phone: Set(form.phone.clone()),
        genres: Set(serialize_genres(&form.genres)),
        image_link: Set(form.image_link.clone()),
        facebook_link: Set(form.facebook_link.clone()),
        website_link: Set(form.website_link.clone()),
        seeking_talent: Set(form.seeking_talent),
        seeking_description: Set(form.seeking_description.clone()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_venue.insert(&txn).await?;
    txn.commit().await?;

    Ok(model)
}

/// Full replace of all mutable fields, inside a transaction.
pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    form: &VenueForm,
) -> Result<venue::Model, DomainError> {
    let txn = db.begin().await?;

    let venue_model = venue::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound)?;

    let mut active: venue::ActiveModel = venue_model.into();
    active.name = Set(form.name.clone());
    active.city = Set(form.city.clone());
    active.state = Set(form.state.clone());
    active.address = Set(form.address.clone());
    active.phone = Set(form.phone.clone());
    active.genres = Set(serialize_genres(&form.genres));
    active.image_link = Set(form.image_link.clone());
    active.facebook_link = Set(form.facebook_link.clone());
    active.website_link = Set(form.website_link.clone());
    active.seeking_talent = Set(form.seeking_talent);
    active.seeking_description = Set(form.seeking_description.clone());
    active.updated_at = Set(Utc::now().to_rfc3339());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(model)
}

/// Delete a venue unless shows still reference it. The dependent-show check
/// runs inside the same transaction as the delete.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let txn = db.begin().await?;

    let dependent_shows = show::Entity::find()
        .filter(show::Column::VenueId.eq(id))
        .count(&txn)
        .await?;

    if dependent_shows > 0 {
        return Err(DomainError::Constraint(format!(
            "venue {} still has {} show(s) booked",
            id, dependent_shows
        )));
    }

    let result = venue::Entity::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound);
    }

    txn.commit().await?;
    Ok(())
}
