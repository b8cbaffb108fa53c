//! Show queries and creation.
//!
//! Shows are join records; they are created once and never edited or deleted
//! through the interface.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;

use crate::domain::DomainError;
use crate::models::{artist, show, venue};

/// Row of the global shows listing: show joined with venue and artist.
#[derive(Debug, Serialize)]
pub struct ShowListing {
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

/// Global shows list: inner join with venue and artist, no time filtering,
/// store-default order.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<ShowListing>, DomainError> {
    let shows = show::Entity::find()
        .find_also_related(venue::Entity)
        .all(db)
        .await?;

    let mut listings = Vec::new();

    for (show_model, venue_model) in shows {
        let venue_model = match venue_model {
            Some(v) => v,
            None => continue,
        };
        let artist_model = match artist::Entity::find_by_id(show_model.artist_id).one(db).await? {
            Some(a) => a,
            None => continue,
        };

        listings.push(ShowListing {
            venue_id: venue_model.id,
            venue_name: venue_model.name,
            artist_id: artist_model.id,
            artist_name: artist_model.name,
            artist_image_link: artist_model.image_link,
            start_time: show_model.start_time,
        });
    }

    Ok(listings)
}

/// All shows booked at a venue, ordered by start time.
pub async fn shows_for_venue(
    db: &DatabaseConnection,
    venue_id: i32,
) -> Result<Vec<show::Model>, DomainError> {
    let shows = show::Entity::find()
        .filter(show::Column::VenueId.eq(venue_id))
        .order_by_asc(show::Column::StartTime)
        .all(db)
        .await?;
    Ok(shows)
}

/// All shows booked by an artist, ordered by start time.
pub async fn shows_for_artist(
    db: &DatabaseConnection,
    artist_id: i32,
) -> Result<Vec<show::Model>, DomainError> {
    let shows = show::Entity::find()
        .filter(show::Column::ArtistId.eq(artist_id))
        .order_by_asc(show::Column::StartTime)
        .all(db)
        .await?;
    Ok(shows)
}

/// Whether a stored start time falls strictly before `now`.
///
/// Detail pages treat `start_time == now` as upcoming, so past is the
/// strict side of the partition.
pub fn is_past(start_time: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
    let start = parse_start_time(start_time)?;
    Ok(start < now)
}

/// Whether a stored start time falls strictly after `now`. Search result
/// counts use this comparison, not the detail-page one.
pub fn is_upcoming_strict(start_time: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
    let start = parse_start_time(start_time)?;
    Ok(start > now)
}

fn parse_start_time(start_time: &str) -> Result<DateTime<Utc>, DomainError> {
    DateTime::parse_from_rfc3339(start_time)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::Internal(format!("stored start_time is not RFC 3339: {}", e)))
}

/// Count an artist's or venue's shows starting strictly after `now`.
pub fn count_upcoming(shows: &[show::Model], now: DateTime<Utc>) -> Result<usize, DomainError> {
    let mut count = 0;
    for show_model in shows {
        if is_upcoming_strict(&show_model.start_time, now)? {
            count += 1;
        }
    }
    Ok(count)
}

/// Insert a show inside a transaction. Referential validity of artist_id and
/// venue_id is checked by the caller before this point.
pub async fn create(
    db: &DatabaseConnection,
    artist_id: i32,
    venue_id: i32,
    start_time: DateTime<Utc>,
) -> Result<show::Model, DomainError> {
    let txn = db.begin().await?;

    let new_show = show::ActiveModel {
        artist_id: Set(artist_id),
        venue_id: Set(venue_id),
        start_time: Set(start_time.to_rfc3339()),
        created_at: Set(Utc::now().to_rfc3339()),
        ..Default::default()
    };

    let model = new_show.insert(&txn).await?;
    txn.commit().await?;

    Ok(model)
}
