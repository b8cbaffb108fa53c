//! Demo data: the sample venues, artists, and shows a fresh instance needs
//! for the directory pages to render something meaningful.

use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set};

use crate::models::{artist, show, venue};

pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Idempotent: skip when venues already exist
    let existing = venue::Entity::find().count(db).await?;
    if existing > 0 {
        tracing::info!("Demo data already present, skipping seed");
        return Ok(());
    }

    let now = Utc::now().to_rfc3339();

    let venues = vec![
        venue::ActiveModel {
            name: Set("The Musical Hop".to_owned()),
            city: Set("San Francisco".to_owned()),
            state: Set("CA".to_owned()),
            address: Set("1015 Folsom Street".to_owned()),
            phone: Set(Some("123-123-1234".to_owned())),
            genres: Set(Some(r#"["Jazz","Reggae","Classical","Folk"]"#.to_owned())),
            image_link: Set(Some(
                "https://images.unsplash.com/photo-1543900694-133f37abaaa5".to_owned(),
            )),
            facebook_link: Set(Some("https://www.facebook.com/TheMusicalHop".to_owned())),
            website_link: Set(Some("https://www.themusicalhop.com".to_owned())),
            seeking_talent: Set(true),
            seeking_description: Set(Some(
                "We are on the lookout for a local artist to play every two weeks.".to_owned(),
            )),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        },
        venue::ActiveModel {
            name: Set("The Dueling Pianos Bar".to_owned()),
            city: Set("New York".to_owned()),
            state: Set("NY".to_owned()),
            address: Set("335 Delancey Street".to_owned()),
            phone: Set(Some("914-003-1132".to_owned())),
            genres: Set(Some(r#"["Classical","R&B","Hip-Hop"]"#.to_owned())),
            image_link: Set(Some(
                "https://images.unsplash.com/photo-1497032205916-ac775f0649ae".to_owned(),
            )),
            facebook_link: Set(Some(
                "https://www.facebook.com/theduelingpianos".to_owned(),
            )),
            website_link: Set(Some("https://www.theduelingpianos.com".to_owned())),
            seeking_talent: Set(false),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        },
        venue::ActiveModel {
            name: Set("Park Square Live Music & Coffee".to_owned()),
            city: Set("San Francisco".to_owned()),
            state: Set("CA".to_owned()),
            address: Set("34 Whiskey Moore Ave".to_owned()),
            phone: Set(Some("415-000-1234".to_owned())),
            genres: Set(Some(r#"["Rock n Roll","Jazz","Classical","Folk"]"#.to_owned())),
            image_link: Set(Some(
                "https://images.unsplash.com/photo-1485686531765-ba63b07845a7".to_owned(),
            )),
            facebook_link: Set(Some(
                "https://www.facebook.com/ParkSquareLiveMusicAndCoffee".to_owned(),
            )),
            website_link: Set(Some("https://www.parksquarelivemusicandcoffee.com".to_owned())),
            seeking_talent: Set(false),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        },
    ];

    for v in venues {
        venue::Entity::insert(v).exec(db).await?;
    }

    let artists = vec![
        artist::ActiveModel {
            name: Set("Guns N Petals".to_owned()),
            city: Set("San Francisco".to_owned()),
            state: Set("CA".to_owned()),
            phone: Set(Some("326-123-5000".to_owned())),
            genres: Set(Some(r#"["Rock n Roll"]"#.to_owned())),
            image_link: Set(Some(
                "https://images.unsplash.com/photo-1549213783-8284d0336c4f".to_owned(),
            )),
            facebook_link: Set(Some("https://www.facebook.com/GunsNPetals".to_owned())),
            website_link: Set(Some("https://www.gunsnpetalsband.com".to_owned())),
            seeking_venue: Set(true),
            seeking_description: Set(Some(
                "Looking for shows to perform at in the San Francisco Bay Area!".to_owned(),
            )),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        },
        artist::ActiveModel {
            name: Set("Matt Quevedo".to_owned()),
            city: Set("New York".to_owned()),
            state: Set("NY".to_owned()),
            phone: Set(Some("300-400-5000".to_owned())),
            genres: Set(Some(r#"["Jazz"]"#.to_owned())),
            image_link: Set(Some(
                "https://images.unsplash.com/photo-1495223153807-b916f75de8c5".to_owned(),
            )),
            facebook_link: Set(Some("https://www.facebook.com/mattquevedo923251523".to_owned())),
            seeking_venue: Set(false),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        },
        artist::ActiveModel {
            name: Set("The Wild Sax Band".to_owned()),
            city: Set("San Francisco".to_owned()),
            state: Set("CA".to_owned()),
            phone: Set(Some("432-325-5432".to_owned())),
            genres: Set(Some(r#"["Jazz","Classical"]"#.to_owned())),
            image_link: Set(Some(
                "https://images.unsplash.com/photo-1558369981-f9ca78462e61".to_owned(),
            )),
            seeking_venue: Set(false),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        },
    ];

    for a in artists {
        artist::Entity::insert(a).exec(db).await?;
    }

    let hop = venue_id_by_name(db, "The Musical Hop").await?;
    let park = venue_id_by_name(db, "Park Square Live Music & Coffee").await?;
    let petals = artist_id_by_name(db, "Guns N Petals").await?;
    let quevedo = artist_id_by_name(db, "Matt Quevedo").await?;
    let sax = artist_id_by_name(db, "The Wild Sax Band").await?;

    let shows = vec![
        (petals, hop, "2019-05-21T21:30:00+00:00"),
        (quevedo, park, "2019-06-15T23:00:00+00:00"),
        (sax, park, "2035-04-01T20:00:00+00:00"),
        (sax, park, "2035-04-08T20:00:00+00:00"),
        (sax, park, "2035-04-15T20:00:00+00:00"),
    ];

    for (artist_id, venue_id, start_time) in shows {
        let s = show::ActiveModel {
            artist_id: Set(artist_id),
            venue_id: Set(venue_id),
            start_time: Set(start_time.to_owned()),
            created_at: Set(now.clone()),
            ..Default::default()
        };
        show::Entity::insert(s).exec(db).await?;
    }

    Ok(())
}

async fn venue_id_by_name(db: &DatabaseConnection, name: &str) -> Result<i32, DbErr> {
    venue::Entity::find()
        .filter(venue::Column::Name.eq(name))
        .one(db)
        .await?
        .map(|v| v.id)
        .ok_or_else(|| DbErr::RecordNotFound(name.to_owned()))
}

async fn artist_id_by_name(db: &DatabaseConnection, name: &str) -> Result<i32, DbErr> {
    artist::Entity::find()
        .filter(artist::Column::Name.eq(name))
        .one(db)
        .await?
        .map(|a| a.id)
        .ok_or_else(|| DbErr::RecordNotFound(name.to_owned()))
}
