use axum::body::Body;
use axum::http::{Request, StatusCode};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

use showbill::{api, db, models, seed};

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_test_venue(db: &DatabaseConnection, name: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let venue = models::venue::ActiveModel {
        name: Set(name.to_string()),
        city: Set("San Francisco".to_string()),
        state: Set("CA".to_string()),
        address: Set("1015 Folsom Street".to_string()),
        seeking_talent: Set(false),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = models::venue::Entity::insert(venue)
        .exec(db)
        .await
        .expect("Failed to create venue");
    res.last_insert_id
}

async fn create_test_artist(db: &DatabaseConnection, name: &str, image_link: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let artist = models::artist::ActiveModel {
        name: Set(name.to_string()),
        city: Set("San Francisco".to_string()),
        state: Set("CA".to_string()),
        image_link: Set(Some(image_link.to_string())),
        seeking_venue: Set(false),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = models::artist::Entity::insert(artist)
        .exec(db)
        .await
        .expect("Failed to create artist");
    res.last_insert_id
}

async fn create_test_show(db: &DatabaseConnection, artist_id: i32, venue_id: i32, start_time: &str) {
    let now = chrono::Utc::now().to_rfc3339();
    let show = models::show::ActiveModel {
        artist_id: Set(artist_id),
        venue_id: Set(venue_id),
        start_time: Set(start_time.to_string()),
        created_at: Set(now),
        ..Default::default()
    };
    models::show::Entity::insert(show)
        .exec(db)
        .await
        .expect("Failed to create show");
}

#[tokio::test]
async fn test_detail_views_partition_shows_around_now() {
    let db = setup_test_db().await;

    let venue_id = create_test_venue(&db, "Park Square Live Music & Coffee").await;
    let artist_id = create_test_artist(&db, "The Wild Sax Band", "https://example.com/sax.jpg").await;

    // One show well in the past, one well in the future
    create_test_show(&db, artist_id, venue_id, "2019-06-15T23:00:00+00:00").await;
    create_test_show(&db, artist_id, venue_id, "2035-04-01T20:00:00+00:00").await;

    let app = api::api_router(db);

    let body = body_json(
        app.clone()
            .oneshot(get(&format!("/venues/{}", venue_id)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["venue"]["past_shows_count"], 1);
    assert_eq!(body["venue"]["upcoming_shows_count"], 1);
    assert_eq!(
        body["venue"]["past_shows"][0]["start_time"],
        "2019-06-15T23:00:00+00:00"
    );
    assert_eq!(
        body["venue"]["upcoming_shows"][0]["start_time"],
        "2035-04-01T20:00:00+00:00"
    );
    assert_eq!(
        body["venue"]["past_shows"][0]["artist_name"],
        "The Wild Sax Band"
    );

    // The artist detail mirrors the partition with the venue attached
    let body = body_json(
        app.oneshot(get(&format!("/artists/{}", artist_id)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["artist"]["past_shows_count"], 1);
    assert_eq!(body["artist"]["upcoming_shows_count"], 1);
    assert_eq!(
        body["artist"]["upcoming_shows"][0]["venue_name"],
        "Park Square Live Music & Coffee"
    );
}

#[tokio::test]
async fn test_global_shows_listing_joins_venue_and_artist() {
    let db = setup_test_db().await;

    let venue_id = create_test_venue(&db, "The Musical Hop").await;
    let artist_id = create_test_artist(&db, "Guns N Petals", "https://example.com/gnp.jpg").await;
    create_test_show(&db, artist_id, venue_id, "2019-05-21T21:30:00+00:00").await;
    create_test_show(&db, artist_id, venue_id, "2035-05-21T21:30:00+00:00").await;

    let app = api::api_router(db);
    let body = body_json(app.oneshot(get("/shows")).await.unwrap()).await;

    // Past and future shows are both listed, no time filtering
    let shows = body["shows"].as_array().unwrap();
    assert_eq!(shows.len(), 2);
    assert_eq!(shows[0]["venue_name"], "The Musical Hop");
    assert_eq!(shows[0]["artist_name"], "Guns N Petals");
    assert_eq!(shows[0]["artist_image_link"], "https://example.com/gnp.jpg");
    assert_eq!(shows[0]["start_time"], "2019-05-21T21:30:00+00:00");
}

#[tokio::test]
async fn test_create_show_rejects_unknown_references() {
    let db = setup_test_db().await;
    let venue_id = create_test_venue(&db, "The Musical Hop").await;

    let app = api::api_router(db.clone());
    let response = app
        .oneshot(post_json(
            "/shows/create",
            json!({
                "artist_id": 999,
                "venue_id": venue_id,
                "start_time": "2035-05-21T21:30:00+00:00"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["errors"]["artist_id"].is_array());

    let count = models::show::Entity::find().count(&db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_create_show_requires_parseable_start_time() {
    let db = setup_test_db().await;
    let venue_id = create_test_venue(&db, "The Musical Hop").await;
    let artist_id = create_test_artist(&db, "Guns N Petals", "https://example.com/gnp.jpg").await;

    let app = api::api_router(db.clone());
    let response = app
        .oneshot(post_json(
            "/shows/create",
            json!({
                "artist_id": artist_id,
                "venue_id": venue_id,
                "start_time": "next friday"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let count = models::show::Entity::find().count(&db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_create_show_success_lists_it() {
    let db = setup_test_db().await;
    let venue_id = create_test_venue(&db, "The Musical Hop").await;
    let artist_id = create_test_artist(&db, "Guns N Petals", "https://example.com/gnp.jpg").await;

    let app = api::api_router(db);
    let response = app
        .clone()
        .oneshot(post_json(
            "/shows/create",
            json!({
                "artist_id": artist_id,
                "venue_id": venue_id,
                "start_time": "2035-05-21T21:30:00-05:00"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Show was successfully listed!");
    // Stored normalized to UTC
    assert_eq!(body["show"]["start_time"], "2035-05-22T02:30:00+00:00");

    let body = body_json(app.oneshot(get("/shows")).await.unwrap()).await;
    assert_eq!(body["shows"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_counts_only_upcoming_shows() {
    let db = setup_test_db().await;

    let venue_id = create_test_venue(&db, "Park Square Live Music & Coffee").await;
    let artist_id = create_test_artist(&db, "The Wild Sax Band", "https://example.com/sax.jpg").await;
    create_test_show(&db, artist_id, venue_id, "2019-06-15T23:00:00+00:00").await;
    create_test_show(&db, artist_id, venue_id, "2035-04-01T20:00:00+00:00").await;
    create_test_show(&db, artist_id, venue_id, "2035-04-08T20:00:00+00:00").await;

    let app = api::api_router(db);

    let body = body_json(
        app.clone()
            .oneshot(post_json("/venues/search", json!({ "search_term": "park" })))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["results"]["count"], 1);
    assert_eq!(body["results"]["data"][0]["num_upcoming_shows"], 2);

    let body = body_json(
        app.oneshot(post_json("/artists/search", json!({ "search_term": "SAX" })))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["results"]["count"], 1);
    assert_eq!(body["results"]["data"][0]["num_upcoming_shows"], 2);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let db = setup_test_db().await;
    let app = api::api_router(db);

    let response = app.oneshot(get("/nowhere")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seed_populates_directory_and_is_idempotent() {
    let db = setup_test_db().await;

    seed::seed_demo_data(&db).await.expect("Seed failed");
    seed::seed_demo_data(&db).await.expect("Second seed failed");

    let venues = models::venue::Entity::find().count(&db).await.unwrap();
    let artists = models::artist::Entity::find().count(&db).await.unwrap();
    let shows = models::show::Entity::find().count(&db).await.unwrap();
    assert_eq!(venues, 3);
    assert_eq!(artists, 3);
    assert_eq!(shows, 5);

    let app = api::api_router(db);
    let body = body_json(app.oneshot(get("/venues")).await.unwrap()).await;
    // San Francisco and New York groups
    assert_eq!(body["areas"].as_array().unwrap().len(), 2);
}
