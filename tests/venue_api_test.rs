use axum::body::Body;
use axum::http::{Request, StatusCode};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use serde_json::{json, Value};
use tower::ServiceExt; // for oneshot

use showbill::{api, db, models};

// Helper to create a test database
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

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn venue_payload(name: &str, city: &str, state: &str) -> Value {
    json!({
        "name": name,
        "city": city,
        "state": state,
        "address": "1015 Folsom Street",
        "phone": "123-123-1234",
        "genres": ["Jazz"],
        "image_link": "https://example.com/venue.jpg",
        "seeking_talent": false
    })
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

async fn create_test_artist(db: &DatabaseConnection, name: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let artist = models::artist::ActiveModel {
        name: Set(name.to_string()),
        city: Set("San Francisco".to_string()),
        state: Set("CA".to_string()),
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

#[tokio::test]
async fn test_grouped_listing_covers_every_venue_and_splits_on_state() {
    let db = setup_test_db().await;
    let app = api::api_router(db);

    for (name, city, state) in [
        ("Venue One", "Springfield", "IL"),
        ("Venue Two", "Springfield", "MO"),
        ("Venue Three", "Springfield", "IL"),
    ] {
        let response = app
            .clone()
            .oneshot(post_json("/venues/create", venue_payload(name, city, state)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.oneshot(get("/venues")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let areas = body["areas"].as_array().unwrap();
    // Same city, different state must not merge
    assert_eq!(areas.len(), 2);

    // First-seen order of distinct (city, state) pairs
    assert_eq!(areas[0]["state"], "IL");
    assert_eq!(areas[1]["state"], "MO");
    assert_eq!(areas[0]["venues"].as_array().unwrap().len(), 2);
    assert_eq!(areas[1]["venues"].as_array().unwrap().len(), 1);

    // Every venue appears exactly once across groups
    let mut ids: Vec<i64> = areas
        .iter()
        .flat_map(|a| a["venues"].as_array().unwrap())
        .map(|v| v["id"].as_i64().unwrap())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let db = setup_test_db().await;
    let app = api::api_router(db);

    let response = app
        .clone()
        .oneshot(post_json(
            "/venues/create",
            venue_payload("The Musical Hop", "San Francisco", "CA"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let lower = body_json(
        app.clone()
            .oneshot(post_json("/venues/search", json!({ "search_term": "hop" })))
            .await
            .unwrap(),
    )
    .await;
    let upper = body_json(
        app.oneshot(post_json("/venues/search", json!({ "search_term": "Hop" })))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(lower["results"]["count"], 1);
    assert_eq!(lower["results"]["data"], upper["results"]["data"]);
    assert_eq!(
        lower["results"]["data"][0]["name"].as_str().unwrap(),
        "The Musical Hop"
    );
}

#[tokio::test]
async fn test_create_venue_missing_name_writes_nothing() {
    let db = setup_test_db().await;
    let app = api::api_router(db.clone());

    let response = app
        .oneshot(post_json(
            "/venues/create",
            json!({
                "city": "San Francisco",
                "state": "CA",
                "address": "1015 Folsom Street"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["errors"]["name"].is_array());
    // Submitted values are echoed back for redisplay
    assert_eq!(body["form"]["city"], "San Francisco");

    let count = models::venue::Entity::find().count(&db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_genres_round_trip_in_order() {
    let db = setup_test_db().await;
    let app = api::api_router(db);

    let mut payload = venue_payload("The Musical Hop", "San Francisco", "CA");
    payload["genres"] = json!(["Jazz", "Rock n Roll"]);

    let response = app
        .clone()
        .oneshot(post_json("/venues/create", payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let id = body["venue"]["id"].as_i64().unwrap();

    let response = app.oneshot(get(&format!("/venues/{}", id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["venue"]["genres"], json!(["Jazz", "Rock n Roll"]));
}

#[tokio::test]
async fn test_delete_venue_without_shows_succeeds() {
    let db = setup_test_db().await;
    let app = api::api_router(db);

    let body = body_json(
        app.clone()
            .oneshot(post_json(
                "/venues/create",
                venue_payload("Closing Soon", "Oakland", "CA"),
            ))
            .await
            .unwrap(),
    )
    .await;
    let id = body["venue"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(delete(&format!("/venues/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(app.oneshot(get("/venues")).await.unwrap()).await;
    assert_eq!(body["areas"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_delete_venue_with_dependent_show_is_blocked() {
    let db = setup_test_db().await;
    let app = api::api_router(db.clone());

    let body = body_json(
        app.clone()
            .oneshot(post_json(
                "/venues/create",
                venue_payload("The Musical Hop", "San Francisco", "CA"),
            ))
            .await
            .unwrap(),
    )
    .await;
    let venue_id = body["venue"]["id"].as_i64().unwrap() as i32;

    let artist_id = create_test_artist(&db, "Guns N Petals").await;
    create_test_show(&db, artist_id, venue_id, "2035-04-01T20:00:00+00:00").await;

    let response = app
        .clone()
        .oneshot(delete(&format!("/venues/{}", venue_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Venue is still listed
    let count = models::venue::Entity::find().count(&db).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_missing_venue_detail_is_404() {
    let db = setup_test_db().await;
    let app = api::api_router(db);

    let response = app.oneshot(get("/venues/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_form_is_populated_from_the_record() {
    let db = setup_test_db().await;
    let app = api::api_router(db);

    let body = body_json(
        app.clone()
            .oneshot(post_json(
                "/venues/create",
                venue_payload("The Musical Hop", "San Francisco", "CA"),
            ))
            .await
            .unwrap(),
    )
    .await;
    let id = body["venue"]["id"].as_i64().unwrap();

    let response = app
        .oneshot(get(&format!("/venues/{}/edit", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["form"]["name"], "The Musical Hop");
    assert_eq!(body["form"]["genres"], json!(["Jazz"]));
}

#[tokio::test]
async fn test_edit_replaces_all_mutable_fields() {
    let db = setup_test_db().await;
    let app = api::api_router(db);

    let body = body_json(
        app.clone()
            .oneshot(post_json(
                "/venues/create",
                venue_payload("The Musical Hop", "San Francisco", "CA"),
            ))
            .await
            .unwrap(),
    )
    .await;
    let id = body["venue"]["id"].as_i64().unwrap();

    let mut updated = venue_payload("The Acoustic Hop", "Oakland", "CA");
    updated["genres"] = json!(["Folk"]);
    updated["phone"] = Value::Null;

    let response = app
        .clone()
        .oneshot(post_json(&format!("/venues/{}/edit", id), updated))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(app.oneshot(get(&format!("/venues/{}", id))).await.unwrap()).await;
    assert_eq!(body["venue"]["name"], "The Acoustic Hop");
    assert_eq!(body["venue"]["city"], "Oakland");
    assert_eq!(body["venue"]["genres"], json!(["Folk"]));
    assert!(body["venue"]["phone"].is_null());
}

#[tokio::test]
async fn test_invalid_edit_does_not_touch_the_record() {
    let db = setup_test_db().await;
    let app = api::api_router(db);

    let body = body_json(
        app.clone()
            .oneshot(post_json(
                "/venues/create",
                venue_payload("The Musical Hop", "San Francisco", "CA"),
            ))
            .await
            .unwrap(),
    )
    .await;
    let id = body["venue"]["id"].as_i64().unwrap();

    let mut bad = venue_payload("", "San Francisco", "CA");
    bad["name"] = json!("");

    let response = app
        .clone()
        .oneshot(post_json(&format!("/venues/{}/edit", id), bad))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(app.oneshot(get(&format!("/venues/{}", id))).await.unwrap()).await;
    assert_eq!(body["venue"]["name"], "The Musical Hop");
}
