//! Integration tests for gigdir-web API endpoints
//!
//! Each test builds the router over a fresh in-memory database and drives
//! it with `oneshot`.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use gigdir_common::db::{init_database, init_memory_database};
use gigdir_web::{build_router, AppState};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method

const MUSICAL_HOP: &str = "name=The+Musical+Hop&city=San+Francisco&state=CA\
    &address=1015+Folsom+Street&phone=123-123-1234\
    &image_link=https%3A%2F%2Fimages.example.com%2Fmusical-hop.jpg\
    &genres=Jazz&genres=Reggae&genres=Folk\
    &website=https%3A%2F%2Fwww.themusicalhop.com&seeking_talent=y\
    &seeking_description=We+are+on+the+lookout+for+a+local+artist";

const DUELING_PIANOS: &str = "name=The+Dueling+Pianos+Bar&city=New+York&state=NY\
    &address=335+Delancey+Street&phone=914-003-1132&genres=Classical&genres=R%26B";

const PARK_SQUARE: &str = "name=Park+Square+Live+Music+%26+Coffee&city=San+Francisco\
    &state=CA&address=34+Whiskey+Moore+Ave&phone=415-000-1234&genres=Rock+n+Roll";

const GUNS_N_PETALS: &str = "name=Guns+N+Petals&city=San+Francisco&state=CA\
    &phone=326-123-5000&genres=Rock+n+Roll&seeking_venue=y";

/// Test helper: router over an empty in-memory database
async fn setup_app() -> Router {
    let db = init_memory_database()
        .await
        .expect("Should create in-memory database");
    build_router(AppState::new(db))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: send a request, return status and JSON body
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Should parse JSON")
    };
    (status, body)
}

async fn create(app: &Router, uri: &str, form: &str) -> i64 {
    let (status, body) = send(app, post_form(uri, form)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["id"].as_i64().expect("created entity has an id")
}

// =============================================================================
// Health and choices
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "gigdir-web");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_choice_lists() {
    let app = setup_app().await;

    let (status, states) = send(&app, get("/api/choices/states?blank=true")).await;
    assert_eq!(status, StatusCode::OK);
    let states = states.as_array().unwrap();
    assert_eq!(states.len(), 52);
    assert_eq!(states[0]["value"], "");
    assert_eq!(states[1]["value"], "AL");

    let (_, genres) = send(&app, get("/api/choices/genres")).await;
    let genres = genres.as_array().unwrap();
    assert_eq!(genres.len(), 19);
    assert_eq!(genres[0]["label"], "Alternative");
}

// =============================================================================
// Venues
// =============================================================================

#[tokio::test]
async fn test_venue_create_read_edit() {
    let app = setup_app().await;
    let id = create(&app, "/venues/create", MUSICAL_HOP).await;

    let (status, venue) = send(&app, get(&format!("/venues/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(venue["name"], "The Musical Hop");
    assert_eq!(venue["state"], "CA");
    assert_eq!(venue["genres"], serde_json::json!(["Jazz", "Reggae", "Folk"]));
    assert_eq!(venue["seeking_talent"], true);
    assert_eq!(venue["facebook_link"], Value::Null);
    assert_eq!(venue["past_shows_count"], 0);
    assert_eq!(venue["upcoming_shows"], serde_json::json!([]));

    // Patch only the phone; everything else stays
    let (status, updated) = send(
        &app,
        post_form(&format!("/venues/{id}/edit"), "phone=(415)+555-0100"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["phone"], "(415) 555-0100");
    assert_eq!(updated["seeking_talent"], true);
    assert_eq!(updated["website"], "https://www.themusicalhop.com");

    let (status, form) = send(&app, get(&format!("/venues/{id}/edit"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["phone"], "(415) 555-0100");
    assert_eq!(form["address"], "1015 Folsom Street");
}

#[tokio::test]
async fn test_venue_validation_errors() {
    let app = setup_app().await;

    let (status, body) = send(
        &app,
        post_form(
            "/venues/create",
            "name=Nowhere&city=Reno&state=ZZ&address=1+Main&phone=555&genres=Polka",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION");
    let fields = &body["error"]["fields"];
    assert_eq!(fields["state"][0], "Invalid state.");
    assert_eq!(fields["phone"][0], "Invalid phone number.");
    assert_eq!(fields["genres"][0], "Invalid genres.");
    assert!(fields.get("name").is_none());
    assert!(body["error"]["message"].as_str().unwrap().contains("Phone: Invalid phone number."));

    // Nothing was written
    let (_, areas) = send(&app, get("/venues")).await;
    assert_eq!(areas, serde_json::json!([]));
}

#[tokio::test]
async fn test_edit_rejects_bad_field_and_keeps_row() {
    let app = setup_app().await;
    let id = create(&app, "/venues/create", DUELING_PIANOS).await;

    let (status, body) = send(
        &app,
        post_form(&format!("/venues/{id}/edit"), "city=Brooklyn&website=not-a-url"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["fields"]["website"][0], "Invalid URL.");

    let (_, venue) = send(&app, get(&format!("/venues/{id}/edit"))).await;
    assert_eq!(venue["city"], "New York");
}

#[tokio::test]
async fn test_unknown_venue_is_404() {
    let app = setup_app().await;

    let (status, body) = send(&app, get("/venues/77")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = send(&app, post_form("/venues/77/edit", "city=Reno")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, post_form("/venues/77/delete", "")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_venues_grouped_by_area() {
    let app = setup_app().await;
    create(&app, "/venues/create", MUSICAL_HOP).await;
    create(&app, "/venues/create", DUELING_PIANOS).await;
    create(&app, "/venues/create", PARK_SQUARE).await;

    let (status, areas) = send(&app, get("/venues")).await;
    assert_eq!(status, StatusCode::OK);
    let areas = areas.as_array().unwrap();
    assert_eq!(areas.len(), 2);
    assert_eq!(areas[0]["city"], "New York");
    assert_eq!(areas[1]["city"], "San Francisco");
    assert_eq!(areas[1]["venues"].as_array().unwrap().len(), 2);
    assert_eq!(areas[1]["venues"][0]["name"], "Park Square Live Music & Coffee");
    assert_eq!(areas[1]["venues"][0]["num_upcoming_shows"], 0);
}

#[tokio::test]
async fn test_venue_search() {
    let app = setup_app().await;
    create(&app, "/venues/create", MUSICAL_HOP).await;
    create(&app, "/venues/create", DUELING_PIANOS).await;
    create(&app, "/venues/create", PARK_SQUARE).await;

    let (status, results) = send(&app, post_form("/venues/search", "search_term=Hop")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results["count"], 1);
    assert_eq!(results["data"][0]["name"], "The Musical Hop");

    let (_, results) = send(&app, post_form("/venues/search", "search_term=")).await;
    assert_eq!(results["count"], 3);

    let (status, results) = send(
        &app,
        get("/venues/search/advanced?name=the&city=san&state=CA"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results["count"], 1);

    let (_, results) = send(&app, get("/venues/search/advanced?state=")).await;
    assert_eq!(results["count"], 3);

    let (status, body) = send(&app, get("/venues/search/advanced?state=XX")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["fields"]["state"][0], "Invalid state.");
}

// =============================================================================
// Artists
// =============================================================================

#[tokio::test]
async fn test_artist_listing_and_edit() {
    let app = setup_app().await;
    let id = create(&app, "/artists/create", GUNS_N_PETALS).await;
    create(
        &app,
        "/artists/create",
        "name=Matt+Quevedo&city=New+York&state=NY&phone=300-400-5000&genres=Jazz",
    )
    .await;

    let (status, artists) = send(&app, get("/artists")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(artists[0]["name"], "Guns N Petals");
    assert_eq!(artists[1]["name"], "Matt Quevedo");

    // Absent checkbox leaves the stored value alone
    let (_, artist) = send(&app, post_form(&format!("/artists/{id}/edit"), "city=Oakland")).await;
    assert_eq!(artist["city"], "Oakland");
    assert_eq!(artist["seeking_venue"], true);

    let (_, results) = send(&app, post_form("/artists/search", "search_term=petals")).await;
    assert_eq!(results["count"], 1);
    assert_eq!(results["data"][0]["id"], id);
}

#[tokio::test]
async fn test_artist_missing_fields() {
    let app = setup_app().await;
    let (status, body) = send(&app, post_form("/artists/create", "name=+")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = &body["error"]["fields"];
    assert_eq!(fields["name"][0], "This field is required.");
    assert_eq!(fields["city"][0], "This field is required.");
    assert_eq!(fields["genres"][0], "This field is required.");
    assert_eq!(fields["phone"][0], "Invalid phone number.");
}

// =============================================================================
// Shows and cascade delete
// =============================================================================

#[tokio::test]
async fn test_show_scheduling() {
    let app = setup_app().await;
    let venue = create(&app, "/venues/create", PARK_SQUARE).await;
    let artist = create(&app, "/artists/create", GUNS_N_PETALS).await;

    let (_, choices) = send(&app, get("/shows/create")).await;
    assert_eq!(choices["venues"][0]["value"], "");
    assert_eq!(choices["venues"][1]["value"], venue.to_string());
    assert_eq!(choices["artists"][1]["label"], "Guns N Petals");

    let (status, body) = send(
        &app,
        post_form(
            "/shows/create",
            &format!("artist_id={artist}&venue_id=999&start_time=2035-04-01+20%3A00%3A00"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["fields"]["venue_id"][0], "Not a valid choice.");
    assert!(body["error"]["fields"].get("artist_id").is_none());

    let show = create(
        &app,
        "/shows/create",
        &format!("artist_id={artist}&venue_id={venue}&start_time=2035-04-01T20%3A00%3A00Z"),
    )
    .await;
    create(
        &app,
        "/shows/create",
        &format!("artist_id={artist}&venue_id={venue}&start_time=2019-05-21T21%3A30%3A00Z"),
    )
    .await;

    let (status, body) = send(&app, get(&format!("/shows/{show}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["venue_id"], venue);
    assert_eq!(body["start_time"], "2035-04-01T20:00:00Z");

    let (_, shows) = send(&app, get("/shows")).await;
    assert_eq!(shows.as_array().unwrap().len(), 2);
    assert_eq!(shows[0]["start_time"], "2019-05-21T21:30:00Z");
    assert_eq!(shows[0]["venue_name"], "Park Square Live Music & Coffee");

    let (_, detail) = send(&app, get(&format!("/artists/{artist}"))).await;
    assert_eq!(detail["past_shows_count"], 1);
    assert_eq!(detail["upcoming_shows_count"], 1);
    assert_eq!(detail["upcoming_shows"][0]["venue_id"], venue);

    let (_, areas) = send(&app, get("/venues")).await;
    assert_eq!(areas[0]["venues"][0]["num_upcoming_shows"], 1);
}

#[tokio::test]
async fn test_show_form_errors() {
    let app = setup_app().await;
    let (status, body) = send(
        &app,
        post_form("/shows/create", "artist_id=abc&start_time=next+tuesday"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = &body["error"]["fields"];
    assert_eq!(fields["artist_id"][0], "Not a valid choice.");
    assert_eq!(fields["venue_id"][0], "This field is required.");
    assert_eq!(fields["start_time"][0], "Not a valid datetime value.");

    let (status, _) = send(&app, get("/shows/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_cascades_and_reports_outcome() {
    let app = setup_app().await;
    let venue = create(&app, "/venues/create", MUSICAL_HOP).await;
    let artist = create(&app, "/artists/create", GUNS_N_PETALS).await;
    let show = create(
        &app,
        "/shows/create",
        &format!("artist_id={artist}&venue_id={venue}&start_time=2035-04-01+20%3A00"),
    )
    .await;

    let (status, body) = send(&app, delete(&format!("/venues/{venue}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "deleted");
    assert_eq!(body["id"], venue);
    assert_eq!(body["name"], "The Musical Hop");

    let (status, _) = send(&app, get(&format!("/shows/{show}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, delete(&format!("/venues/{venue}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "not_found");
    assert!(body.get("name").is_none());

    // Artist survives the venue; delete it through the form route
    let (status, body) = send(&app, post_form(&format!("/artists/{artist}/delete"), "")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Guns N Petals");
    assert_eq!(body["shows_removed"], 0);
}

#[tokio::test]
async fn test_file_backed_database() {
    let dir = tempfile::tempdir().unwrap();
    let db = init_database(&dir.path().join("gigdir.db")).await.unwrap();
    let app = build_router(AppState::new(db.clone()));

    let id = create(&app, "/venues/create", DUELING_PIANOS).await;
    let (status, venue) = send(&app, get(&format!("/venues/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(venue["genres"], serde_json::json!(["Classical", "R&B"]));

    db.close().await;
}

#[tokio::test]
async fn test_storage_failure_is_500_and_rolls_back() {
    let db = init_memory_database().await.unwrap();
    let app = build_router(AppState::new(db.clone()));
    let venue = create(&app, "/venues/create", MUSICAL_HOP).await;
    let artist = create(&app, "/artists/create", GUNS_N_PETALS).await;
    let show = create(
        &app,
        "/shows/create",
        &format!("artist_id={artist}&venue_id={venue}&start_time=2035-04-01T20%3A00%3A00Z"),
    )
    .await;

    for trigger in [
        "CREATE TRIGGER reject_venue_update BEFORE UPDATE ON venues \
         BEGIN SELECT RAISE(ABORT, 'storage failure'); END",
        "CREATE TRIGGER reject_show_delete AFTER DELETE ON shows \
         BEGIN SELECT RAISE(ABORT, 'storage failure'); END",
    ] {
        sqlx::query(trigger).execute(&db).await.unwrap();
    }

    let (status, body) = send(
        &app,
        post_form(&format!("/venues/{venue}/edit"), "city=Oakland"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    let message = body["error"]["message"].as_str().unwrap();
    assert!(!message.contains("storage failure"), "leaked: {message}");

    let (_, stored) = send(&app, get(&format!("/venues/{venue}/edit"))).await;
    assert_eq!(stored["city"], "San Francisco");

    let (status, body) = send(&app, delete(&format!("/venues/{venue}"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["id"], venue);

    let (status, _) = send(&app, get(&format!("/venues/{venue}"))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, get(&format!("/shows/{show}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["venue_id"], venue);
}
