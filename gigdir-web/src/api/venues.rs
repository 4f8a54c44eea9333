//! Venue endpoints
//!
//! Submissions arrive as urlencoded bodies; repeated `genres` keys
//! accumulate into one list.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use gigdir_common::db::venues::{create_venue, delete_venue, get_venue, update_venue};
use gigdir_common::db::{DeletedEntity, Venue};
use gigdir_common::forms::{SearchForm, Submission, VenueForm};
use gigdir_common::queries::{
    advanced_search_venues, search_venues, venue_detail, venues_by_area, SearchResults,
    VenueArea, VenueDetail,
};
use gigdir_common::time;

use super::delete::DeleteOutcome;
use super::error::ApiResult;
use super::SearchTerm;
use crate::AppState;

/// GET /venues
pub async fn list_venues(State(state): State<AppState>) -> ApiResult<Json<Vec<VenueArea>>> {
    let now = time::now();
    Ok(Json(venues_by_area(&state.db, &now).await?))
}

/// POST /venues/search
pub async fn search(
    State(state): State<AppState>,
    Form(form): Form<SearchTerm>,
) -> ApiResult<Json<SearchResults>> {
    let now = time::now();
    Ok(Json(search_venues(&state.db, &form.search_term, &now).await?))
}

/// GET /venues/search/advanced?name=&city=&state=
pub async fn advanced_search(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<SearchResults>> {
    let criteria = SearchForm::validate(&pairs.into_iter().collect())?;
    let now = time::now();
    Ok(Json(advanced_search_venues(&state.db, &criteria, &now).await?))
}

/// GET /venues/:id
pub async fn show_venue(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<VenueDetail>> {
    let now = time::now();
    Ok(Json(venue_detail(&state.db, id, &now).await?))
}

/// GET /venues/:id/edit
///
/// Stored attributes used to pre-fill the edit form.
pub async fn edit_venue_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Venue>> {
    Ok(Json(get_venue(&state.db, id).await?))
}

/// POST /venues/create
pub async fn create_venue_submission(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> ApiResult<(StatusCode, Json<Venue>)> {
    let submission: Submission = pairs.into_iter().collect();
    let new = VenueForm::validate_create(&submission)?;
    let venue = create_venue(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(venue)))
}

/// POST /venues/:id/edit
pub async fn edit_venue_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> ApiResult<Json<Venue>> {
    let submission: Submission = pairs.into_iter().collect();
    let patch = VenueForm::validate_update(&submission)?;
    Ok(Json(update_venue(&state.db, id, patch).await?))
}

/// POST /venues/:id/delete
pub async fn delete_venue_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedEntity>> {
    Ok(Json(delete_venue(&state.db, id).await?))
}

/// DELETE /venues/:id
pub async fn delete_venue_outcome(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> DeleteOutcome {
    DeleteOutcome::from_result(id, delete_venue(&state.db, id).await)
}

pub fn venue_routes() -> Router<AppState> {
    Router::new()
        .route("/venues", get(list_venues))
        .route("/venues/search", post(search))
        .route("/venues/search/advanced", get(advanced_search))
        .route("/venues/create", post(create_venue_submission))
        .route("/venues/:id", get(show_venue).delete(delete_venue_outcome))
        .route(
            "/venues/:id/edit",
            get(edit_venue_form).post(edit_venue_submission),
        )
        .route("/venues/:id/delete", post(delete_venue_submission))
}
