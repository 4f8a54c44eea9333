//! Artist endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use gigdir_common::db::artists::{create_artist, delete_artist, get_artist, update_artist};
use gigdir_common::db::{Artist, DeletedEntity};
use gigdir_common::forms::{ArtistForm, SearchForm, Submission};
use gigdir_common::queries::{
    advanced_search_artists, artist_detail, list_artists, search_artists, ArtistDetail,
    ArtistEntry, SearchResults,
};
use gigdir_common::time;

use super::delete::DeleteOutcome;
use super::error::ApiResult;
use super::SearchTerm;
use crate::AppState;

/// GET /artists
pub async fn artists(State(state): State<AppState>) -> ApiResult<Json<Vec<ArtistEntry>>> {
    Ok(Json(list_artists(&state.db).await?))
}

/// POST /artists/search
pub async fn search(
    State(state): State<AppState>,
    Form(form): Form<SearchTerm>,
) -> ApiResult<Json<SearchResults>> {
    let now = time::now();
    Ok(Json(search_artists(&state.db, &form.search_term, &now).await?))
}

/// GET /artists/search/advanced?name=&city=&state=
pub async fn advanced_search(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<SearchResults>> {
    let criteria = SearchForm::validate(&pairs.into_iter().collect())?;
    let now = time::now();
    Ok(Json(advanced_search_artists(&state.db, &criteria, &now).await?))
}

/// GET /artists/:id
pub async fn show_artist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ArtistDetail>> {
    let now = time::now();
    Ok(Json(artist_detail(&state.db, id, &now).await?))
}

/// GET /artists/:id/edit
pub async fn edit_artist_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Artist>> {
    Ok(Json(get_artist(&state.db, id).await?))
}

/// POST /artists/create
pub async fn create_artist_submission(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> ApiResult<(StatusCode, Json<Artist>)> {
    let submission: Submission = pairs.into_iter().collect();
    let new = ArtistForm::validate_create(&submission)?;
    let artist = create_artist(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(artist)))
}

/// POST /artists/:id/edit
///
/// Only the submitted fields change; an absent `seeking_venue` keeps its
/// stored value.
pub async fn edit_artist_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> ApiResult<Json<Artist>> {
    let submission: Submission = pairs.into_iter().collect();
    let patch = ArtistForm::validate_update(&submission)?;
    Ok(Json(update_artist(&state.db, id, patch).await?))
}

/// POST /artists/:id/delete
pub async fn delete_artist_submission(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeletedEntity>> {
    Ok(Json(delete_artist(&state.db, id).await?))
}

/// DELETE /artists/:id
pub async fn delete_artist_outcome(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> DeleteOutcome {
    DeleteOutcome::from_result(id, delete_artist(&state.db, id).await)
}

pub fn artist_routes() -> Router<AppState> {
    Router::new()
        .route("/artists", get(artists))
        .route("/artists/search", post(search))
        .route("/artists/search/advanced", get(advanced_search))
        .route("/artists/create", post(create_artist_submission))
        .route("/artists/:id", get(show_artist).delete(delete_artist_outcome))
        .route(
            "/artists/:id/edit",
            get(edit_artist_form).post(edit_artist_submission),
        )
        .route("/artists/:id/delete", post(delete_artist_submission))
}
