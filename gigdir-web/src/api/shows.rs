//! Show endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Form, Json, Router,
};
use gigdir_common::catalog::Choice;
use gigdir_common::db::shows::{create_show, get_show};
use gigdir_common::db::Show;
use gigdir_common::forms::{ShowForm, Submission};
use gigdir_common::queries::{artist_choices, list_shows, venue_choices, ShowListing};
use serde::Serialize;

use super::error::ApiResult;
use crate::AppState;

/// Pickers for the show form
#[derive(Debug, Serialize)]
pub struct ShowFormChoices {
    pub artists: Vec<Choice>,
    pub venues: Vec<Choice>,
}

/// GET /shows
pub async fn shows(State(state): State<AppState>) -> ApiResult<Json<Vec<ShowListing>>> {
    Ok(Json(list_shows(&state.db).await?))
}

/// GET /shows/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Show>> {
    Ok(Json(get_show(&state.db, id).await?))
}

/// GET /shows/create
pub async fn create_show_form(State(state): State<AppState>) -> ApiResult<Json<ShowFormChoices>> {
    Ok(Json(ShowFormChoices {
        artists: artist_choices(&state.db).await?,
        venues: venue_choices(&state.db).await?,
    }))
}

/// POST /shows/create
///
/// Unknown venue or artist ids come back as field errors, not a 500.
pub async fn create_show_submission(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> ApiResult<(StatusCode, Json<Show>)> {
    let submission: Submission = pairs.into_iter().collect();
    let new = ShowForm::validate(&submission)?;
    let show = create_show(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(show)))
}

pub fn show_routes() -> Router<AppState> {
    Router::new()
        .route("/shows", get(shows))
        .route(
            "/shows/create",
            get(create_show_form).post(create_show_submission),
        )
        .route("/shows/:id", get(show))
}
