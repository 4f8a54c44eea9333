//! Catalog choice lists for building forms

use axum::{extract::Query, routing::get, Json, Router};
use gigdir_common::catalog::{Choice, Genre, UsState};
use serde::Deserialize;

use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ChoiceQuery {
    /// Prefix the list with a blank option
    #[serde(default)]
    pub blank: bool,
}

/// GET /api/choices/states
pub async fn state_choices(Query(query): Query<ChoiceQuery>) -> Json<Vec<Choice>> {
    Json(if query.blank {
        UsState::choices_first_blank()
    } else {
        UsState::choices()
    })
}

/// GET /api/choices/genres
pub async fn genre_choices(Query(query): Query<ChoiceQuery>) -> Json<Vec<Choice>> {
    Json(if query.blank {
        Genre::choices_first_blank()
    } else {
        Genre::choices()
    })
}

pub fn choice_routes() -> Router<AppState> {
    Router::new()
        .route("/api/choices/states", get(state_choices))
        .route("/api/choices/genres", get(genre_choices))
}
