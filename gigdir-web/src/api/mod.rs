//! HTTP API handlers for gigdir-web

pub mod artists;
pub mod choices;
pub mod delete;
pub mod error;
pub mod health;
pub mod shows;
pub mod venues;

use serde::Deserialize;

pub use artists::artist_routes;
pub use choices::choice_routes;
pub use error::{ApiError, ApiResult};
pub use health::health_routes;
pub use shows::show_routes;
pub use venues::venue_routes;

/// Body of the simple name search forms
#[derive(Debug, Default, Deserialize)]
pub struct SearchTerm {
    #[serde(default)]
    pub search_term: String,
}
