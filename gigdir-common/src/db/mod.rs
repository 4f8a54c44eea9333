//! Storage layer: schema bootstrap, entity persistence and mutations
//!
//! Every function takes the storage handle explicitly. Mutations open one
//! transaction each; returning early with `?` drops the transaction, which
//! rolls it back, so no partial write is ever visible.

pub mod artists;
pub mod init;
pub mod models;
pub mod shows;
pub mod venues;

pub use init::*;
pub use models::*;

use serde::Serialize;

use crate::catalog::{Genre, UsState};
use crate::{Error, Result};

/// Outcome of a successful delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedEntity {
    pub id: i64,
    pub name: String,
    /// Shows removed by the cascade
    pub shows_removed: i64,
}

/// Storage encoding for a genre list: JSON array of labels
pub(crate) fn encode_genres(genres: &[Genre]) -> Result<String> {
    serde_json::to_string(genres).map_err(|e| Error::Internal(format!("encode genres: {e}")))
}

pub(crate) fn decode_genres(raw: &str) -> Result<Vec<Genre>> {
    serde_json::from_str(raw)
        .map_err(|e| Error::Internal(format!("stored genres are not a genre list ({raw}): {e}")))
}

pub(crate) fn decode_state(raw: &str) -> Result<UsState> {
    UsState::from_value(raw)
        .ok_or_else(|| Error::Internal(format!("stored state is not a state code: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_encoding_round_trip() {
        let genres = vec![Genre::RnB, Genre::HipHop];
        let raw = encode_genres(&genres).unwrap();
        assert_eq!(raw, r#"["R&B","Hip-Hop"]"#);
        assert_eq!(decode_genres(&raw).unwrap(), genres);
    }

    #[test]
    fn test_decode_rejects_unknown_values() {
        assert!(matches!(decode_genres(r#"["Polka"]"#), Err(Error::Internal(_))));
        assert!(matches!(decode_state("ZZ"), Err(Error::Internal(_))));
    }
}
