//! Show persistence
//!
//! Shows are created once and never updated; they disappear only when the
//! venue or artist they reference is deleted.

use sqlx::{Row, SqlitePool};
use tracing::info;

use super::artists::artist_exists;
use super::venues::venue_exists;
use super::{NewShow, Show};
use crate::time;
use crate::validation::{FieldError, ValidationErrors, MSG_INVALID_CHOICE};
use crate::{Error, Result};

/// Get show by id
pub async fn get_show(pool: &SqlitePool, id: i64) -> Result<Show> {
    let row = sqlx::query("SELECT id, venue_id, artist_id, start_time FROM shows WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("show {id}")))?;

    Ok(Show {
        id: row.try_get("id")?,
        venue_id: row.try_get("venue_id")?,
        artist_id: row.try_get("artist_id")?,
        start_time: time::from_millis(row.try_get("start_time")?),
    })
}

/// Schedule a show
///
/// Venue and artist are checked inside the same transaction as the insert;
/// a dangling reference is reported as an invalid choice on that field.
pub async fn create_show(pool: &SqlitePool, new: NewShow) -> Result<Show> {
    let mut tx = pool.begin().await?;

    let mut errors = ValidationErrors::new();
    if !artist_exists(&mut *tx, new.artist_id).await? {
        errors.add("artist_id", "Artist", FieldError::invalid_choice(MSG_INVALID_CHOICE));
    }
    if !venue_exists(&mut *tx, new.venue_id).await? {
        errors.add("venue_id", "Venue", FieldError::invalid_choice(MSG_INVALID_CHOICE));
    }
    if !errors.is_empty() {
        return Err(Error::Validation(errors));
    }

    let id = sqlx::query("INSERT INTO shows (venue_id, artist_id, start_time) VALUES (?, ?, ?)")
        .bind(new.venue_id)
        .bind(new.artist_id)
        .bind(time::to_millis(&new.start_time))
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
    tx.commit().await?;

    info!(
        "Show {} was successfully listed (venue {}, artist {}, {})",
        id,
        new.venue_id,
        new.artist_id,
        new.start_time.to_rfc3339()
    );
    Ok(Show {
        id,
        venue_id: new.venue_id,
        artist_id: new.artist_id,
        start_time: new.start_time,
    })
}
