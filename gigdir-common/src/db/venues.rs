//! Venue persistence and mutations

use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqlitePool};
use tracing::info;

use super::{decode_genres, decode_state, encode_genres, DeletedEntity, NewVenue, Venue, VenuePatch};
use crate::time;
use crate::{Error, Result};

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, image_link, facebook_link, \
     website, genres, seeking_talent, seeking_description, created_at";

pub(crate) fn venue_from_row(row: &SqliteRow) -> Result<Venue> {
    Ok(Venue {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        city: row.try_get("city")?,
        state: decode_state(&row.try_get::<String, _>("state")?)?,
        address: row.try_get("address")?,
        phone: row.try_get("phone")?,
        image_link: row.try_get("image_link")?,
        facebook_link: row.try_get("facebook_link")?,
        website: row.try_get("website")?,
        genres: decode_genres(&row.try_get::<String, _>("genres")?)?,
        seeking_talent: row.try_get("seeking_talent")?,
        seeking_description: row.try_get("seeking_description")?,
        created_at: time::from_millis(row.try_get("created_at")?),
    })
}

/// Load a venue on any executor (pool or open transaction)
pub(crate) async fn fetch_venue<'e, E>(executor: E, id: i64) -> Result<Option<Venue>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(executor).await?;
    row.as_ref().map(venue_from_row).transpose()
}

/// Get venue by id
pub async fn get_venue(pool: &SqlitePool, id: i64) -> Result<Venue> {
    fetch_venue(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("venue {id}")))
}

/// Create a venue; `created_at` is assigned here
pub async fn create_venue(pool: &SqlitePool, new: NewVenue) -> Result<Venue> {
    let created_at = time::now();
    let genres = encode_genres(&new.genres)?;

    let mut tx = pool.begin().await?;
    let id = sqlx::query(
        r#"
        INSERT INTO venues (
            name, city, state, address, phone, image_link, facebook_link,
            website, genres, seeking_talent, seeking_description, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.name)
    .bind(&new.city)
    .bind(new.state.as_str())
    .bind(&new.address)
    .bind(&new.phone)
    .bind(&new.image_link)
    .bind(&new.facebook_link)
    .bind(&new.website)
    .bind(&genres)
    .bind(new.seeking_talent)
    .bind(&new.seeking_description)
    .bind(time::to_millis(&created_at))
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();
    tx.commit().await?;

    info!("Venue {} ({}) was successfully listed", id, new.name);
    Ok(new.into_venue(id, created_at))
}

/// Merge `patch` onto the stored venue and write it back
pub async fn update_venue(pool: &SqlitePool, id: i64, patch: VenuePatch) -> Result<Venue> {
    let mut tx = pool.begin().await?;
    let mut venue = fetch_venue(&mut *tx, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("venue {id}")))?;

    patch.apply(&mut venue);
    let genres = encode_genres(&venue.genres)?;

    sqlx::query(
        r#"
        UPDATE venues SET
            name = ?, city = ?, state = ?, address = ?, phone = ?, image_link = ?,
            facebook_link = ?, website = ?, genres = ?, seeking_talent = ?,
            seeking_description = ?
        WHERE id = ?
        "#,
    )
    .bind(&venue.name)
    .bind(&venue.city)
    .bind(venue.state.as_str())
    .bind(&venue.address)
    .bind(&venue.phone)
    .bind(&venue.image_link)
    .bind(&venue.facebook_link)
    .bind(&venue.website)
    .bind(&genres)
    .bind(venue.seeking_talent)
    .bind(&venue.seeking_description)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    info!("Venue {} ({}) was successfully updated", id, venue.name);
    Ok(venue)
}

/// Delete a venue; its shows go with it through the foreign-key cascade
pub async fn delete_venue(pool: &SqlitePool, id: i64) -> Result<DeletedEntity> {
    let mut tx = pool.begin().await?;
    let name: String = sqlx::query_scalar("SELECT name FROM venues WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound(format!("venue {id}")))?;

    let shows_removed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shows WHERE venue_id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM venues WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!(
        "Venue {} ({}) was deleted along with {} show(s)",
        id, name, shows_removed
    );
    Ok(DeletedEntity {
        id,
        name,
        shows_removed,
    })
}

/// True when a venue row with `id` exists
pub(crate) async fn venue_exists<'e, E>(executor: E, id: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM venues WHERE id = ?)")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(found)
}
