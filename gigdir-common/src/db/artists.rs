//! Artist persistence and mutations

use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqlitePool};
use tracing::info;

use super::{
    decode_genres, decode_state, encode_genres, Artist, ArtistPatch, DeletedEntity, NewArtist,
};
use crate::time;
use crate::{Error, Result};

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, image_link, facebook_link, \
     website, genres, seeking_venue, seeking_description, created_at";

pub(crate) fn artist_from_row(row: &SqliteRow) -> Result<Artist> {
    Ok(Artist {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        city: row.try_get("city")?,
        state: decode_state(&row.try_get::<String, _>("state")?)?,
        phone: row.try_get("phone")?,
        image_link: row.try_get("image_link")?,
        facebook_link: row.try_get("facebook_link")?,
        website: row.try_get("website")?,
        genres: decode_genres(&row.try_get::<String, _>("genres")?)?,
        seeking_venue: row.try_get("seeking_venue")?,
        seeking_description: row.try_get("seeking_description")?,
        created_at: time::from_millis(row.try_get("created_at")?),
    })
}

pub(crate) async fn fetch_artist<'e, E>(executor: E, id: i64) -> Result<Option<Artist>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sql = format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(executor).await?;
    row.as_ref().map(artist_from_row).transpose()
}

/// Get artist by id
pub async fn get_artist(pool: &SqlitePool, id: i64) -> Result<Artist> {
    fetch_artist(pool, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("artist {id}")))
}

/// Create an artist; `created_at` is assigned here
pub async fn create_artist(pool: &SqlitePool, new: NewArtist) -> Result<Artist> {
    let created_at = time::now();
    let genres = encode_genres(&new.genres)?;

    let mut tx = pool.begin().await?;
    let id = sqlx::query(
        r#"
        INSERT INTO artists (
            name, city, state, phone, image_link, facebook_link, website,
            genres, seeking_venue, seeking_description, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.name)
    .bind(&new.city)
    .bind(new.state.as_str())
    .bind(&new.phone)
    .bind(&new.image_link)
    .bind(&new.facebook_link)
    .bind(&new.website)
    .bind(&genres)
    .bind(new.seeking_venue)
    .bind(&new.seeking_description)
    .bind(time::to_millis(&created_at))
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();
    tx.commit().await?;

    info!("Artist {} ({}) was successfully listed", id, new.name);
    Ok(new.into_artist(id, created_at))
}

/// Merge `patch` onto the stored artist and write it back
pub async fn update_artist(pool: &SqlitePool, id: i64, patch: ArtistPatch) -> Result<Artist> {
    let mut tx = pool.begin().await?;
    let mut artist = fetch_artist(&mut *tx, id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("artist {id}")))?;

    patch.apply(&mut artist);
    let genres = encode_genres(&artist.genres)?;

    sqlx::query(
        r#"
        UPDATE artists SET
            name = ?, city = ?, state = ?, phone = ?, image_link = ?,
            facebook_link = ?, website = ?, genres = ?, seeking_venue = ?,
            seeking_description = ?
        WHERE id = ?
        "#,
    )
    .bind(&artist.name)
    .bind(&artist.city)
    .bind(artist.state.as_str())
    .bind(&artist.phone)
    .bind(&artist.image_link)
    .bind(&artist.facebook_link)
    .bind(&artist.website)
    .bind(&genres)
    .bind(artist.seeking_venue)
    .bind(&artist.seeking_description)
    .bind(id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    info!("Artist {} ({}) was successfully updated", id, artist.name);
    Ok(artist)
}

/// Delete an artist; its shows go with it through the foreign-key cascade
pub async fn delete_artist(pool: &SqlitePool, id: i64) -> Result<DeletedEntity> {
    let mut tx = pool.begin().await?;
    let name: String = sqlx::query_scalar("SELECT name FROM artists WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound(format!("artist {id}")))?;

    let shows_removed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shows WHERE artist_id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM artists WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!(
        "Artist {} ({}) was deleted along with {} show(s)",
        id, name, shows_removed
    );
    Ok(DeletedEntity {
        id,
        name,
        shows_removed,
    })
}

pub(crate) async fn artist_exists<'e, E>(executor: E, id: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM artists WHERE id = ?)")
        .bind(id)
        .fetch_one(executor)
        .await?;
    Ok(found)
}
