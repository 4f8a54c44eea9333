//! Read-side projections over venues, artists and shows
//!
//! Every query that needs to tell past shows from upcoming ones takes the
//! request's `now`; handlers capture it once and pass the same instant to
//! each query they run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};

use crate::catalog::{with_blank_first, Choice, UsState};
use crate::db::artists::get_artist;
use crate::db::venues::get_venue;
use crate::db::{decode_state, Artist, Venue};
use crate::time::{self, ShowTiming};
use crate::Result;

/// One venue or artist in a listing or search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: i64,
}

/// Venues sharing a (city, state)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueArea {
    pub city: String,
    pub state: UsState,
    pub venues: Vec<EntitySummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<EntitySummary>,
}

impl From<Vec<EntitySummary>> for SearchResults {
    fn from(data: Vec<EntitySummary>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Filters for advanced search; blank strings match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub name: String,
    pub city: String,
    pub state: Option<UsState>,
}

impl SearchCriteria {
    pub fn by_name(term: &str) -> Self {
        Self {
            name: term.trim().to_string(),
            ..Self::default()
        }
    }
}

/// A show seen from its venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueShow {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: DateTime<Utc>,
}

/// A show seen from its artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistShow {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: String,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: Artist,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

/// Row of the show listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    pub id: i64,
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: String,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistEntry {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy)]
enum Directory {
    Venues,
    Artists,
}

impl Directory {
    fn table(self) -> &'static str {
        match self {
            Directory::Venues => "venues",
            Directory::Artists => "artists",
        }
    }

    /// Column in `shows` referencing this table
    fn show_column(self) -> &'static str {
        match self {
            Directory::Venues => "venue_id",
            Directory::Artists => "artist_id",
        }
    }
}

/// Unicode case-insensitive substring test; an empty needle matches
fn contains_folded(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

// SQLite's LIKE folds ASCII only, so name and city are matched here
async fn summaries(
    pool: &SqlitePool,
    directory: Directory,
    criteria: &SearchCriteria,
    now: &DateTime<Utc>,
) -> Result<Vec<EntitySummary>> {
    let sql = format!(
        r"
        SELECT e.id, e.name, e.city,
            (SELECT COUNT(*) FROM shows s WHERE s.{column} = e.id AND s.start_time > ?)
                AS num_upcoming_shows
        FROM {table} e
        WHERE (? IS NULL OR e.state = ?)
        ORDER BY e.name, e.id
        ",
        column = directory.show_column(),
        table = directory.table(),
    );
    let state = criteria.state.map(|s| s.as_str());

    let rows = sqlx::query(&sql)
        .bind(time::to_millis(now))
        .bind(state)
        .bind(state)
        .fetch_all(pool)
        .await?;

    let mut matches = Vec::new();
    for row in &rows {
        let name: String = row.try_get("name")?;
        let city: String = row.try_get("city")?;
        if contains_folded(&name, &criteria.name) && contains_folded(&city, &criteria.city) {
            matches.push(EntitySummary {
                id: row.try_get("id")?,
                name,
                num_upcoming_shows: row.try_get("num_upcoming_shows")?,
            });
        }
    }
    Ok(matches)
}

/// Venues grouped by area, areas ordered by city then state
pub async fn venues_by_area(pool: &SqlitePool, now: &DateTime<Utc>) -> Result<Vec<VenueArea>> {
    let rows = sqlx::query(
        r"
        SELECT v.id, v.name, v.city, v.state,
            (SELECT COUNT(*) FROM shows s WHERE s.venue_id = v.id AND s.start_time > ?)
                AS num_upcoming_shows
        FROM venues v
        ORDER BY v.city, v.state, v.name, v.id
        ",
    )
    .bind(time::to_millis(now))
    .fetch_all(pool)
    .await?;

    let mut located = Vec::with_capacity(rows.len());
    for row in &rows {
        let state = decode_state(&row.try_get::<String, _>("state")?)?;
        let summary = EntitySummary {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            num_upcoming_shows: row.try_get("num_upcoming_shows")?,
        };
        located.push((row.try_get::<String, _>("city")?, state, summary));
    }
    Ok(group_by_area(located))
}

/// Fold rows already sorted by (city, state) into areas
fn group_by_area(rows: Vec<(String, UsState, EntitySummary)>) -> Vec<VenueArea> {
    let mut areas: Vec<VenueArea> = Vec::new();
    for (city, state, summary) in rows {
        match areas.last_mut() {
            Some(area) if area.city == city && area.state == state => area.venues.push(summary),
            _ => areas.push(VenueArea {
                city,
                state,
                venues: vec![summary],
            }),
        }
    }
    areas
}

/// Case-insensitive substring search on venue name
pub async fn search_venues(
    pool: &SqlitePool,
    term: &str,
    now: &DateTime<Utc>,
) -> Result<SearchResults> {
    let data = summaries(pool, Directory::Venues, &SearchCriteria::by_name(term), now).await?;
    Ok(data.into())
}

/// Case-insensitive substring search on artist name
pub async fn search_artists(
    pool: &SqlitePool,
    term: &str,
    now: &DateTime<Utc>,
) -> Result<SearchResults> {
    let data = summaries(pool, Directory::Artists, &SearchCriteria::by_name(term), now).await?;
    Ok(data.into())
}

pub async fn advanced_search_venues(
    pool: &SqlitePool,
    criteria: &SearchCriteria,
    now: &DateTime<Utc>,
) -> Result<SearchResults> {
    Ok(summaries(pool, Directory::Venues, criteria, now).await?.into())
}

pub async fn advanced_search_artists(
    pool: &SqlitePool,
    criteria: &SearchCriteria,
    now: &DateTime<Utc>,
) -> Result<SearchResults> {
    Ok(summaries(pool, Directory::Artists, criteria, now).await?.into())
}

/// Venue attributes plus its shows split into past and upcoming
pub async fn venue_detail(pool: &SqlitePool, id: i64, now: &DateTime<Utc>) -> Result<VenueDetail> {
    let venue = get_venue(pool, id).await?;

    let rows = sqlx::query(
        r"
        SELECT s.artist_id, a.name AS artist_name, a.image_link AS artist_image_link,
            s.start_time
        FROM shows s
        JOIN artists a ON a.id = s.artist_id
        WHERE s.venue_id = ?
        ORDER BY s.start_time, s.id
        ",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let mut past_shows = Vec::new();
    let mut upcoming_shows = Vec::new();
    for row in &rows {
        let show = VenueShow {
            artist_id: row.try_get("artist_id")?,
            artist_name: row.try_get("artist_name")?,
            artist_image_link: row.try_get("artist_image_link")?,
            start_time: time::from_millis(row.try_get("start_time")?),
        };
        match ShowTiming::classify(&show.start_time, now) {
            ShowTiming::Past => past_shows.push(show),
            ShowTiming::Upcoming => upcoming_shows.push(show),
        }
    }

    Ok(VenueDetail {
        venue,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    })
}

/// Artist attributes plus its shows split into past and upcoming
pub async fn artist_detail(
    pool: &SqlitePool,
    id: i64,
    now: &DateTime<Utc>,
) -> Result<ArtistDetail> {
    let artist = get_artist(pool, id).await?;

    let rows = sqlx::query(
        r"
        SELECT s.venue_id, v.name AS venue_name, v.image_link AS venue_image_link,
            s.start_time
        FROM shows s
        JOIN venues v ON v.id = s.venue_id
        WHERE s.artist_id = ?
        ORDER BY s.start_time, s.id
        ",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    let mut past_shows = Vec::new();
    let mut upcoming_shows = Vec::new();
    for row in &rows {
        let show = ArtistShow {
            venue_id: row.try_get("venue_id")?,
            venue_name: row.try_get("venue_name")?,
            venue_image_link: row.try_get("venue_image_link")?,
            start_time: time::from_millis(row.try_get("start_time")?),
        };
        if ShowTiming::classify(&show.start_time, now).is_upcoming() {
            upcoming_shows.push(show);
        } else {
            past_shows.push(show);
        }
    }

    Ok(ArtistDetail {
        artist,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    })
}

/// Every show with its venue and artist, earliest first
pub async fn list_shows(pool: &SqlitePool) -> Result<Vec<ShowListing>> {
    let rows = sqlx::query(
        r"
        SELECT s.id, s.venue_id, v.name AS venue_name, s.artist_id,
            a.name AS artist_name, a.image_link AS artist_image_link, s.start_time
        FROM shows s
        JOIN venues v ON v.id = s.venue_id
        JOIN artists a ON a.id = s.artist_id
        ORDER BY s.start_time, s.id
        ",
    )
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(ShowListing {
                id: row.try_get("id")?,
                venue_id: row.try_get("venue_id")?,
                venue_name: row.try_get("venue_name")?,
                artist_id: row.try_get("artist_id")?,
                artist_name: row.try_get("artist_name")?,
                artist_image_link: row.try_get("artist_image_link")?,
                start_time: time::from_millis(row.try_get("start_time")?),
            })
        })
        .collect()
}

pub async fn list_artists(pool: &SqlitePool) -> Result<Vec<ArtistEntry>> {
    let rows = sqlx::query("SELECT id, name FROM artists ORDER BY name, id")
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| {
            Ok(ArtistEntry {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            })
        })
        .collect()
}

async fn name_choices(pool: &SqlitePool, directory: Directory) -> Result<Vec<Choice>> {
    let sql = format!("SELECT id, name FROM {} ORDER BY name, id", directory.table());
    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    let choices = rows
        .iter()
        .map(|row| {
            let id: i64 = row.try_get("id")?;
            let name: String = row.try_get("name")?;
            Ok(Choice::new(id.to_string(), name))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(with_blank_first(choices))
}

/// Venue picker for the show form, blank option first
pub async fn venue_choices(pool: &SqlitePool) -> Result<Vec<Choice>> {
    name_choices(pool, Directory::Venues).await
}

/// Artist picker for the show form, blank option first
pub async fn artist_choices(pool: &SqlitePool) -> Result<Vec<Choice>> {
    name_choices(pool, Directory::Artists).await
}
