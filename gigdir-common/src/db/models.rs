//! Domain entities and their per-entity field sets
//!
//! `New*` structs carry validated values for a create; `*Patch` structs
//! carry one optional slot per mutable field for a field-merge update.
//! Applying a patch only overwrites the slots that are present.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Genre, UsState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: UsState,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<Genre>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: UsState,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<Genre>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A scheduled performance of one artist at one venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: i64,
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: DateTime<Utc>,
}

/// Validated values for a new venue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVenue {
    pub name: String,
    pub city: String,
    pub state: UsState,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<Genre>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl NewVenue {
    pub fn into_venue(self, id: i64, created_at: DateTime<Utc>) -> Venue {
        Venue {
            id,
            name: self.name,
            city: self.city,
            state: self.state,
            address: self.address,
            phone: self.phone,
            image_link: self.image_link,
            facebook_link: self.facebook_link,
            website: self.website,
            genres: self.genres,
            seeking_talent: self.seeking_talent,
            seeking_description: self.seeking_description,
            created_at,
        }
    }
}

/// Validated values for a new artist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArtist {
    pub name: String,
    pub city: String,
    pub state: UsState,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<Genre>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl NewArtist {
    pub fn into_artist(self, id: i64, created_at: DateTime<Utc>) -> Artist {
        Artist {
            id,
            name: self.name,
            city: self.city,
            state: self.state,
            phone: self.phone,
            image_link: self.image_link,
            facebook_link: self.facebook_link,
            website: self.website,
            genres: self.genres,
            seeking_venue: self.seeking_venue,
            seeking_description: self.seeking_description,
            created_at,
        }
    }
}

/// Validated values for a new show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShow {
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: DateTime<Utc>,
}

/// Field-merge update for a venue
///
/// Optional columns use `Option<Option<_>>`: the outer `None` leaves the
/// column alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenuePatch {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<UsState>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub genres: Option<Vec<Genre>>,
    pub seeking_talent: Option<bool>,
    pub seeking_description: Option<Option<String>>,
}

impl VenuePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, venue: &mut Venue) {
        if let Some(v) = self.name {
            venue.name = v;
        }
        if let Some(v) = self.city {
            venue.city = v;
        }
        if let Some(v) = self.state {
            venue.state = v;
        }
        if let Some(v) = self.address {
            venue.address = v;
        }
        if let Some(v) = self.phone {
            venue.phone = v;
        }
        if let Some(v) = self.image_link {
            venue.image_link = v;
        }
        if let Some(v) = self.facebook_link {
            venue.facebook_link = v;
        }
        if let Some(v) = self.website {
            venue.website = v;
        }
        if let Some(v) = self.genres {
            venue.genres = v;
        }
        if let Some(v) = self.seeking_talent {
            venue.seeking_talent = v;
        }
        if let Some(v) = self.seeking_description {
            venue.seeking_description = v;
        }
    }
}

/// Field-merge update for an artist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistPatch {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<UsState>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub genres: Option<Vec<Genre>>,
    pub seeking_venue: Option<bool>,
    pub seeking_description: Option<Option<String>>,
}

impl ArtistPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, artist: &mut Artist) {
        if let Some(v) = self.name {
            artist.name = v;
        }
        if let Some(v) = self.city {
            artist.city = v;
        }
        if let Some(v) = self.state {
            artist.state = v;
        }
        if let Some(v) = self.phone {
            artist.phone = v;
        }
        if let Some(v) = self.image_link {
            artist.image_link = v;
        }
        if let Some(v) = self.facebook_link {
            artist.facebook_link = v;
        }
        if let Some(v) = self.website {
            artist.website = v;
        }
        if let Some(v) = self.genres {
            artist.genres = v;
        }
        if let Some(v) = self.seeking_venue {
            artist.seeking_venue = v;
        }
        if let Some(v) = self.seeking_description {
            artist.seeking_description = v;
        }
    }
}
