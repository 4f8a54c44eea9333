//! Form objects: turn a raw submission into validated values
//!
//! A [`Submission`] is the flat `field -> [values]` mapping a request body
//! decodes to. Each form runs every rule for its fields and returns either
//! the validated values or the whole batch of failures.

use std::collections::BTreeMap;

use crate::catalog::UsState;
use crate::db::{ArtistPatch, NewArtist, NewShow, NewVenue, VenuePatch};
use crate::queries::SearchCriteria;
use crate::time::parse_start_time;
use crate::validation::{
    checkbox, optional_url, required, valid_genres, valid_phone, valid_state, FieldError,
    ValidationErrors, MSG_INVALID_CHOICE, MSG_INVALID_DATETIME, MSG_INVALID_STATE,
};

/// Flat field-name -> values mapping; repeated keys accumulate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    fields: BTreeMap<String, Vec<String>>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one value under `key`
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(key.into()).or_default().push(value.into());
    }

    /// Builder form of [`Submission::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// First value submitted under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value submitted under `key`
    pub fn get_all(&self, key: &str) -> &[String] {
        self.fields.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Submission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut submission = Submission::new();
        for (k, v) in iter {
            submission.insert(k, v);
        }
        submission
    }
}

// Field names and their labels (labels prefix the error summary)
const NAME: (&str, &str) = ("name", "Name");
const CITY: (&str, &str) = ("city", "City");
const STATE: (&str, &str) = ("state", "State");
const ADDRESS: (&str, &str) = ("address", "Address");
const PHONE: (&str, &str) = ("phone", "Phone");
const IMAGE_LINK: &str = "image_link";
const GENRES: (&str, &str) = ("genres", "Genres");
const FACEBOOK_LINK: (&str, &str) = ("facebook_link", "Facebook link");
const WEBSITE: (&str, &str) = ("website", "Website");
const SEEKING_TALENT: &str = "seeking_talent";
const SEEKING_VENUE: &str = "seeking_venue";
const SEEKING_DESCRIPTION: &str = "seeking_description";
const ARTIST_ID: (&str, &str) = ("artist_id", "Artist");
const VENUE_ID: (&str, &str) = ("venue_id", "Venue");
const START_TIME: (&str, &str) = ("start_time", "Start Time");

fn check_required(
    errors: &mut ValidationErrors,
    sub: &Submission,
    (field, label): (&str, &str),
) -> Option<String> {
    errors.check(field, label, required(sub.get(field)))
}

fn check_phone(errors: &mut ValidationErrors, sub: &Submission) -> Option<String> {
    let (field, label) = PHONE;
    errors.check(field, label, valid_phone(sub.get(field).unwrap_or("")))
}

fn check_state(errors: &mut ValidationErrors, sub: &Submission) -> Option<UsState> {
    let (field, label) = STATE;
    errors.check(field, label, valid_state(sub.get(field)))
}

fn check_genres(
    errors: &mut ValidationErrors,
    sub: &Submission,
) -> Option<Vec<crate::catalog::Genre>> {
    let (field, label) = GENRES;
    errors.check(field, label, valid_genres(sub.get_all(field)))
}

fn check_url(
    errors: &mut ValidationErrors,
    sub: &Submission,
    (field, label): (&str, &str),
) -> Option<Option<String>> {
    errors.check(field, label, optional_url(sub.get(field)))
}

fn image_link(sub: &Submission) -> String {
    sub.get(IMAGE_LINK).map(str::trim).unwrap_or_default().to_string()
}

fn optional_text(sub: &Submission, field: &str) -> Option<String> {
    sub.get(field)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Venue create/edit form
pub struct VenueForm;

impl VenueForm {
    /// Every field is validated; absent keys count as blank
    pub fn validate_create(sub: &Submission) -> Result<NewVenue, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = check_required(&mut errors, sub, NAME);
        let city = check_required(&mut errors, sub, CITY);
        let state = check_state(&mut errors, sub);
        let address = check_required(&mut errors, sub, ADDRESS);
        let phone = check_phone(&mut errors, sub);
        let genres = check_genres(&mut errors, sub);
        let facebook_link = check_url(&mut errors, sub, FACEBOOK_LINK);
        let website = check_url(&mut errors, sub, WEBSITE);

        match (name, city, state, address, phone, genres, facebook_link, website) {
            (
                Some(name),
                Some(city),
                Some(state),
                Some(address),
                Some(phone),
                Some(genres),
                Some(facebook_link),
                Some(website),
            ) if errors.is_empty() => Ok(NewVenue {
                name,
                city,
                state,
                address,
                phone,
                image_link: image_link(sub),
                facebook_link,
                website,
                genres,
                seeking_talent: checkbox(sub.get(SEEKING_TALENT)),
                seeking_description: optional_text(sub, SEEKING_DESCRIPTION),
            }),
            _ => Err(errors),
        }
    }

    /// Only submitted keys are validated and carried into the patch
    pub fn validate_update(sub: &Submission) -> Result<VenuePatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut patch = VenuePatch::default();

        if sub.contains(NAME.0) {
            patch.name = check_required(&mut errors, sub, NAME);
        }
        if sub.contains(CITY.0) {
            patch.city = check_required(&mut errors, sub, CITY);
        }
        if sub.contains(STATE.0) {
            patch.state = check_state(&mut errors, sub);
        }
        if sub.contains(ADDRESS.0) {
            patch.address = check_required(&mut errors, sub, ADDRESS);
        }
        if sub.contains(PHONE.0) {
            patch.phone = check_phone(&mut errors, sub);
        }
        if sub.contains(IMAGE_LINK) {
            patch.image_link = Some(image_link(sub));
        }
        if sub.contains(GENRES.0) {
            patch.genres = check_genres(&mut errors, sub);
        }
        if sub.contains(FACEBOOK_LINK.0) {
            patch.facebook_link = check_url(&mut errors, sub, FACEBOOK_LINK);
        }
        if sub.contains(WEBSITE.0) {
            patch.website = check_url(&mut errors, sub, WEBSITE);
        }
        if sub.contains(SEEKING_TALENT) {
            patch.seeking_talent = Some(checkbox(sub.get(SEEKING_TALENT)));
        }
        if sub.contains(SEEKING_DESCRIPTION) {
            patch.seeking_description = Some(optional_text(sub, SEEKING_DESCRIPTION));
        }

        errors.finish(|| patch)
    }
}

/// Artist create/edit form
pub struct ArtistForm;

impl ArtistForm {
    pub fn validate_create(sub: &Submission) -> Result<NewArtist, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = check_required(&mut errors, sub, NAME);
        let city = check_required(&mut errors, sub, CITY);
        let state = check_state(&mut errors, sub);
        let phone = check_phone(&mut errors, sub);
        let genres = check_genres(&mut errors, sub);
        let facebook_link = check_url(&mut errors, sub, FACEBOOK_LINK);
        let website = check_url(&mut errors, sub, WEBSITE);

        match (name, city, state, phone, genres, facebook_link, website) {
            (
                Some(name),
                Some(city),
                Some(state),
                Some(phone),
                Some(genres),
                Some(facebook_link),
                Some(website),
            ) if errors.is_empty() => Ok(NewArtist {
                name,
                city,
                state,
                phone,
                image_link: image_link(sub),
                facebook_link,
                website,
                genres,
                seeking_venue: checkbox(sub.get(SEEKING_VENUE)),
                seeking_description: optional_text(sub, SEEKING_DESCRIPTION),
            }),
            _ => Err(errors),
        }
    }

    pub fn validate_update(sub: &Submission) -> Result<ArtistPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut patch = ArtistPatch::default();

        if sub.contains(NAME.0) {
            patch.name = check_required(&mut errors, sub, NAME);
        }
        if sub.contains(CITY.0) {
            patch.city = check_required(&mut errors, sub, CITY);
        }
        if sub.contains(STATE.0) {
            patch.state = check_state(&mut errors, sub);
        }
        if sub.contains(PHONE.0) {
            patch.phone = check_phone(&mut errors, sub);
        }
        if sub.contains(IMAGE_LINK) {
            patch.image_link = Some(image_link(sub));
        }
        if sub.contains(GENRES.0) {
            patch.genres = check_genres(&mut errors, sub);
        }
        if sub.contains(FACEBOOK_LINK.0) {
            patch.facebook_link = check_url(&mut errors, sub, FACEBOOK_LINK);
        }
        if sub.contains(WEBSITE.0) {
            patch.website = check_url(&mut errors, sub, WEBSITE);
        }
        if sub.contains(SEEKING_VENUE) {
            patch.seeking_venue = Some(checkbox(sub.get(SEEKING_VENUE)));
        }
        if sub.contains(SEEKING_DESCRIPTION) {
            patch.seeking_description = Some(optional_text(sub, SEEKING_DESCRIPTION));
        }

        errors.finish(|| patch)
    }
}

fn check_id(
    errors: &mut ValidationErrors,
    sub: &Submission,
    (field, label): (&str, &str),
) -> Option<i64> {
    let outcome = required(sub.get(field)).and_then(|raw| {
        raw.parse::<i64>()
            .map_err(|_| FieldError::invalid_choice(MSG_INVALID_CHOICE))
    });
    errors.check(field, label, outcome)
}

/// Show scheduling form
pub struct ShowForm;

impl ShowForm {
    /// Venue and artist existence is checked by the create mutation
    pub fn validate(sub: &Submission) -> Result<NewShow, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let artist_id = check_id(&mut errors, sub, ARTIST_ID);
        let venue_id = check_id(&mut errors, sub, VENUE_ID);
        let (field, label) = START_TIME;
        let start_time = errors.check(
            field,
            label,
            required(sub.get(field)).and_then(|raw| {
                parse_start_time(&raw).ok_or_else(|| FieldError::invalid_format(MSG_INVALID_DATETIME))
            }),
        );

        match (artist_id, venue_id, start_time) {
            (Some(artist_id), Some(venue_id), Some(start_time)) if errors.is_empty() => {
                Ok(NewShow {
                    venue_id,
                    artist_id,
                    start_time,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Advanced search form: name, city, optional state
pub struct SearchForm;

impl SearchForm {
    pub fn validate(sub: &Submission) -> Result<SearchCriteria, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let state = match sub.get(STATE.0).map(str::trim) {
            None | Some("") => None,
            Some(raw) => errors.check(
                STATE.0,
                STATE.1,
                UsState::from_value(raw).ok_or_else(|| FieldError::invalid_choice(MSG_INVALID_STATE)),
            ),
        };

        errors.finish(|| SearchCriteria {
            name: sub.get(NAME.0).map(str::trim).unwrap_or_default().to_string(),
            city: sub.get(CITY.0).map(str::trim).unwrap_or_default().to_string(),
            state,
        })
    }
}
