//! Fixed catalogs used for validation and form choice lists
//!
//! Two closed sets: US state codes and music genres. Each exposes
//! membership testing over raw values, ordered `(value, label)` pairs for
//! presentation, and the same pairs prefixed with a blank option.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One `(value, label)` pair offered to a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// The "unselected" option
    pub fn blank() -> Self {
        Self::new("", "")
    }
}

/// Prefix a choice list with the blank option
pub fn with_blank_first(choices: Vec<Choice>) -> Vec<Choice> {
    let mut out = Vec::with_capacity(choices.len() + 1);
    out.push(Choice::blank());
    out.extend(choices);
    out
}

macro_rules! select_catalog {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every member, in presentation order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Raw stored/submitted value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            /// Membership test over a raw value (exact match)
            pub fn from_value(value: &str) -> Option<Self> {
                match value {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Raw values, for membership checks by callers holding strings
            pub fn validation_list() -> Vec<&'static str> {
                Self::ALL.iter().map(|c| c.as_str()).collect()
            }

            /// Ordered `(value, label)` pairs
            pub fn choices() -> Vec<Choice> {
                Self::ALL
                    .iter()
                    .map(|c| Choice::new(c.as_str(), c.as_str()))
                    .collect()
            }

            /// `choices()` with a leading blank option
            pub fn choices_first_blank() -> Vec<Choice> {
                with_blank_first(Self::choices())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                $name::from_value(&raw).ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        "unknown {} value: {}",
                        stringify!($name),
                        raw
                    ))
                })
            }
        }
    };
}

select_catalog! {
    /// Music genres, including the "Other" catch-all
    pub enum Genre {
        Alternative => "Alternative",
        Blues => "Blues",
        Classical => "Classical",
        Country => "Country",
        Electronic => "Electronic",
        Folk => "Folk",
        Funk => "Funk",
        HipHop => "Hip-Hop",
        HeavyMetal => "Heavy Metal",
        Instrumental => "Instrumental",
        Jazz => "Jazz",
        MusicalTheatre => "Musical Theatre",
        Pop => "Pop",
        Punk => "Punk",
        RnB => "R&B",
        Reggae => "Reggae",
        RockNRoll => "Rock n Roll",
        Soul => "Soul",
        Other => "Other",
    }
}

select_catalog! {
    /// Two-letter US state codes (including DC)
    pub enum UsState {
        AL => "AL",
        AK => "AK",
        AZ => "AZ",
        AR => "AR",
        CA => "CA",
        CO => "CO",
        CT => "CT",
        DE => "DE",
        DC => "DC",
        FL => "FL",
        GA => "GA",
        HI => "HI",
        ID => "ID",
        IL => "IL",
        IN => "IN",
        IA => "IA",
        KS => "KS",
        KY => "KY",
        LA => "LA",
        ME => "ME",
        MT => "MT",
        NE => "NE",
        NV => "NV",
        NH => "NH",
        NJ => "NJ",
        NM => "NM",
        NY => "NY",
        NC => "NC",
        ND => "ND",
        OH => "OH",
        OK => "OK",
        OR => "OR",
        MD => "MD",
        MA => "MA",
        MI => "MI",
        MN => "MN",
        MS => "MS",
        MO => "MO",
        PA => "PA",
        RI => "RI",
        SC => "SC",
        SD => "SD",
        TN => "TN",
        TX => "TX",
        UT => "UT",
        VT => "VT",
        VA => "VA",
        WA => "WA",
        WV => "WV",
        WI => "WI",
        WY => "WY",
    }
}
