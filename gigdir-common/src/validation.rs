//! Field-level validation rules and batched error collection
//!
//! Every rule is a pure function over one submitted value. Forms run all
//! of their rules and collect failures into [`ValidationErrors`] instead
//! of stopping at the first one.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use url::Url;

use crate::catalog::{Genre, UsState};

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_INVALID_PHONE: &str = "Invalid phone number.";
pub const MSG_INVALID_STATE: &str = "Invalid state.";
pub const MSG_INVALID_GENRES: &str = "Invalid genres.";
pub const MSG_INVALID_URL: &str = "Invalid URL.";
pub const MSG_INVALID_CHOICE: &str = "Not a valid choice.";
pub const MSG_INVALID_DATETIME: &str = "Not a valid datetime value.";

/// 3-3-4 digit grouping, optional parenthesised area code, optional
/// `-`, `.` or space separators
///
/// `$` is end of text: a trailing newline is rejected, not tolerated.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?([0-9]{3})\)?[-. ]?([0-9]{3})[-. ]?([0-9]{4})$")
        .expect("phone pattern is a valid regex")
});

/// Category of a field failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldErrorKind {
    /// Required value absent or blank
    MissingField,
    /// Value present but malformed
    InvalidFormat,
    /// Value not a member of the allowed set
    InvalidChoice,
}

/// One failure on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn missing() -> Self {
        Self::new(FieldErrorKind::MissingField, MSG_REQUIRED)
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(FieldErrorKind::InvalidFormat, message)
    }

    pub fn invalid_choice(message: impl Into<String>) -> Self {
        Self::new(FieldErrorKind::InvalidChoice, message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldErrors {
    label: String,
    errors: Vec<FieldError>,
}

/// Batch of failures for one submission, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, FieldErrors>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure on `field`; `label` is the human-readable field name
    pub fn add(&mut self, field: &str, label: &str, error: FieldError) {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| FieldErrors {
                label: label.to_string(),
                errors: Vec::new(),
            })
            .errors
            .push(error);
    }

    /// Record the outcome of a rule, keeping the value on success
    pub fn check<T>(
        &mut self,
        field: &str,
        label: &str,
        outcome: Result<T, FieldError>,
    ) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(e) => {
                self.add(field, label, e);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Failures recorded for one field
    pub fn get(&self, field: &str) -> &[FieldError] {
        self.fields
            .get(field)
            .map(|f| f.errors.as_slice())
            .unwrap_or(&[])
    }

    /// Kind of the first failure on `field`, if any
    pub fn kind_of(&self, field: &str) -> Option<FieldErrorKind> {
        self.get(field).first().map(|e| e.kind)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    /// `field -> [messages]` view for callers reporting all problems at once
    pub fn messages(&self) -> BTreeMap<String, Vec<String>> {
        self.fields
            .iter()
            .map(|(field, entry)| {
                (
                    field.clone(),
                    entry.errors.iter().map(|e| e.message.clone()).collect(),
                )
            })
            .collect()
    }

    /// One `"Label: msg, msg"` segment per field, joined with `"; "`
    pub fn summary(&self) -> String {
        self.fields
            .values()
            .map(|entry| {
                let messages: Vec<&str> =
                    entry.errors.iter().map(|e| e.message.as_str()).collect();
                format!("{}: {}", entry.label, messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// `Ok(value)` when nothing was recorded
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, entry) in &self.fields {
            let messages: Vec<&str> = entry.errors.iter().map(|e| e.message.as_str()).collect();
            map.serialize_entry(field, &messages)?;
        }
        map.end()
    }
}

// ========================================
// Rules
// ========================================

/// Non-blank value, trimmed
pub fn required(value: Option<&str>) -> Result<String, FieldError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(FieldError::missing()),
    }
}

/// True iff `value` matches the phone pattern exactly
pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

pub fn valid_phone(value: &str) -> Result<String, FieldError> {
    if is_valid_phone(value) {
        Ok(value.to_string())
    } else {
        Err(FieldError::invalid_format(MSG_INVALID_PHONE))
    }
}

/// Required, then a member of the state catalog
pub fn valid_state(value: Option<&str>) -> Result<UsState, FieldError> {
    let raw = required(value)?;
    UsState::from_value(&raw).ok_or_else(|| FieldError::invalid_choice(MSG_INVALID_STATE))
}

/// Non-empty, then a subset of the genre catalog
///
/// Duplicates are dropped, keeping the first occurrence's position.
pub fn valid_genres(values: &[String]) -> Result<Vec<Genre>, FieldError> {
    let submitted: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();
    if submitted.is_empty() {
        return Err(FieldError::missing());
    }

    let mut genres = Vec::with_capacity(submitted.len());
    for raw in submitted {
        let genre =
            Genre::from_value(raw).ok_or_else(|| FieldError::invalid_choice(MSG_INVALID_GENRES))?;
        if !genres.contains(&genre) {
            genres.push(genre);
        }
    }
    Ok(genres)
}

/// Absolute URL with a host
pub fn valid_url(value: &str) -> Result<String, FieldError> {
    match Url::parse(value) {
        Ok(url) if url.has_host() => Ok(value.to_string()),
        _ => Err(FieldError::invalid_format(MSG_INVALID_URL)),
    }
}

/// Optional URL: blank or absent is `Ok(None)`
pub fn optional_url(value: Option<&str>) -> Result<Option<String>, FieldError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => valid_url(v).map(Some),
    }
}

/// Checkbox semantics: a truthy marker means checked
pub fn checkbox(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("y" | "yes" | "on" | "true" | "1")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_accepts_common_layouts() {
        for phone in [
            "326-123-5000",
            "(326) 123-5000",
            "(326)123-5000",
            "326.123.5000",
            "326 123 5000",
            "3261235000",
            "(326)1235000",
        ] {
            assert!(is_valid_phone(phone), "should accept {phone}");
        }
    }

    #[test]
    fn test_phone_rejects_malformed() {
        for phone in [
            "",
            "326-123-500",
            "326-123-50000",
            "326--123-5000",
            "+1 326-123-5000",
            "326-123-5000 ",
            "abc-def-ghij",
            "326_123_5000",
        ] {
            assert!(!is_valid_phone(phone), "should reject {phone:?}");
        }
        assert_eq!(
            valid_phone("12").unwrap_err().kind,
            FieldErrorKind::InvalidFormat
        );
    }

    #[test]
    fn test_state_rule() {
        assert_eq!(valid_state(Some("NY")), Ok(UsState::NY));
        assert_eq!(valid_state(Some("")).unwrap_err().kind, FieldErrorKind::MissingField);
        assert_eq!(valid_state(None).unwrap_err().kind, FieldErrorKind::MissingField);
        let err = valid_state(Some("Narnia")).unwrap_err();
        assert_eq!(err.kind, FieldErrorKind::InvalidChoice);
        assert_eq!(err.message, MSG_INVALID_STATE);
    }

    #[test]
    fn test_genres_rule() {
        let ok = valid_genres(&["Jazz".into(), "Classical".into(), "Jazz".into()]).unwrap();
        assert_eq!(ok, vec![Genre::Jazz, Genre::Classical]);

        let empty = valid_genres(&[]).unwrap_err();
        assert_eq!(empty.kind, FieldErrorKind::MissingField);

        let bad = valid_genres(&["Jazz".into(), "Polka".into()]).unwrap_err();
        assert_eq!(bad.kind, FieldErrorKind::InvalidChoice);
        assert_eq!(bad.message, MSG_INVALID_GENRES);
    }

    #[test]
    fn test_url_rules() {
        assert!(valid_url("https://www.facebook.com/GunsNPetals").is_ok());
        assert!(valid_url("http://example.com").is_ok());
        assert!(valid_url("www.example.com").is_err());
        assert!(valid_url("mailto:someone@example.com").is_err());
        assert_eq!(optional_url(None), Ok(None));
        assert_eq!(optional_url(Some("  ")), Ok(None));
        assert_eq!(
            optional_url(Some("not a url")).unwrap_err().kind,
            FieldErrorKind::InvalidFormat
        );
    }

    #[test]
    fn test_checkbox() {
        assert!(checkbox(Some("y")));
        assert!(checkbox(Some("On")));
        assert!(checkbox(Some("true")));
        assert!(!checkbox(Some("")));
        assert!(!checkbox(Some("n")));
        assert!(!checkbox(None));
    }

    #[test]
    fn test_errors_are_batched_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Name", FieldError::missing());
        errors.add("phone", "Phone", FieldError::invalid_format(MSG_INVALID_PHONE));
        errors.add("phone", "Phone", FieldError::invalid_format("Too short."));

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("phone").len(), 2);
        assert_eq!(errors.kind_of("name"), Some(FieldErrorKind::MissingField));
        assert_eq!(
            errors.summary(),
            "Name: This field is required.; Phone: Invalid phone number., Too short."
        );

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["phone"][1], "Too short.");
    }

    #[test]
    fn test_finish() {
        let ok: Result<i32, _> = ValidationErrors::new().finish(|| 7);
        assert_eq!(ok, Ok(7));

        let mut errors = ValidationErrors::new();
        errors.add("city", "City", FieldError::missing());
        assert!(errors.finish(|| 7).is_err());
    }
}
