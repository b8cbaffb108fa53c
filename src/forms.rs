//! Form validation layer
//!
//! Validates and normalizes user-submitted fields before they reach the
//! store. Validation never touches the database; referential checks for the
//! show form happen in the handlers.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed genre vocabulary for the multi-select fields.
pub const GENRES: &[&str] = &[
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

/// US state and territory codes accepted by the state select.
pub const STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3}-\d{3}-\d{4}$").unwrap());

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Default, Serialize)]
pub struct ValidationErrors {
    #[serde(flatten)]
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn require(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("{} is required", field));
    }
}

fn check_state(errors: &mut ValidationErrors, value: &str) {
    if !value.trim().is_empty() && !STATES.contains(&value) {
        errors.add("state", format!("{} is not a recognized state", value));
    }
}

fn check_genres(errors: &mut ValidationErrors, genres: &[String]) {
    for genre in genres {
        if !GENRES.contains(&genre.as_str()) {
            errors.add("genres", format!("{} is not a recognized genre", genre));
        }
    }
}

fn check_phone(errors: &mut ValidationErrors, phone: &Option<String>) {
    if let Some(phone) = phone {
        if !phone.is_empty() && !PHONE_RE.is_match(phone) {
            errors.add("phone", "phone must use the format 123-456-7890");
        }
    }
}

fn check_url(errors: &mut ValidationErrors, field: &str, value: &Option<String>) {
    if let Some(value) = value {
        if !value.is_empty() && url::Url::parse(value).is_err() {
            errors.add(field, format!("{} must be a valid URL", field));
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VenueForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub website_link: Option<String>,
    #[serde(default)]
    pub seeking_talent: bool,
    #[serde(default)]
    pub seeking_description: Option<String>,
}

impl VenueForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        require(&mut errors, "name", &self.name);
        require(&mut errors, "city", &self.city);
        require(&mut errors, "state", &self.state);
        require(&mut errors, "address", &self.address);
        check_state(&mut errors, &self.state);
        check_genres(&mut errors, &self.genres);
        check_phone(&mut errors, &self.phone);
        check_url(&mut errors, "image_link", &self.image_link);
        check_url(&mut errors, "facebook_link", &self.facebook_link);
        check_url(&mut errors, "website_link", &self.website_link);

        errors.into_result()
    }

    /// Explicit typed mapping used to populate the edit form from a record.
    pub fn from_model(model: &crate::models::venue::Model) -> Self {
        Self {
            name: model.name.clone(),
            city: model.city.clone(),
            state: model.state.clone(),
            address: model.address.clone(),
            phone: model.phone.clone(),
            genres: deserialize_genres(&model.genres),
            image_link: model.image_link.clone(),
            facebook_link: model.facebook_link.clone(),
            website_link: model.website_link.clone(),
            seeking_talent: model.seeking_talent,
            seeking_description: model.seeking_description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtistForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub image_link: Option<String>,
    #[serde(default)]
    pub facebook_link: Option<String>,
    #[serde(default)]
    pub website_link: Option<String>,
    #[serde(default)]
    pub seeking_venue: bool,
    #[serde(default)]
    pub seeking_description: Option<String>,
}

impl ArtistForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        require(&mut errors, "name", &self.name);
        require(&mut errors, "city", &self.city);
        require(&mut errors, "state", &self.state);
        check_state(&mut errors, &self.state);
        check_genres(&mut errors, &self.genres);
        check_phone(&mut errors, &self.phone);
        check_url(&mut errors, "image_link", &self.image_link);
        check_url(&mut errors, "facebook_link", &self.facebook_link);
        check_url(&mut errors, "website_link", &self.website_link);

        errors.into_result()
    }

    pub fn from_model(model: &crate::models::artist::Model) -> Self {
        Self {
            name: model.name.clone(),
            city: model.city.clone(),
            state: model.state.clone(),
            phone: model.phone.clone(),
            genres: deserialize_genres(&model.genres),
            image_link: model.image_link.clone(),
            facebook_link: model.facebook_link.clone(),
            website_link: model.website_link.clone(),
            seeking_venue: model.seeking_venue,
            seeking_description: model.seeking_description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShowForm {
    #[serde(default)]
    pub artist_id: Option<i32>,
    #[serde(default)]
    pub venue_id: Option<i32>,
    #[serde(default)]
    pub start_time: String,
}

impl ShowForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.artist_id.is_none() {
            errors.add("artist_id", "artist_id is required");
        }
        if self.venue_id.is_none() {
            errors.add("venue_id", "venue_id is required");
        }
        if self.start_time.trim().is_empty() {
            errors.add("start_time", "start_time is required");
        } else if self.start_time_utc().is_none() {
            errors.add("start_time", "start_time must be an RFC 3339 timestamp");
        }

        errors.into_result()
    }

    /// Parsed start time, normalized to UTC.
    pub fn start_time_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.start_time)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Serialize a genre list for storage as a JSON array.
pub fn serialize_genres(genres: &[String]) -> Option<String> {
    if genres.is_empty() {
        None
    } else {
        serde_json::to_string(genres).ok()
    }
}

/// Deserialize stored genres; absent or malformed text yields an empty list.
pub fn deserialize_genres(genres: &Option<String>) -> Vec<String> {
    genres
        .as_deref()
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default()
}
