//! Persisted data models: collections and the sightings (notes) inside them.
//!
//! The JSON layout keeps the field names the mobile app has always written
//! (`createdAtISO`, `dateISO`, `coverUri`, ...), so data saved by older builds
//! still loads.
//!
//! ```rust
//! use birdwatch_core::local_db_model::{Collection, NoteDraft};
//!
//! let mut collection = Collection::new("Backyard", Some("spring"), None)?;
//! let note = NoteDraft {
//!     title: "  Robin ".to_string(),
//!     location: Some("Oak tree".to_string()),
//!     ..NoteDraft::default()
//! }
//! .into_note()?;
//!
//! assert_eq!(note.title, "Robin");
//! collection.notes.insert(0, note);
//! # Ok::<(), birdwatch_core::error::AppError>(())
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A single logged bird encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    /// Bird name. Never empty for notes created through [`NoteDraft`].
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(rename = "dateISO")]
    pub date_iso: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_uri: Option<String>,
}

impl Note {
    pub fn has_photo(&self) -> bool {
        self.photo_uri.as_deref().is_some_and(|uri| !uri.is_empty())
    }

    pub fn has_location(&self) -> bool {
        self.location.as_deref().is_some_and(|loc| !loc.trim().is_empty())
    }
}

/// Raw user input for a new sighting, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NoteDraft {
    pub title: String,
    pub location: Option<String>,
    pub tag: Option<String>,
    pub photo_uri: Option<String>,
}

impl NoteDraft {
    /// Trims every field, drops blank optional ones and stamps the capture time.
    pub fn into_note(self) -> AppResult<Note> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("Bird name is required".to_string()));
        }

        Ok(Note {
            id: uid("note"),
            title,
            location: non_blank(self.location),
            tag: non_blank(self.tag),
            date_iso: now_iso(),
            photo_uri: non_blank(self.photo_uri),
        })
    }
}

/// A user-named group of sightings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_uri: Option<String>,
    #[serde(rename = "createdAtISO")]
    pub created_at_iso: String,
    /// Most recent first.
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pinned: bool,
}

impl Collection {
    pub fn new(title: &str, tag: Option<&str>, cover_uri: Option<&str>) -> AppResult<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Collection title is required".to_string()));
        }

        Ok(Self {
            id: uid("col"),
            title: title.to_string(),
            tag: non_blank(tag.map(str::to_string)),
            cover_uri: non_blank(cover_uri.map(str::to_string)),
            created_at_iso: now_iso(),
            notes: Vec::new(),
            pinned: false,
        })
    }
}

/// Fields accepted when creating a collection over FFI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionDraft {
    pub title: String,
    pub tag: Option<String>,
    pub cover_uri: Option<String>,
}

impl CollectionDraft {
    pub fn into_collection(self) -> AppResult<Collection> {
        Collection::new(&self.title, self.tag.as_deref(), self.cover_uri.as_deref())
    }
}

/// `<prefix>_<random hex>_<unix millis>`; unique for all practical purposes.
pub fn uid(prefix: &str) -> String {
    let random: u64 = rand::thread_rng().gen();
    format!("{prefix}_{random:x}_{}", Utc::now().timestamp_millis())
}

/// Current UTC time as RFC 3339 with millisecond precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Formats an ISO timestamp as `dd.mm.yy` in the timestamp's own offset.
pub fn format_short_date(iso: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(iso)
        .ok()
        .map(|date| date.format("%d.%m.%y").to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
