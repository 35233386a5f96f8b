//! Persistence and list operations for user collections.
//!
//! The whole list is stored as one JSON array; [`CollectionsStore::save`]
//! replaces it in a single write. Read-modify-write sequencing is up to the
//! caller (see [`crate::progression::Progression`], which serializes them).

use log::{info, warn};

use crate::error::{AppError, AppResult, StoreResult};
use crate::kv_store::{keys, load_json_or_default, save_json, KeyValueStore};
use crate::local_db_model::{now_iso, uid, Collection, Note};

/// Titles of the collections every user starts with.
pub const PRESET_TITLES: [&str; 6] = [
    "Common Birds",
    "Water & Wetland Birds",
    "Birds of Prey",
    "Farm & Familiar Birds",
    "Exotic & Symbolic Birds",
    "Night & Forest",
];

pub struct CollectionsStore<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> CollectionsStore<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Empty when nothing was saved yet or the saved list is unreadable.
    pub fn load(&self) -> StoreResult<Vec<Collection>> {
        load_json_or_default(self.store, keys::COLLECTIONS)
    }

    pub fn save(&self, collections: &[Collection]) -> StoreResult<()> {
        save_json(self.store, keys::COLLECTIONS, collections)?;
        info!("Saved {} collections", collections.len());
        Ok(())
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.store.remove(keys::COLLECTIONS)
    }
}

/// Puts `note` at the front of the collection's notes.
pub fn add_note(collections: &mut [Collection], collection_id: &str, note: Note) -> AppResult<()> {
    let collection = collections
        .iter_mut()
        .find(|c| c.id == collection_id)
        .ok_or_else(|| AppError::NotFound(format!("No collection with id: {collection_id}")))?;

    collection.notes.insert(0, note);
    Ok(())
}

pub fn delete_collection(collections: &mut Vec<Collection>, collection_id: &str) -> bool {
    let before = collections.len();
    collections.retain(|c| c.id != collection_id);
    collections.len() != before
}

pub fn delete_note(collections: &mut [Collection], collection_id: &str, note_id: &str) -> bool {
    let Some(collection) = collections.iter_mut().find(|c| c.id == collection_id) else {
        warn!("delete_note: unknown collection {collection_id}");
        return false;
    };

    let before = collection.notes.len();
    collection.notes.retain(|n| n.id != note_id);
    collection.notes.len() != before
}

/// Flips the pinned flag and returns the new value.
pub fn toggle_pin(collections: &mut [Collection], collection_id: &str) -> Option<bool> {
    let collection = collections.iter_mut().find(|c| c.id == collection_id)?;
    collection.pinned = !collection.pinned;
    Some(collection.pinned)
}

/// Prepends preset collections whose titles are missing from `existing`.
///
/// Titles are compared trimmed and case-insensitively. Returns the input
/// unchanged when every preset is already present.
pub fn ensure_presets(existing: Vec<Collection>) -> Vec<Collection> {
    let missing: Vec<Collection> = PRESET_TITLES
        .iter()
        .filter(|preset| {
            let preset = normalize(preset);
            !existing.iter().any(|c| normalize(&c.title) == preset)
        })
        .map(|title| Collection {
            id: uid("col"),
            title: (*title).to_string(),
            tag: None,
            cover_uri: None,
            created_at_iso: now_iso(),
            notes: Vec::new(),
            pinned: false,
        })
        .collect();

    if missing.is_empty() {
        return existing;
    }

    missing.into_iter().chain(existing).collect()
}

/// Case-insensitive title search, pinned collections first.
pub fn filter_collections<'c>(collections: &'c [Collection], query: &str) -> Vec<&'c Collection> {
    let query = normalize(query);
    let mut hits: Vec<&Collection> = collections
        .iter()
        .filter(|c| query.is_empty() || normalize(&c.title).contains(&query))
        .collect();

    // stable: keeps the stored order inside each group
    hits.sort_by_key(|c| !c.pinned);
    hits
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
