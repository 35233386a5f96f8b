//! Entry point the UI layer talks to.
//!
//! [`Progression`] owns a [`KeyValueStore`] and runs every user action as one
//! sequential pipeline: load stats, apply the event, persist, evaluate unlocks.
//! A process-local gate lets only one pipeline run at a time so two overlapping
//! events cannot clobber each other's writes. Writers in other processes are
//! not coordinated.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::collections_store::{self, CollectionsStore};
use crate::error::{AppError, AppResult, StoreResult};
use crate::kv_store::{keys, KeyValueStore};
use crate::local_db_model::{Collection, CollectionDraft, Note, NoteDraft};
use crate::stats::{ActivityEvent, Stats, StatsAggregator};
use crate::unlock_catalog::{lookup_cosmetic, CosmeticItem, UnlockKey};
use crate::unlock_evaluator::{UnlockEvaluator, UnlockPayload};

/// Result of a user action that may also have unlocked something.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome<T> {
    pub item: T,
    pub unlocks: Vec<UnlockPayload>,
}

pub struct Progression<S: KeyValueStore> {
    store: S,
    gate: Mutex<()>,
}

impl<S: KeyValueStore> Progression<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            gate: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Applies `event` to the stats and returns every bird unlocked for the
    /// first time, in rule order.
    pub fn record_event(&self, event: &ActivityEvent) -> StoreResult<Vec<UnlockPayload>> {
        let _guard = self.lock();
        self.record_event_locked(event)
    }

    pub fn stats(&self) -> StoreResult<Stats> {
        StatsAggregator::new(&self.store).load()
    }

    pub fn unlocked_keys(&self) -> StoreResult<Vec<UnlockKey>> {
        UnlockEvaluator::new(&self.store).unlocked_keys()
    }

    pub fn unlocked_cosmetic_ids(&self) -> StoreResult<Vec<String>> {
        UnlockEvaluator::new(&self.store).unlocked_cosmetic_ids()
    }

    pub fn unlocked_cosmetic_items(&self) -> StoreResult<Vec<CosmeticItem>> {
        Ok(self
            .unlocked_cosmetic_ids()?
            .iter()
            .map(|id| lookup_cosmetic(id))
            .collect())
    }

    pub fn load_collections(&self) -> StoreResult<Vec<Collection>> {
        CollectionsStore::new(&self.store).load()
    }

    /// Replaces the whole persisted list.
    pub fn save_collections(&self, collections: &[Collection]) -> StoreResult<()> {
        let _guard = self.lock();
        CollectionsStore::new(&self.store).save(collections)
    }

    /// Creates a collection at the top of the list and counts it.
    pub fn create_collection(&self, draft: CollectionDraft) -> AppResult<ActionOutcome<Collection>> {
        let collection = draft.into_collection()?;

        let _guard = self.lock();
        let store = CollectionsStore::new(&self.store);
        let mut collections = store.load()?;
        collections.insert(0, collection.clone());
        store.save(&collections)?;

        let unlocks = self.record_event_locked(&ActivityEvent::CollectionCreated)?;
        Ok(ActionOutcome {
            item: collection,
            unlocks,
        })
    }

    /// Saves a sighting into `collection_id` and counts it.
    pub fn save_observation(&self, collection_id: &str, draft: NoteDraft) -> AppResult<ActionOutcome<Note>> {
        let note = draft.into_note()?;

        let _guard = self.lock();
        let store = CollectionsStore::new(&self.store);
        let mut collections = store.load()?;
        collections_store::add_note(&mut collections, collection_id, note.clone())?;
        store.save(&collections)?;

        let event = ActivityEvent::ObservationSaved {
            collection_id: collection_id.to_string(),
            has_photo: note.has_photo(),
            has_location: note.has_location(),
        };
        let unlocks = self.record_event_locked(&event)?;
        Ok(ActionOutcome { item: note, unlocks })
    }

    /// Deleting never rolls back stats or unlocks.
    pub fn delete_collection(&self, collection_id: &str) -> AppResult<()> {
        let _guard = self.lock();
        let store = CollectionsStore::new(&self.store);
        let mut collections = store.load()?;
        if !collections_store::delete_collection(&mut collections, collection_id) {
            return Err(AppError::NotFound(format!("No collection with id: {collection_id}")));
        }
        store.save(&collections)?;
        Ok(())
    }

    pub fn delete_note(&self, collection_id: &str, note_id: &str) -> AppResult<()> {
        let _guard = self.lock();
        let store = CollectionsStore::new(&self.store);
        let mut collections = store.load()?;
        if !collections_store::delete_note(&mut collections, collection_id, note_id) {
            return Err(AppError::NotFound(format!(
                "No note {note_id} in collection {collection_id}"
            )));
        }
        store.save(&collections)?;
        Ok(())
    }

    /// Wipes collections, stats and both unlocked sets, then bumps the reset
    /// generation by one.
    pub fn reset_all_data(&self) -> StoreResult<u64> {
        let _guard = self.lock();

        CollectionsStore::new(&self.store).clear()?;
        StatsAggregator::new(&self.store).clear()?;
        UnlockEvaluator::new(&self.store).clear()?;

        let generation = self.reset_generation()?.saturating_add(1);
        self.store
            .set(keys::RESET_GENERATION, &generation.to_string())?;

        info!("All data reset; generation is now {generation}");
        Ok(generation)
    }

    /// Absent or unreadable counter reads as 0.
    pub fn reset_generation(&self) -> StoreResult<u64> {
        let raw = self.store.get(keys::RESET_GENERATION)?;
        Ok(raw
            .as_deref()
            .map(|value| {
                value.trim().parse().unwrap_or_else(|_| {
                    warn!("Unreadable reset generation '{value}', treating as 0");
                    0
                })
            })
            .unwrap_or(0))
    }

    fn record_event_locked(&self, event: &ActivityEvent) -> StoreResult<Vec<UnlockPayload>> {
        let stats = StatsAggregator::new(&self.store).apply_event(event)?;
        let unlocks = UnlockEvaluator::new(&self.store).evaluate(&stats, event)?;
        if !unlocks.is_empty() {
            info!("{} new unlock(s) after {event:?}", unlocks.len());
        }
        Ok(unlocks)
    }

    // The gate protects no data, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
