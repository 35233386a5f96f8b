//! Cumulative activity counters and the events that drive them.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::kv_store::{keys, load_json_or_default, save_json, KeyValueStore};

/// Something the user just did.
///
/// Serialized with a `type` tag so the host app can send
/// `{"type":"OBS_SAVED","collectionId":"c1","hasPhoto":true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActivityEvent {
    #[serde(rename = "COLLECTION_CREATED")]
    CollectionCreated,

    #[serde(rename = "OBS_SAVED", rename_all = "camelCase")]
    ObservationSaved {
        collection_id: String,
        #[serde(default)]
        has_photo: bool,
        #[serde(default)]
        has_location: bool,
    },

    #[serde(rename = "QUIZ_FINISHED")]
    QuizFinished { score: u32, total: u32 },
}

/// Persisted progression counters.
///
/// Counters only grow and flags only go from `false` to `true`; the only way
/// back to zero is a full data reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub collections_created: u32,
    pub observations_total: u32,
    pub observations_by_collection: BTreeMap<String, u32>,
    pub quiz_sessions: u32,
    pub first_quiz_done: bool,
    pub first_bird_logged: bool,
    pub photo_added_once: bool,
    pub location_pinned_once: bool,
}

impl Stats {
    /// Applies exactly the fields implicated by `event`.
    pub fn apply(&mut self, event: &ActivityEvent) {
        match event {
            ActivityEvent::CollectionCreated => {
                self.collections_created = self.collections_created.saturating_add(1);
            }
            ActivityEvent::ObservationSaved {
                collection_id,
                has_photo,
                has_location,
            } => {
                self.observations_total = self.observations_total.saturating_add(1);
                let count = self
                    .observations_by_collection
                    .entry(collection_id.clone())
                    .or_insert(0);
                *count = count.saturating_add(1);

                self.first_bird_logged = true;
                self.photo_added_once |= *has_photo;
                self.location_pinned_once |= *has_location;
            }
            ActivityEvent::QuizFinished { .. } => {
                self.quiz_sessions = self.quiz_sessions.saturating_add(1);
                self.first_quiz_done = true;
            }
        }
    }

    /// Largest per-collection observation count, 0 when nothing was logged.
    pub fn max_in_one_collection(&self) -> u32 {
        self.observations_by_collection
            .values()
            .copied()
            .max()
            .unwrap_or(0)
    }

    pub fn collections_with_observations(&self) -> usize {
        self.observations_by_collection
            .values()
            .filter(|&&count| count >= 1)
            .count()
    }
}

/// Loads, mutates and persists [`Stats`].
pub struct StatsAggregator<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> StatsAggregator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn load(&self) -> StoreResult<Stats> {
        load_json_or_default(self.store, keys::STATS)
    }

    pub fn apply_event(&self, event: &ActivityEvent) -> StoreResult<Stats> {
        let mut stats = self.load()?;
        stats.apply(event);
        save_json(self.store, keys::STATS, &stats)?;
        debug!("Stats after {event:?}: {stats:?}");
        Ok(stats)
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.store.remove(keys::STATS)
    }
}
