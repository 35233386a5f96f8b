//! Turns updated [`Stats`] into newly granted unlocks.
//!
//! Granting is gated twice. First the unlock key itself is test-and-set in the
//! unlocked-keys record; a key that was already there yields nothing. Then
//! every bird of the key is test-and-set in the unlocked-birds record, and only
//! birds seen for the first time produce a payload. A bird shared by several
//! unlocks is therefore announced once, by whichever unlock fires first.
//!
//! The two records are written separately. A crash after the key write and
//! before the bird write loses that bird for good, because the key gate then
//! blocks any retry.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::kv_store::{keys, load_json_or_default, save_json, KeyValueStore};
use crate::stats::{ActivityEvent, Stats};
use crate::unlock_catalog::{self, lookup_cosmetic, CosmeticItem, UnlockKey};

/// One bird unlocked for the first time, ready for the UI to present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockPayload {
    pub key: UnlockKey,
    pub title: String,
    pub cosmetic_item: CosmeticItem,
}

type Rule = fn(&Stats, &ActivityEvent) -> bool;

/// Threshold rules in evaluation order. The order only decides the order of
/// the returned payloads.
const RULES: [(UnlockKey, Rule); 12] = [
    (UnlockKey::FirstBirdLogged, |s, _| s.first_bird_logged),
    (UnlockKey::ThreeBirdsStarted, |s, _| s.collections_created >= 3),
    (UnlockKey::TenTotalObs, |s, _| s.observations_total >= 10),
    (UnlockKey::TwentyfiveTotalObs, |s, _| s.observations_total >= 25),
    (UnlockKey::OnePhotoAdded, |s, _| s.photo_added_once),
    (UnlockKey::OneLocationPinned, |s, _| s.location_pinned_once),
    (UnlockKey::FirstQuizDone, |s, _| s.first_quiz_done),
    (UnlockKey::ThreeQuizSessions, |s, _| s.quiz_sessions >= 3),
    (UnlockKey::Perfect10Of10, |_, e| {
        matches!(e, ActivityEvent::QuizFinished { score: 10, total: 10 })
    }),
    (UnlockKey::EightOfTen, |_, e| match e {
        ActivityEvent::QuizFinished { score, total } => {
            *total > 0 && f64::from(*score) / f64::from(*total) >= 0.8
        }
        _ => false,
    }),
    (UnlockKey::FiveInOneNest, |s, _| s.max_in_one_collection() >= 5),
    (UnlockKey::FiveCollectionsFilled, |s, _| s.collections_with_observations() >= 5),
];

/// Keys whose rule holds for `stats` and `event`, in rule order.
///
/// Pure; says nothing about whether a key was granted before.
pub fn satisfied_rules(stats: &Stats, event: &ActivityEvent) -> Vec<UnlockKey> {
    RULES
        .iter()
        .filter(|(_, rule)| rule(stats, event))
        .map(|(key, _)| *key)
        .collect()
}

pub struct UnlockEvaluator<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> UnlockEvaluator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Checks all rules and grants what is new.
    ///
    /// Any storage failure aborts the evaluation; payloads granted before the
    /// failure are persisted but not returned.
    pub fn evaluate(&self, stats: &Stats, event: &ActivityEvent) -> StoreResult<Vec<UnlockPayload>> {
        let mut payloads = Vec::new();
        for key in satisfied_rules(stats, event) {
            payloads.extend(self.grant(key)?);
        }
        Ok(payloads)
    }

    /// Grants `key` if it was never granted and returns one payload per bird
    /// delivered for the first time.
    pub fn grant(&self, key: UnlockKey) -> StoreResult<Vec<UnlockPayload>> {
        if !self.insert_member(keys::UNLOCKED_KEYS, key.as_str())? {
            return Ok(Vec::new());
        }

        let entry = unlock_catalog::lookup(key);
        info!("Unlock granted: {key}");

        let mut payloads = Vec::new();
        for cosmetic_id in entry.cosmetic_ids {
            if self.insert_member(keys::UNLOCKED_BIRDS, cosmetic_id)? {
                payloads.push(UnlockPayload {
                    key,
                    title: entry.title.to_string(),
                    cosmetic_item: lookup_cosmetic(cosmetic_id),
                });
            }
        }
        Ok(payloads)
    }

    pub fn unlocked_keys(&self) -> StoreResult<Vec<UnlockKey>> {
        let raw: Vec<String> = load_json_or_default(self.store, keys::UNLOCKED_KEYS)?;
        Ok(raw
            .iter()
            .filter_map(|s| match s.parse::<UnlockKey>() {
                Ok(key) => Some(key),
                Err(e) => {
                    warn!("Ignoring stored unlock key: {e}");
                    None
                }
            })
            .collect())
    }

    pub fn unlocked_cosmetic_ids(&self) -> StoreResult<Vec<String>> {
        load_json_or_default(self.store, keys::UNLOCKED_BIRDS)
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.store.remove(keys::UNLOCKED_KEYS)?;
        self.store.remove(keys::UNLOCKED_BIRDS)
    }

    /// Adds `member` to the JSON string set under `record`. `false` if present.
    fn insert_member(&self, record: &str, member: &str) -> StoreResult<bool> {
        let mut members: Vec<String> = load_json_or_default(self.store, record)?;
        if members.iter().any(|m| m == member) {
            return Ok(false);
        }
        members.push(member.to_string());
        save_json(self.store, record, &members)?;
        Ok(true)
    }
}
