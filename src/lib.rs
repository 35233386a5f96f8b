//! # Birdwatch Core
//!
//! Local storage and progression engine for a birdwatching mobile app, exposed
//! through a C-compatible FFI for Flutter and other cross-platform front ends.
//! Built on LMDB (Lightning Memory-Mapped Database).
//!
//! ## What lives here
//!
//! - **Collections**: user-named groups of bird sightings, stored as one JSON list
//! - **Stats**: monotone activity counters fed by [`stats::ActivityEvent`]s
//! - **Unlocks**: twelve one-time achievements that grant gallery birds, each
//!   bird delivered to the UI exactly once
//! - **Quiz**: timed trivia rounds that produce `QUIZ_FINISHED` events
//! - **Reset**: full data wipe plus a generation counter screens can poll
//!
//! Rendering, navigation and image picking stay in the host app. It calls into
//! this library after each user action and displays the returned unlocks one
//! at a time.
//!
//! ## Quick Start
//!
//! ```no_run
//! use birdwatch_core::{create_db, record_event, free_c_string};
//! use std::ffi::CString;
//!
//! let db_name = CString::new("birdwatch").unwrap();
//! let state = create_db(db_name.as_ptr());
//!
//! let event = CString::new(r#"{"type":"OBS_SAVED","collectionId":"c1","hasPhoto":true}"#).unwrap();
//! let response = record_event(state, event.as_ptr());
//! free_c_string(response as *mut _);
//! ```
//!
//! ## FFI Functions
//!
//! Apart from the two constructors, every function returns an [`AppResponse`]
//! serialized as JSON. Strings handed back must be released with
//! [`free_c_string`].
//!
//! - [`create_db`] / [`create_db_with_config`] - Open the database
//! - [`record_event`] - Apply an activity event, returns new unlocks
//! - [`get_stats`], [`get_unlocked_keys`], [`get_unlocked_bird_ids`], [`get_unlocked_birds`]
//! - [`load_collections`] / [`save_collections`] - Full list read / replace
//! - [`create_collection`], [`save_observation`], [`delete_collection`], [`delete_note`]
//! - [`reset_all_data`] / [`get_reset_generation`]
//! - [`close_database`] - Release the database handle

pub mod collections_store;
pub mod config;
pub mod error;
pub mod kv_store;
pub mod local_db_model;
pub mod local_db_state;
pub mod progression;
pub mod question_bank;
pub mod quiz;
pub mod stats;
pub mod unlock_catalog;
pub mod unlock_evaluator;
mod app_response;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use log::{info, warn};
use serde::Serialize;

pub use crate::app_response::AppResponse;
use crate::config::DbConfig;
use crate::local_db_model::{Collection, CollectionDraft, NoteDraft};
use crate::local_db_state::AppDbState;
use crate::progression::Progression;
use crate::stats::ActivityEvent;

/// Handle owned by the host app between [`create_db`] and [`close_database`].
pub type BirdwatchState = Progression<AppDbState>;

/// Opens (or creates) the database `<name>.lmdb` with default settings.
///
/// # Returns
///
/// A pointer to the state on success, null if the name is null, not UTF-8, or
/// the environment cannot be opened.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_db(name: *const c_char) -> *mut BirdwatchState {
    if name.is_null() {
        warn!("Null name pointer passed to create_db");
        return std::ptr::null_mut();
    }

    let name_str = match unsafe { CStr::from_ptr(name).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in name parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    open_state(&DbConfig::named(name_str))
}

/// Opens the database described by a JSON [`DbConfig`].
///
/// Missing fields fall back to their defaults, so `{"name":"birds"}` is valid.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_db_with_config(config_json: *const c_char) -> *mut BirdwatchState {
    if config_json.is_null() {
        warn!("Null config pointer passed to create_db_with_config");
        return std::ptr::null_mut();
    }

    let json = match unsafe { CStr::from_ptr(config_json).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in config parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    match serde_json::from_str::<DbConfig>(json) {
        Ok(config) => open_state(&config),
        Err(e) => {
            warn!("Invalid database config: {e}");
            std::ptr::null_mut()
        }
    }
}

fn open_state(config: &DbConfig) -> *mut BirdwatchState {
    info!("Attempting to create/open database at: {}", config.env_dir());

    match AppDbState::with_config(config) {
        Ok(db) => {
            info!("✅ Database initialized successfully");
            Box::into_raw(Box::new(Progression::new(db)))
        }
        Err(e) => {
            warn!("❌ Failed to initialize database: {e}");
            warn!("Attempted path: {}", config.env_dir());
            std::ptr::null_mut()
        }
    }
}

/// Applies an activity event and returns the newly unlocked birds.
///
/// # JSON Format
///
/// ```json
/// {"type": "COLLECTION_CREATED"}
/// {"type": "OBS_SAVED", "collectionId": "col_1", "hasPhoto": true, "hasLocation": false}
/// {"type": "QUIZ_FINISHED", "score": 8, "total": 10}
/// ```
///
/// On success the `Ok` payload is a JSON array of unlocks, in the order they
/// should be shown.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn record_event(state: *mut BirdwatchState, event_json: *const c_char) -> *const c_char {
    let state = match state_ref(state, "record_event") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let json = match c_ptr_to_string(event_json, "event") {
        Ok(json) => json,
        Err(err) => return err,
    };

    let event: ActivityEvent = match serde_json::from_str(&json) {
        Ok(event) => event,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid event JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    result_to_c_string(state.record_event(&event))
}

/// Current stats record (all zero before any activity).
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_stats(state: *mut BirdwatchState) -> *const c_char {
    match state_ref(state, "get_stats") {
        Ok(s) => result_to_c_string(s.stats()),
        Err(err) => err,
    }
}

/// Every unlock key granted so far.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_unlocked_keys(state: *mut BirdwatchState) -> *const c_char {
    match state_ref(state, "get_unlocked_keys") {
        Ok(s) => result_to_c_string(s.unlocked_keys()),
        Err(err) => err,
    }
}

/// Ids of every bird unlocked so far, in unlock order.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_unlocked_bird_ids(state: *mut BirdwatchState) -> *const c_char {
    match state_ref(state, "get_unlocked_bird_ids") {
        Ok(s) => result_to_c_string(s.unlocked_cosmetic_ids()),
        Err(err) => err,
    }
}

/// Full descriptors of every bird unlocked so far.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_unlocked_birds(state: *mut BirdwatchState) -> *const c_char {
    match state_ref(state, "get_unlocked_birds") {
        Ok(s) => result_to_c_string(s.unlocked_cosmetic_items()),
        Err(err) => err,
    }
}

/// All collections with their notes; an empty array if nothing is stored.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn load_collections(state: *mut BirdwatchState) -> *const c_char {
    match state_ref(state, "load_collections") {
        Ok(s) => result_to_c_string(s.load_collections()),
        Err(err) => err,
    }
}

/// Replaces the stored collection list with the given JSON array.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn save_collections(state: *mut BirdwatchState, json_ptr: *const c_char) -> *const c_char {
    let state = match state_ref(state, "save_collections") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let json = match c_ptr_to_string(json_ptr, "collections") {
        Ok(json) => json,
        Err(err) => return err,
    };

    let collections: Vec<Collection> = match serde_json::from_str(&json) {
        Ok(list) => list,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid collections JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    match state.save_collections(&collections) {
        Ok(()) => response_to_c_string(&AppResponse::success(format!(
            "{} collections saved",
            collections.len()
        ))),
        Err(e) => response_to_c_string(&AppResponse::from(e)),
    }
}

/// Creates a collection from `{"title":..., "tag":..., "coverUri":...}`.
///
/// The `Ok` payload is `{"item": <collection>, "unlocks": [...]}`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_collection(state: *mut BirdwatchState, json_ptr: *const c_char) -> *const c_char {
    let state = match state_ref(state, "create_collection") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let json = match c_ptr_to_string(json_ptr, "collection") {
        Ok(json) => json,
        Err(err) => return err,
    };

    let draft: CollectionDraft = match serde_json::from_str(&json) {
        Ok(draft) => draft,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid collection JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    result_to_c_string(state.create_collection(draft))
}

/// Saves a sighting `{"title":..., "location":..., "tag":..., "photoUri":...}`
/// into the given collection.
///
/// The `Ok` payload is `{"item": <note>, "unlocks": [...]}`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn save_observation(
    state: *mut BirdwatchState,
    collection_id: *const c_char,
    json_ptr: *const c_char,
) -> *const c_char {
    let state = match state_ref(state, "save_observation") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let collection_id = match c_ptr_to_string(collection_id, "collection id") {
        Ok(id) => id,
        Err(err) => return err,
    };

    let json = match c_ptr_to_string(json_ptr, "note") {
        Ok(json) => json,
        Err(err) => return err,
    };

    let draft: NoteDraft = match serde_json::from_str(&json) {
        Ok(draft) => draft,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid note JSON: {e}"));
            return response_to_c_string(&error);
        }
    };

    result_to_c_string(state.save_observation(&collection_id, draft))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn delete_collection(state: *mut BirdwatchState, collection_id: *const c_char) -> *const c_char {
    let state = match state_ref(state, "delete_collection") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let collection_id = match c_ptr_to_string(collection_id, "collection id") {
        Ok(id) => id,
        Err(err) => return err,
    };

    match state.delete_collection(&collection_id) {
        Ok(()) => response_to_c_string(&AppResponse::success("Collection deleted successfully")),
        Err(e) => response_to_c_string(&AppResponse::from(e)),
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn delete_note(
    state: *mut BirdwatchState,
    collection_id: *const c_char,
    note_id: *const c_char,
) -> *const c_char {
    let state = match state_ref(state, "delete_note") {
        Ok(s) => s,
        Err(err) => return err,
    };

    let collection_id = match c_ptr_to_string(collection_id, "collection id") {
        Ok(id) => id,
        Err(err) => return err,
    };

    let note_id = match c_ptr_to_string(note_id, "note id") {
        Ok(id) => id,
        Err(err) => return err,
    };

    match state.delete_note(&collection_id, &note_id) {
        Ok(()) => response_to_c_string(&AppResponse::success("Note deleted successfully")),
        Err(e) => response_to_c_string(&AppResponse::from(e)),
    }
}

/// Wipes collections, stats and unlocks. The `Ok` payload is the new reset
/// generation.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn reset_all_data(state: *mut BirdwatchState) -> *const c_char {
    match state_ref(state, "reset_all_data") {
        Ok(s) => result_to_c_string(s.reset_all_data()),
        Err(err) => err,
    }
}

/// Screens poll this and reload from scratch whenever it changes.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_reset_generation(state: *mut BirdwatchState) -> *const c_char {
    match state_ref(state, "get_reset_generation") {
        Ok(s) => result_to_c_string(s.reset_generation()),
        Err(err) => err,
    }
}

/// Flushes and releases the database. The pointer must not be used afterwards.
///
/// Useful before a Flutter hot restart, when the next `create_db` must be able
/// to reopen the same environment.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_database(state: *mut BirdwatchState) -> *const c_char {
    if state.is_null() {
        let error = AppResponse::BadRequest("Null state pointer passed to close_database".to_string());
        return response_to_c_string(&error);
    }

    let state = unsafe { Box::from_raw(state) };

    match state.into_store().close_database() {
        Ok(()) => response_to_c_string(&AppResponse::success("Database connection closed successfully")),
        Err(e) => response_to_c_string(&AppResponse::from(e)),
    }
}

/// Releases a string returned by any function of this library.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_c_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(ptr) });
}

fn state_ref<'a>(state: *mut BirdwatchState, fn_name: &str) -> Result<&'a BirdwatchState, *const c_char> {
    match unsafe { state.as_ref() } {
        Some(s) => Ok(s),
        None => {
            let error = AppResponse::BadRequest(format!("Null state pointer passed to {fn_name}"));
            Err(response_to_c_string(&error))
        }
    }
}

/// Serializes a successful value into `Ok(<json>)`, or the error into its
/// matching [`AppResponse`] variant.
fn result_to_c_string<T, E>(result: Result<T, E>) -> *const c_char
where
    T: Serialize,
    E: Into<AppResponse>,
{
    let response = match result {
        Ok(value) => match serde_json::to_string(&value) {
            Ok(json) => AppResponse::Ok(json),
            Err(e) => AppResponse::SerializationError(format!("Failed to serialize result: {e}")),
        },
        Err(e) => e.into(),
    };
    response_to_c_string(&response)
}

/// Converts an [`AppResponse`] to a C string owned by the caller.
///
/// Returns a null pointer if serialization or C string creation fails.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

/// Converts a C string pointer to a Rust `String`, answering null pointers and
/// invalid UTF-8 with a ready-made `BadRequest` response.
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}
