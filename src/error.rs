//! Error types shared by the storage layer and the progression engine.
//!
//! Two levels exist:
//!
//! - [`StoreError`]: the key-value backend failed (LMDB, I/O, encoding). These are
//!   always propagated to the caller, never swallowed.
//! - [`AppError`]: everything a user action can fail with, including bad input
//!   such as an empty sighting title.
//!
//! Malformed persisted JSON is *not* an error at either level; readers substitute
//! the default value instead (see [`crate::kv_store::load_json_or_default`]).

use thiserror::Error;

/// Failure of the underlying key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("LMDB error: {0}")]
    Lmdb(#[from] lmdb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored value for key '{key}' is not valid UTF-8")]
    InvalidUtf8 { key: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend cannot be reached (poisoned lock, closed environment, injected fault).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a user-facing operation.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
pub type AppResult<T> = Result<T, AppError>;
