//! Database configuration.
//!
//! The host app usually only passes a database name; the FFI also accepts a
//! JSON document so the map size and reader slots can be tuned per platform.
//!
//! ```json
//! { "name": "birdwatch", "map_size": 10485760, "max_readers": 126 }
//! ```

use serde::{Deserialize, Serialize};

/// 10 MiB is far beyond what collections and progression state need.
pub const DEFAULT_MAP_SIZE: usize = 10 * 1024 * 1024;
pub const DEFAULT_MAX_READERS: u32 = 126;
pub const DEFAULT_DB_NAME: &str = "birdwatch";

/// Settings used to open the LMDB environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Path prefix of the environment; the directory is `<name>.lmdb`.
    pub name: String,
    pub map_size: usize,
    pub max_readers: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_DB_NAME.to_string(),
            map_size: DEFAULT_MAP_SIZE,
            max_readers: DEFAULT_MAX_READERS,
        }
    }
}

impl DbConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Directory LMDB opens for this configuration.
    pub fn env_dir(&self) -> String {
        format!("{}.lmdb", self.name)
    }
}
