//! LMDB-backed implementation of [`KeyValueStore`].
//!
//! The environment lives in a `<name>.lmdb` directory and holds a single named
//! database. Every `set`/`remove` runs in its own write transaction, so a
//! record is either fully replaced or left untouched.

use std::path::{Path, PathBuf};

use lmdb::{Database, DatabaseFlags, Environment, Error as LmdbError, Transaction, WriteFlags};
use log::{debug, info};

use crate::config::DbConfig;
use crate::error::{StoreError, StoreResult};
use crate::kv_store::KeyValueStore;

const DB_NAME: &str = "birdwatch";

pub struct AppDbState {
    env: Environment,
    db: Database,
    path: PathBuf,
}

impl AppDbState {
    /// Opens (or creates) `<name>.lmdb` with default settings.
    pub fn init(name: String) -> StoreResult<Self> {
        Self::with_config(&DbConfig::named(name))
    }

    pub fn with_config(config: &DbConfig) -> StoreResult<Self> {
        let path = PathBuf::from(config.env_dir());
        std::fs::create_dir_all(&path)?;

        let env = Environment::new()
            .set_max_dbs(1)
            .set_map_size(config.map_size)
            .set_max_readers(config.max_readers)
            .open(&path)?;

        let db = env.create_db(Some(DB_NAME), DatabaseFlags::empty())?;

        info!("LMDB environment opened at {}", path.display());
        Ok(Self { env, db, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes buffers to disk and releases the environment.
    pub fn close_database(self) -> StoreResult<()> {
        self.env.sync(true)?;
        info!("LMDB environment at {} closed", self.path.display());
        Ok(())
    }
}

impl KeyValueStore for AppDbState {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let txn = self.env.begin_ro_txn()?;

        let value = match txn.get(self.db, &key) {
            Ok(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => Some(text.to_string()),
                Err(_) => {
                    return Err(StoreError::InvalidUtf8 {
                        key: key.to_string(),
                    })
                }
            },
            Err(LmdbError::NotFound) => None,
            Err(e) => return Err(e.into()),
        };

        txn.commit()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        debug!("Stored {} bytes under '{key}'", value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut txn = self.env.begin_rw_txn()?;
        match txn.del(self.db, &key, None) {
            Ok(()) => {}
            Err(LmdbError::NotFound) => {
                txn.abort();
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
        txn.commit()?;
        debug!("Removed '{key}'");
        Ok(())
    }
}
