//! # Identity Store
//!
//! Where the [`IdentityRecord`] lives between sessions. The wallet holds
//! exactly one record, under the key `user_info`, as a JSON string. It is
//! written once at sign-up or import and read on every balance poll and
//! every send.
//!
//! Two backends:
//!
//! | Backend                | Use                                        |
//! |------------------------|--------------------------------------------|
//! | [`MemoryIdentityStore`]| tests, embedding in a host with its own storage |
//! | [`SledIdentityStore`]  | on-disk wallet for the CLI                 |
//!
//! Callers take `&dyn IdentityStore` (or a generic), never a global.

use std::path::Path;

use parking_lot::RwLock;
use sled::Db;
use thiserror::Error;
use tracing::{debug, info};

use super::record::IdentityRecord;
use crate::config::IDENTITY_RECORD_KEY;

/// Errors from the storage backend itself.
///
/// An absent record is not an error: [`IdentityStore::load`] returns
/// `Ok(None)` and the caller decides what "not signed in" means.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Load/save access to the single identity record.
pub trait IdentityStore: Send + Sync {
    /// The stored record, or `None` if nobody has signed up on this device.
    fn load(&self) -> StoreResult<Option<IdentityRecord>>;

    /// Write the record, replacing any previous one.
    fn save(&self, record: &IdentityRecord) -> StoreResult<()>;

    /// Delete the record. This destroys the keypair for good unless the
    /// user kept the phrase.
    fn clear(&self) -> StoreResult<()>;
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Volatile store. The record is kept as its JSON text so it goes through
/// the same serialization as the on-disk store.
#[derive(Default)]
pub struct MemoryIdentityStore {
    raw: RwLock<Option<String>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding `record` already.
    pub fn with_record(record: &IdentityRecord) -> StoreResult<Self> {
        let store = Self::new();
        store.save(record)?;
        Ok(store)
    }

    /// Seed the store with arbitrary JSON, e.g. a record written by an older
    /// front end.
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            raw: RwLock::new(Some(json.into())),
        }
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> StoreResult<Option<IdentityRecord>> {
        match self.raw.read().as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, record: &IdentityRecord) -> StoreResult<()> {
        let json = serde_json::to_string(record)?;
        *self.raw.write() = Some(json);
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        *self.raw.write() = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// sled
// ---------------------------------------------------------------------------

/// On-disk store backed by sled. The record is a JSON value under
/// `user_info` in the default tree.
#[derive(Debug, Clone)]
pub struct SledIdentityStore {
    db: Db,
}

impl SledIdentityStore {
    /// Open or create the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let db = sled::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "identity store opened");
        Ok(Self { db })
    }

    /// A store that disappears when dropped.
    pub fn open_temporary() -> StoreResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }
}

impl IdentityStore for SledIdentityStore {
    fn load(&self) -> StoreResult<Option<IdentityRecord>> {
        match self.db.get(IDENTITY_RECORD_KEY)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save(&self, record: &IdentityRecord) -> StoreResult<()> {
        let json = serde_json::to_vec(record)?;
        self.db.insert(IDENTITY_RECORD_KEY, json)?;
        self.db.flush()?;
        info!(address = %record.address(), "identity record saved");
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.db.remove(IDENTITY_RECORD_KEY)?;
        self.db.flush()?;
        info!("identity record cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IdentityRecord {
        IdentityRecord {
            password: "hunter2".into(),
            secret_phrase: "a b c".into(),
            public_key: "ab".repeat(64),
            private_key: "cd".repeat(128),
        }
    }

    fn exercise(store: &dyn IdentityStore) {
        assert!(store.load().unwrap().is_none());

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));

        let mut other = sample();
        other.password = "changed".into();
        store.save(&other).unwrap();
        assert_eq!(store.load().unwrap().unwrap().password, "changed");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn memory_store_lifecycle() {
        exercise(&MemoryIdentityStore::new());
    }

    #[test]
    fn sled_store_lifecycle() {
        exercise(&SledIdentityStore::open_temporary().unwrap());
    }

    #[test]
    fn sled_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = SledIdentityStore::open(dir.path()).unwrap();
            store.save(&sample()).unwrap();
        }
        let reopened = SledIdentityStore::open(dir.path()).unwrap();
        assert_eq!(reopened.load().unwrap(), Some(sample()));
    }

    #[test]
    fn corrupt_record_is_a_serialization_error() {
        let store = MemoryIdentityStore::with_raw("{not json");
        assert!(matches!(store.load(), Err(StoreError::Serialization(_))));
    }

    #[test]
    fn stored_bytes_are_plain_json() {
        let store = SledIdentityStore::open_temporary().unwrap();
        store.save(&sample()).unwrap();
        let raw = store.db.get(IDENTITY_RECORD_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(value["password"], "hunter2");
        assert_eq!(value["privateKey"], "cd".repeat(128));
    }
}
