//! Collection Store
//!
//! Loads and persists whole collections, one JSON file per entity kind. The
//! store is the only component that writes collection files. Mutations go
//! through a [`Transaction`], which holds the collection's lock from load to
//! commit so read-modify-write cycles on one collection never interleave.
//!
//! Load policy: a missing file is an empty collection; an unreadable or
//! malformed file is an error and is never silently treated as empty.

pub mod persistence;

pub use persistence::{read_collection, write_collection_atomic};

use crate::concurrency::CollectionLockManager;
use crate::config::ContentConfig;
use crate::error::StorageError;
use crate::types::EntityKind;
use parking_lot::MutexGuard;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// File-backed store of every collection under one data directory.
#[derive(Debug)]
pub struct CollectionStore {
    data_dir: PathBuf,
    locks: CollectionLockManager,
}

impl CollectionStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            locks: CollectionLockManager::new(),
        }
    }

    pub fn from_config(config: &ContentConfig) -> Self {
        Self::new(config.data_dir())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Backing file of `kind`.
    pub fn path(&self, kind: EntityKind) -> PathBuf {
        self.data_dir.join(kind.collection_file())
    }

    /// Snapshot read. Waits for any in-flight transaction on `kind` to commit.
    pub fn load<C>(&self, kind: EntityKind) -> Result<C, StorageError>
    where
        C: DeserializeOwned + Default,
    {
        let _guard = self.locks.lock(kind);
        self.load_unlocked(kind)
    }

    /// Replace the whole collection outside of a transaction.
    pub fn save<C: Serialize>(&self, kind: EntityKind, collection: &C) -> Result<(), StorageError> {
        let _guard = self.locks.lock(kind);
        self.save_unlocked(kind, collection)
    }

    /// Lock `kind` and load it for mutation.
    pub fn begin<C>(&self, kind: EntityKind) -> Result<Transaction<'_, C>, StorageError>
    where
        C: DeserializeOwned + Default + Serialize,
    {
        let guard = self.locks.lock(kind);
        let data = self.load_unlocked(kind)?;
        Ok(Transaction {
            store: self,
            kind,
            data,
            _guard: guard,
        })
    }

    /// Run `f` over the loaded collection and save it if `f` succeeds.
    pub fn transact<C, R, E>(
        &self,
        kind: EntityKind,
        f: impl FnOnce(&mut C) -> Result<R, E>,
    ) -> Result<R, E>
    where
        C: DeserializeOwned + Default + Serialize,
        E: From<StorageError>,
    {
        let mut tx = self.begin::<C>(kind)?;
        let value = f(&mut *tx)?;
        tx.commit()?;
        Ok(value)
    }

    fn load_unlocked<C>(&self, kind: EntityKind) -> Result<C, StorageError>
    where
        C: DeserializeOwned + Default,
    {
        let path = self.path(kind);
        let loaded = read_collection(&path, kind.as_str()).map_err(|e| {
            error!(collection = %kind, path = ?path, error = %e, "Failed to load collection");
            e
        })?;
        match loaded {
            Some(collection) => {
                debug!(collection = %kind, "Loaded collection");
                Ok(collection)
            }
            None => {
                debug!(collection = %kind, "Collection file missing, starting empty");
                Ok(C::default())
            }
        }
    }

    fn save_unlocked<C: Serialize>(
        &self,
        kind: EntityKind,
        collection: &C,
    ) -> Result<(), StorageError> {
        write_collection_atomic(&self.path(kind), collection, kind.indent_width())?;
        debug!(collection = %kind, "Saved collection");
        Ok(())
    }
}

/// A loaded collection plus the lock that protects it until commit or drop.
///
/// Dropping without committing discards the in-memory changes.
pub struct Transaction<'a, C: Serialize> {
    store: &'a CollectionStore,
    kind: EntityKind,
    data: C,
    _guard: MutexGuard<'a, ()>,
}

impl<'a, C: Serialize> Transaction<'a, C> {
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Save the collection and release the lock.
    pub fn commit(self) -> Result<(), StorageError> {
        self.store.save_unlocked(self.kind, &self.data)
    }
}

impl<C: Serialize> Deref for Transaction<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.data
    }
}

impl<C: Serialize> DerefMut for Transaction<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.data
    }
}
