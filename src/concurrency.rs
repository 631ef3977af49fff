//! Per-collection locking
//!
//! Every read-modify-write cycle on a collection runs under that collection's
//! mutex, so overlapping cycles on the same collection never interleave.
//! Different collections proceed independently.

use crate::types::EntityKind;
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;

/// One mutex per collection, created up front for every entity kind.
#[derive(Debug)]
pub struct CollectionLockManager {
    locks: HashMap<EntityKind, Mutex<()>>,
}

impl Default for CollectionLockManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionLockManager {
    pub fn new() -> Self {
        Self {
            locks: EntityKind::ALL
                .into_iter()
                .map(|kind| (kind, Mutex::new(())))
                .collect(),
        }
    }

    /// Block until the lock for `kind` is held.
    pub fn lock(&self, kind: EntityKind) -> MutexGuard<'_, ()> {
        self.locks[&kind].lock()
    }
}
