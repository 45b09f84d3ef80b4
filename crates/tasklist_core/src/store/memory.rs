//! In-memory item store.
//!
//! # Responsibility
//! - Provide the non-relational backend behind the store contract.
//! - Keep identity sequencing as instance state, advanced only by atomic
//!   increment and rewound only through `reset_sequence`.

use crate::model::item::{Item, ItemId};
use crate::store::{ItemStore, StoreError, StoreResult};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Keyed in-memory storage with a per-instance identity sequence.
///
/// The map lock guards row data only; identity assignment goes through a
/// separate atomic counter, so concurrent inserts never contend on a
/// store-wide lock for the sequence.
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    rows: Mutex<BTreeMap<ItemId, Item>>,
    sequence: AtomicI64,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> StoreResult<MutexGuard<'_, BTreeMap<ItemId, Item>>> {
        self.rows.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl ItemStore for MemoryItemStore {
    fn insert(&self, candidate: &Item) -> StoreResult<ItemId> {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let mut rows = self.rows()?;
        rows.insert(
            id,
            Item {
                id,
                description: candidate.description.clone(),
                done: candidate.done,
            },
        );
        Ok(id)
    }

    fn get(&self, id: ItemId) -> StoreResult<Option<Item>> {
        Ok(self.rows()?.get(&id).cloned())
    }

    fn list(&self) -> StoreResult<Vec<Item>> {
        // BTreeMap iterates in ascending id order, which is insertion order
        // because the sequence is monotonic.
        Ok(self.rows()?.values().cloned().collect())
    }

    fn update(&self, id: ItemId, item: &Item) -> StoreResult<bool> {
        let mut rows = self.rows()?;
        match rows.get_mut(&id) {
            Some(slot) => {
                slot.description = item.description.clone();
                slot.done = item.done;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: ItemId) -> StoreResult<bool> {
        Ok(self.rows()?.remove(&id).is_some())
    }

    fn reset_sequence(&self) -> StoreResult<()> {
        let mut rows = self.rows()?;
        rows.clear();
        self.sequence.store(0, Ordering::SeqCst);
        Ok(())
    }
}
