//! Test-support crate: isolated item stores for integration tests.
//!
//! # Responsibility
//! - Provision a store instance scoped to exactly one test run.
//! - Rewind identity numbering so assigned ids are deterministic.
//! - Expose direct store inspection that bypasses the HTTP surface.
//!
//! # Invariants
//! - Two `TestStore` instances never share rows or sequence positions.
//! - Inspection reads go through the same connection the system under test
//!   uses, never a side copy.
//! - File-backed stores are torn down by scope, even when a test body panics.

use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};
use tasklist_core::db::{open_db, open_db_in_memory};
use tasklist_core::{Item, ItemId, ItemStore, SqliteItemStore};
use tempfile::TempDir;
use uuid::Uuid;

/// One isolated store per test run.
///
/// Construction resets the identity sequence, so the first inserted item
/// always receives id 1 regardless of what earlier runs did in the same
/// process. Wire the system under test to this store via [`conn_handle`],
/// then assert on persisted state through [`find_by_id`] / [`find_where`]:
/// both sides read and write the exact same store instance.
///
/// [`conn_handle`]: TestStore::conn_handle
/// [`find_by_id`]: TestStore::find_by_id
/// [`find_where`]: TestStore::find_where
pub struct TestStore {
    conn: Arc<Mutex<Connection>>,
    identity: String,
    _workdir: Option<TempDir>,
}

impl TestStore {
    /// Provisions a private in-memory store.
    ///
    /// Every call opens its own in-memory database, so isolation comes from
    /// the connection itself; the identity token is informational.
    pub fn in_memory() -> Self {
        let conn = open_db_in_memory().expect("in-memory test store should bootstrap");
        Self::from_parts(conn, format!("memory-{}", Uuid::new_v4()), None)
    }

    /// Provisions a file-backed store named by a fresh per-run identity.
    ///
    /// The database file lives in a temp directory owned by this value;
    /// dropping the `TestStore` removes it.
    pub fn on_disk() -> Self {
        let workdir = TempDir::new().expect("temp dir for file-backed test store");
        let identity = Uuid::new_v4().to_string();
        let conn = open_db(workdir.path().join(format!("{identity}.db")))
            .expect("file-backed test store should bootstrap");
        Self::from_parts(conn, identity, Some(workdir))
    }

    fn from_parts(conn: Connection, identity: String, workdir: Option<TempDir>) -> Self {
        let provisioned = Self {
            conn: Arc::new(Mutex::new(conn)),
            identity,
            _workdir: workdir,
        };
        provisioned.reset();
        provisioned
    }

    /// Unique per-run store identity token.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Shared connection handle for wiring the system under test to this
    /// store.
    pub fn conn_handle(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    /// Clears all rows and rewinds identity numbering to 1. Idempotent.
    pub fn reset(&self) {
        self.with_store(|store| store.reset_sequence().expect("sequence reset"));
    }

    /// Applies a seeding procedure, builder-style.
    pub fn seed_with(self, seed: impl FnOnce(&SqliteItemStore<'_>)) -> Self {
        self.with_store(seed);
        self
    }

    /// Runs a closure against the underlying store for fixtures or custom
    /// assertions.
    pub fn with_store<T>(&self, f: impl FnOnce(&SqliteItemStore<'_>) -> T) -> T {
        let guard = self.lock();
        let store = SqliteItemStore::try_new(&guard).expect("bootstrapped test connection");
        f(&store)
    }

    /// Direct lookup by id, bypassing the HTTP surface.
    pub fn find_by_id(&self, id: ItemId) -> Option<Item> {
        self.with_store(|store| store.get(id).expect("test store read"))
    }

    /// First item matching `predicate`, in insertion order.
    pub fn find_where(&self, predicate: impl Fn(&Item) -> bool) -> Option<Item> {
        self.with_store(|store| {
            store
                .list()
                .expect("test store read")
                .into_iter()
                .find(|item| predicate(item))
        })
    }

    /// Number of persisted items.
    pub fn item_count(&self) -> usize {
        self.with_store(|store| store.list().expect("test store read").len())
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .expect("test store connection lock should not be poisoned")
    }
}

/// Inserts the classic `Item 1`..`Item N` fixture set.
pub fn seed_numbered_items(store: &SqliteItemStore<'_>, count: usize) {
    for n in 1..=count {
        store
            .insert(&Item::new(format!("Item {n}")))
            .expect("fixture insert");
    }
}
