//! Storage layer: the item store contract and its implementations.
//!
//! # Responsibility
//! - Define durable keyed storage plus identity sequencing for items.
//! - Isolate persistence details from service orchestration.
//!
//! # Invariants
//! - Identity values come from a monotonically increasing per-store sequence.
//! - A deleted id is never reassigned within the store lifetime.
//! - Backends are interchangeable behind `ItemStore`.

use crate::db::DbError;
use crate::model::item::{Item, ItemId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryItemStore;
pub use sqlite::SqliteItemStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Transport and readiness error for store operations.
///
/// Semantic outcomes (missing rows) are reported through return values, not
/// through this type; translating absence into `NotFound` is the service's job.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
    LockPoisoned,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
            Self::LockPoisoned => write!(f, "store lock poisoned by a panicking thread"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable keyed storage plus identity sequencing.
///
/// # Invariants
/// - `insert` assigns ids from a monotonically increasing per-store sequence,
///   collision-free even under concurrent inserts.
/// - `list` returns items in insertion order.
/// - `reset_sequence` is the only way to rewind identity numbering.
pub trait ItemStore {
    /// Assigns the next sequence value, persists the item under that key and
    /// returns the assigned id. Any id carried by `candidate` is ignored.
    fn insert(&self, candidate: &Item) -> StoreResult<ItemId>;

    /// Returns the item stored under `id`, if any.
    fn get(&self, id: ItemId) -> StoreResult<Option<Item>>;

    /// Returns all items in insertion order.
    fn list(&self) -> StoreResult<Vec<Item>>;

    /// Replaces the value stored under `id`; the key itself is untouched.
    /// Returns `false` when no item with `id` exists.
    fn update(&self, id: ItemId, item: &Item) -> StoreResult<bool>;

    /// Removes the item stored under `id`. Returns `false` when no item with
    /// `id` exists. A removed id is never re-issued by the sequence.
    fn delete(&self, id: ItemId) -> StoreResult<bool>;

    /// Clears all items and rewinds the sequence so the next insert gets id 1.
    ///
    /// Test-harness hook; idempotent.
    fn reset_sequence(&self) -> StoreResult<()>;
}
