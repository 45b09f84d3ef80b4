//! Item domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record and its wire/storage shape.
//! - Provide the validation rule applied to candidate payloads.
//!
//! # Invariants
//! - `id` is assigned by the store sequence; callers never choose it.
//! - A persisted item always has a non-empty `description`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable integer identifier produced by the store sequence.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ItemId = i64;

/// Canonical to-do record.
///
/// The serde shape doubles as wire and storage representation:
/// `{ id, description, done }`. `id` and `done` default when a payload omits
/// them. `description` also defaults (to empty) so that an omitted description
/// reaches `validate()` as a validation failure rather than failing
/// deserialization outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Assigned on insert. Any caller-supplied value is ignored by create.
    #[serde(default)]
    pub id: ItemId,
    /// Task text. Must be non-empty after trimming.
    #[serde(default)]
    pub description: String,
    /// Completion flag.
    #[serde(default)]
    pub done: bool,
}

impl Item {
    /// Creates an unsaved candidate with no assigned id.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: 0,
            description: description.into(),
            done: false,
        }
    }

    /// Checks this record against the validation contract.
    ///
    /// # Errors
    /// - `EmptyDescription` when `description` is empty after trimming.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.description.trim().is_empty() {
            return Err(ItemValidationError::EmptyDescription);
        }
        Ok(())
    }
}

/// Validation failure for an item candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemValidationError {
    /// `description` is missing, empty, or whitespace-only.
    EmptyDescription,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "item description must not be empty"),
        }
    }
}

impl Error for ItemValidationError {}
