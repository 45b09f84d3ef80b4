//! Item use-case service.
//!
//! # Responsibility
//! - Validate candidate payloads before any mutation is attempted.
//! - Resolve identity and existence rules, translating outcomes into the
//!   result taxonomy consumed by transport adapters.
//!
//! # Invariants
//! - Validation runs before existence lookups, so `InvalidInput` takes
//!   precedence over `NotFound` when both conditions hold.
//! - No operation leaves a partial write behind.

use crate::model::item::{Item, ItemId, ItemValidationError};
use crate::store::{ItemStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result taxonomy for item operations.
///
/// `Conflict` is reserved for future uniqueness constraints; no current
/// operation produces it.
#[derive(Debug)]
pub enum ServiceError {
    InvalidInput(InvalidInput),
    NotFound(ItemId),
    Conflict(ItemId),
    Store(StoreError),
}

/// Client-error detail carried by `ServiceError::InvalidInput`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput {
    /// No payload arrived with the request.
    MissingPayload,
    /// Payload failed the item validation contract.
    Validation(ItemValidationError),
    /// Path and body disagree about the item identity.
    IdentityMismatch { path: ItemId, body: ItemId },
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(detail) => write!(f, "{detail}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::Conflict(id) => write!(f, "item conflict: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(InvalidInput::Validation(err)) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl Display for InvalidInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPayload => write!(f, "request payload is missing or undecodable"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::IdentityMismatch { path, body } => {
                write!(f, "body id {body} does not match path id {path}")
            }
        }
    }
}

impl From<InvalidInput> for ServiceError {
    fn from(value: InvalidInput) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Use-case service over any store backend.
///
/// Candidates arrive as `Option<Item>`: `None` models an absent or
/// undecodable payload, which is a client error by contract.
pub struct ItemService<S: ItemStore> {
    store: S,
}

impl<S: ItemStore> ItemService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns every item in insertion order.
    pub fn list(&self) -> ServiceResult<Vec<Item>> {
        Ok(self.store.list()?)
    }

    /// Returns the item with `id`.
    ///
    /// # Errors
    /// - `NotFound` when no item with `id` exists.
    pub fn get(&self, id: ItemId) -> ServiceResult<Item> {
        self.store.get(id)?.ok_or(ServiceError::NotFound(id))
    }

    /// Persists a new item under the next sequence id and returns it.
    ///
    /// Any id carried by the candidate is ignored; the store sequence is the
    /// only source of identity.
    ///
    /// # Errors
    /// - `InvalidInput` when the candidate is absent or fails validation; the
    ///   store is untouched in that case.
    pub fn create(&self, candidate: Option<Item>) -> ServiceResult<Item> {
        let candidate = candidate.ok_or(InvalidInput::MissingPayload)?;
        candidate
            .validate()
            .map_err(InvalidInput::Validation)?;

        let id = self.store.insert(&candidate)?;
        Ok(Item {
            id,
            description: candidate.description,
            done: candidate.done,
        })
    }

    /// Overwrites `description` and `done` of an existing item in place.
    ///
    /// The identity-mismatch check runs before the existence lookup: a
    /// mismatched path/body pair is `InvalidInput` regardless of whether the
    /// path id exists.
    ///
    /// # Errors
    /// - `InvalidInput` when the candidate is absent, its id does not match
    ///   `id`, or validation fails.
    /// - `NotFound` when no item with `id` exists.
    pub fn update(&self, id: ItemId, candidate: Option<Item>) -> ServiceResult<()> {
        let candidate = candidate.ok_or(InvalidInput::MissingPayload)?;
        if candidate.id != id {
            return Err(InvalidInput::IdentityMismatch {
                path: id,
                body: candidate.id,
            }
            .into());
        }
        candidate
            .validate()
            .map_err(InvalidInput::Validation)?;

        if !self.store.update(id, &candidate)? {
            return Err(ServiceError::NotFound(id));
        }
        Ok(())
    }

    /// Removes the item with `id`. The id is never reassigned afterwards.
    ///
    /// # Errors
    /// - `NotFound` when no item with `id` exists.
    pub fn delete(&self, id: ItemId) -> ServiceResult<()> {
        if !self.store.delete(id)? {
            return Err(ServiceError::NotFound(id));
        }
        Ok(())
    }
}
