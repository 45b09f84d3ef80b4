//! Domain model for the tasklist core.
//!
//! # Responsibility
//! - Define the canonical item record shared by storage and wire layers.
//! - Own candidate validation ahead of any persistence attempt.
//!
//! # Invariants
//! - Every persisted item carries a store-assigned integer id.
//! - Deletion is a hard removal; identity values are never re-issued.

pub mod item;
