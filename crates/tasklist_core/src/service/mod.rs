//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into transport-facing operations.
//! - Keep HTTP/CLI layers decoupled from storage details.

pub mod item_service;
