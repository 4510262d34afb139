//! # Reference Collaborators
//!
//! The library only talks to a host ORM through the traits in
//! [`crate::model`]. This module provides two small hosts so the library can be
//! exercised without one:
//!
//! - [`memory::MemoryRecord`] / [`memory::MemoryModel`]: attribute maps and a
//!   model type with default scopes, for tests and embedding.
//! - [`fs::JsonFileRecord`]: a record backed by a JSON object on disk, used by
//!   the `objinfo` binary.
//!
//! ## Save Semantics
//!
//! Both hosts follow the usual ORM convention:
//! - `save` never fails loudly; it returns `false`.
//! - `save_strict` returns a [`StoreError`].
//! - `touch: Some(true)` refreshes `updated_at` when the record has one.

use thiserror::Error;

pub mod fs;
pub mod memory;

/// Errors raised by the reference hosts on the raising save path.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record rejected: {0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Attribute refreshed by `touch: Some(true)`.
pub const TOUCHED_AT: &str = "updated_at";
