//! # Object Info Architecture
//!
//! object-info is a **host-agnostic record toolkit**. It knows nothing about a
//! particular ORM; it works against a handful of capability traits and gives
//! any record type three behaviors:
//!
//! - **Instance projection** ([`projector`]): turn a record into a plain
//!   key-value map for serialization, driven by a declarative configuration
//!   (selection, renaming, filters, date formats).
//! - **Soft deletion** ([`soft_delete`]): mark a record deleted instead of
//!   removing it, stamping who and when, and hide deleted rows from default
//!   queries.
//! - **Operation columns** ([`columns`]): migration helpers declaring the
//!   `<op>_by` / `<op>_at` audit column pairs.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs + args.rs)                                    │
//! │  - Parses arguments, prints results, owns exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs) → Commands (commands/*.rs)                    │
//! │  - Load JSON records and configuration, return CmdResult    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (projector/, soft_delete.rs, columns.rs)              │
//! │  - Generic over the traits in model.rs                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Hosts (store/)                                             │
//! │  - MemoryRecord/MemoryModel (tests), JsonFileRecord (CLI)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O in the Core
//!
//! The core never touches files or stdout. Reads, writes and saves go through
//! the host traits; diagnostics go through `tracing` and are only visible when
//! the embedding application installs a subscriber.
//!
//! ## Testing Strategy
//!
//! 1. **Core**: unit tests next to each module, using the in-memory hosts from
//!    `store::memory` (and its `fixtures` module).
//! 2. **Commands / API**: unit tests against JSON files in temporary
//!    directories.
//! 3. **CLI**: integration tests in `tests/` driving the `objinfo` binary.
//!
//! ## Module Overview
//!
//! - [`value`]: the dynamic [`value::Value`] type
//! - [`model`]: host capability traits
//! - [`projector`]: instance projection
//! - [`soft_delete`]: soft deletion
//! - [`columns`]: operation column generator
//! - [`store`]: reference hosts
//! - [`config`]: `objinfo` configuration file
//! - [`commands`], [`api`]: the CLI's command layer and facade
//! - [`error`]: error types

pub mod api;
pub mod columns;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod projector;
pub mod soft_delete;
pub mod store;
pub mod value;

pub use error::{ObjectInfoError, Result};
pub use model::{Persistable, Readable, SchemaBuilder, Writable};
pub use projector::{project, InstanceInfo, InstanceInfoExt, ProjectionConfig};
pub use soft_delete::{DeleteOptions, SoftDelete, SoftDeleteConfig, SoftDeleteOutcome};
pub use value::Value;
