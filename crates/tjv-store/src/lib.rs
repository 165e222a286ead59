//! Trait storage for the Tejiverse collection engine.
//!
//! Trait fragments are stored under their `(layer, item)` coordinate and
//! written in chunks sized to the platform's storage budget. Every entry is
//! immutable once written.
//!
//! # Storage Backends
//!
//! All backends implement the [`TraitStore`] trait:
//!
//! - [`InMemoryTraitStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`LogTraitStore`] -- append-only chunk log on disk, replayed on open
//!
//! # Design Rules
//!
//! 1. Entries are immutable; re-inserting a key is a `DuplicateKey` error.
//! 2. A chunk is validated completely before any of it is written.
//! 3. Concurrent reads are always safe; inserts are exclusive.
//! 4. The store never interprets payloads.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod chunk_log;
pub mod error;
pub mod memory;
pub mod traits;

pub use chunk_log::{LogStoreConfig, LogTraitStore, SyncMode};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryTraitStore;
pub use traits::TraitStore;
