//! Foundation types for the Tejiverse collection engine.
//!
//! This crate provides the identity, layer, and token types shared by every
//! other `tjv-*` crate.
//!
//! # Key Types
//!
//! - [`Address`]: 20-byte claimant identity
//! - [`CollectionId`]: 32-byte collection identity, bound into claim signatures
//! - [`Layer`]: fixed, ordered trait categories (the z-order of a render)
//! - [`TraitItem`] / [`StorageChunk`]: encoded trait fragments and their batches
//! - [`TokenTraits`]: one item index per layer for a single token
//! - [`SaleState`]: the claim phase

pub mod address;
pub mod error;
pub mod item;
pub mod layer;
pub mod sale;
pub mod token;

pub use address::{Address, CollectionId};
pub use error::TypeError;
pub use item::{StorageChunk, TraitItem, DEFAULT_CHUNK_BUDGET};
pub use layer::{Layer, TraitKey, LAYER_COUNT};
pub use sale::SaleState;
pub use token::{TokenId, TokenTraits};
