//! High-level SDK for the Tejiverse collection engine.
//!
//! [`Collection`] ties the subsystems together: it ingests a layered asset
//! catalog into a trait store, runs claims through the claim machine, and
//! renders token URIs from the stored fragments.

pub mod collection;
pub mod config;
pub mod error;

pub use collection::{Collection, IngestReport};
pub use config::CollectionConfig;
pub use error::{SdkError, SdkResult};

// Re-export key types
pub use tjv_claim::{ClaimConfig, ClaimMachine, ClaimReceipt, ClaimRecord, WhitelistQuota};
pub use tjv_gate::{WhitelistConfig, WhitelistProof};
pub use tjv_render::{RenderConfig, RevealSettings, TokenMetadata};
pub use tjv_store::{InMemoryTraitStore, LogStoreConfig, LogTraitStore, TraitStore};
pub use tjv_types::{Address, Layer, SaleState, TokenId, TokenTraits};
