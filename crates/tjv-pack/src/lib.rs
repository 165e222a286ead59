//! Asset ingestion for the Tejiverse collection engine.
//!
//! Build-time path from asset directories to store-ready batches:
//!
//! - [`load_catalog`]: reads `root/<Layer>/*` into base64-encoded
//!   [`TraitItem`](tjv_types::TraitItem)s with deterministic coordinates
//! - [`pack`]: splits the catalog into [`StorageChunk`](tjv_types::StorageChunk)s
//!   that each fit one storage write

pub mod error;
pub mod loader;
pub mod packer;

pub use error::{PackError, PackResult};
pub use loader::{layer_sizes, load_catalog, load_layer};
pub use packer::{items_per_chunk, pack};
