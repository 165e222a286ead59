//! Built-in whitelist strategies.

pub mod merkle;
pub mod signature;

pub use merkle::MerkleWhitelist;
pub use signature::SignatureWhitelist;
