//! Cryptographic primitives for the Tejiverse collection engine.
//!
//! Provides domain-separated BLAKE3 hashing, the sorted-pair Merkle tree used
//! for whitelists, and Ed25519 claim signing/verification.
//!
//! All crypto operations wrap established libraries; no custom cryptography.

pub mod hasher;
pub mod merkle;
pub mod signer;

pub use hasher::{ContentHasher, Digest};
pub use merkle::{hash_leaf, MerkleTree};
pub use signer::{ClaimMessage, Signature, SignatureError, SigningKey, VerifyingKey};
