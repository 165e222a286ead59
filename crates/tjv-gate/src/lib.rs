//! Whitelist gate for the Tejiverse collection engine.
//!
//! A whitelist claim must carry a [`WhitelistProof`] that the collection's
//! [`WhitelistVerifier`] accepts. Two strategies ship with the crate:
//! Merkle membership against a committed root, and Ed25519 authorizations
//! from a configured signer.
//!
//! # Quick Start
//!
//! ```rust
//! use tjv_crypto::MerkleTree;
//! use tjv_gate::{MerkleWhitelist, WhitelistProof, WhitelistVerifier};
//! use tjv_types::Address;
//!
//! let members = [Address::derive("alice"), Address::derive("bob")];
//! let tree = MerkleTree::from_addresses(&members);
//! let gate = MerkleWhitelist::new(tree.root());
//!
//! let proof = WhitelistProof::Merkle(tree.proof(0).unwrap());
//! assert!(gate.verify(&members[0], 1, &proof));
//! assert!(!gate.verify(&members[1], 1, &proof));
//! ```

pub mod config;
pub mod error;
pub mod strategies;
pub mod verifier;

pub use config::WhitelistConfig;
pub use error::{GateError, GateResult};
pub use strategies::{MerkleWhitelist, SignatureWhitelist};
pub use verifier::{Strategy, WhitelistProof, WhitelistVerifier};
