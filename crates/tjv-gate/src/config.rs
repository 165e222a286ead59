use serde::{Deserialize, Serialize};
use tjv_crypto::{Digest, VerifyingKey};
use tjv_types::CollectionId;
use tracing::debug;

use crate::error::{GateError, GateResult};
use crate::strategies::{MerkleWhitelist, SignatureWhitelist};
use crate::verifier::WhitelistVerifier;

/// Whitelist strategy selection, as it appears in a collection config.
///
/// ```toml
/// [whitelist]
/// strategy = "merkle"
/// root = "0x5f1c..."
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum WhitelistConfig {
    /// Hex-encoded Merkle root (optional `0x` prefix).
    Merkle { root: String },
    /// Hex-encoded Ed25519 public key of the authorized signer.
    Signature { signer: String },
}

impl Default for WhitelistConfig {
    /// An all-zero root: nobody is whitelisted until the operator sets one.
    fn default() -> Self {
        Self::Merkle {
            root: hex::encode([0u8; 32]),
        }
    }
}

impl WhitelistConfig {
    pub fn merkle(root: &Digest) -> Self {
        Self::Merkle {
            root: hex::encode(root),
        }
    }

    pub fn signature(signer: &VerifyingKey) -> Self {
        Self::Signature {
            signer: signer.to_hex(),
        }
    }

    /// Build the configured verifier for `collection`.
    pub fn build(&self, collection: CollectionId) -> GateResult<Box<dyn WhitelistVerifier>> {
        let verifier: Box<dyn WhitelistVerifier> = match self {
            Self::Merkle { root } => Box::new(MerkleWhitelist::new(parse_root(root)?)),
            Self::Signature { signer } => {
                let key = VerifyingKey::from_hex(signer)
                    .map_err(|e| GateError::InvalidSignerKey(format!("{signer}: {e}")))?;
                Box::new(SignatureWhitelist::new(collection, key))
            }
        };
        debug!(strategy = %verifier.strategy(), "whitelist verifier built");
        Ok(verifier)
    }
}

fn parse_root(s: &str) -> GateResult<Digest> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(digits).map_err(|e| GateError::InvalidRoot(format!("{s}: {e}")))?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| GateError::InvalidRoot(format!("expected 32 bytes, got {}", b.len())))
}
