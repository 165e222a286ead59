use serde::{Deserialize, Serialize};
use tjv_crypto::{Digest, Signature};
use tjv_types::Address;

use crate::config::WhitelistConfig;

/// Evidence a claimant submits for a whitelist claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WhitelistProof {
    /// Sibling hashes from the claimant's leaf up to the root.
    Merkle(Vec<Digest>),
    /// Authorization signed by the collection's signer.
    Signature(Signature),
}

impl WhitelistProof {
    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Merkle(_) => Strategy::Merkle,
            Self::Signature(_) => Strategy::Signature,
        }
    }
}

/// Which whitelist strategy a verifier or proof belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Merkle,
    Signature,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merkle => f.write_str("merkle"),
            Self::Signature => f.write_str("signature"),
        }
    }
}

/// Decides whether a claimant may take part in the whitelist phase.
///
/// Implementations are pure: no state is read or written besides the
/// configured root or key. A proof of the wrong strategy is never valid.
pub trait WhitelistVerifier: Send + Sync + std::fmt::Debug {
    /// Strategy this verifier accepts proofs for.
    fn strategy(&self) -> Strategy;

    /// Check a claimant's proof for a claim of `amount` tokens.
    fn verify(&self, claimant: &Address, amount: u32, proof: &WhitelistProof) -> bool;

    /// The config entry that builds this verifier.
    fn config(&self) -> WhitelistConfig;
}
