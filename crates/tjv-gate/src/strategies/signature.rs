use tjv_crypto::{ClaimMessage, VerifyingKey};
use tjv_types::{Address, CollectionId};

use crate::config::WhitelistConfig;
use crate::verifier::{Strategy, WhitelistProof, WhitelistVerifier};

/// Claims authorized by an off-chain signer.
///
/// A signature covers the collection and the claimant and may also bind the
/// exact amount. The amount-bound message is checked first, then the
/// unbound one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureWhitelist {
    collection: CollectionId,
    signer: VerifyingKey,
}

impl SignatureWhitelist {
    pub fn new(collection: CollectionId, signer: VerifyingKey) -> Self {
        Self { collection, signer }
    }

    pub fn signer(&self) -> &VerifyingKey {
        &self.signer
    }

    pub fn collection(&self) -> &CollectionId {
        &self.collection
    }
}

impl WhitelistVerifier for SignatureWhitelist {
    fn strategy(&self) -> Strategy {
        Strategy::Signature
    }

    fn verify(&self, claimant: &Address, amount: u32, proof: &WhitelistProof) -> bool {
        let WhitelistProof::Signature(signature) = proof else {
            return false;
        };
        [Some(amount), None].into_iter().any(|bound| {
            let message = ClaimMessage::new(self.collection, *claimant, bound);
            self.signer.verify_claim(&message, signature).is_ok()
        })
    }

    fn config(&self) -> WhitelistConfig {
        WhitelistConfig::signature(&self.signer)
    }
}
