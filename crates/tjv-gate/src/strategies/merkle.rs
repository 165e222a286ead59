use tjv_crypto::{hash_leaf, Digest, MerkleTree};
use tjv_types::Address;

use crate::config::WhitelistConfig;
use crate::verifier::{Strategy, WhitelistProof, WhitelistVerifier};

/// Membership check against a committed Merkle root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleWhitelist {
    root: Digest,
}

impl MerkleWhitelist {
    pub fn new(root: Digest) -> Self {
        Self { root }
    }

    /// Commit to a member list directly.
    pub fn from_members(members: &[Address]) -> Self {
        Self::new(MerkleTree::from_addresses(members).root())
    }

    pub fn root(&self) -> &Digest {
        &self.root
    }
}

impl WhitelistVerifier for MerkleWhitelist {
    fn strategy(&self) -> Strategy {
        Strategy::Merkle
    }

    // Membership does not depend on the amount.
    fn verify(&self, claimant: &Address, _amount: u32, proof: &WhitelistProof) -> bool {
        match proof {
            WhitelistProof::Merkle(siblings) => {
                MerkleTree::verify(&self.root, &hash_leaf(claimant), siblings)
            }
            WhitelistProof::Signature(_) => false,
        }
    }

    fn config(&self) -> WhitelistConfig {
        WhitelistConfig::merkle(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tjv_crypto::{ClaimMessage, SigningKey};
    use tjv_types::CollectionId;

    fn members(n: usize) -> Vec<Address> {
        (0..n).map(|i| Address::derive(&format!("wl-{i}"))).collect()
    }

    #[test]
    fn members_verify_and_outsiders_fail() {
        let list = members(5);
        let tree = MerkleTree::from_addresses(&list);
        let gate = MerkleWhitelist::new(tree.root());

        for (i, member) in list.iter().enumerate() {
            let proof = WhitelistProof::Merkle(tree.proof(i).unwrap());
            assert!(gate.verify(member, 1, &proof));
        }

        let outsider = Address::derive("outsider");
        let borrowed = WhitelistProof::Merkle(tree.proof(0).unwrap());
        assert!(!gate.verify(&outsider, 1, &borrowed));
    }

    #[test]
    fn proof_cannot_be_replayed_by_another_member() {
        let list = members(4);
        let tree = MerkleTree::from_addresses(&list);
        let gate = MerkleWhitelist::new(tree.root());

        let alice_proof = WhitelistProof::Merkle(tree.proof(0).unwrap());
        assert!(!gate.verify(&list[1], 1, &alice_proof));
    }

    #[test]
    fn signature_proof_is_rejected() {
        let list = members(2);
        let gate = MerkleWhitelist::from_members(&list);
        let key = SigningKey::generate();
        let sig = key.sign_claim(&ClaimMessage::new(
            CollectionId::derive("Tejiverse", 0),
            list[0],
            None,
        ));
        assert!(!gate.verify(&list[0], 1, &WhitelistProof::Signature(sig)));
    }

    #[test]
    fn single_member_has_empty_proof() {
        let solo = Address::derive("solo");
        let gate = MerkleWhitelist::from_members(&[solo]);
        assert!(gate.verify(&solo, 1, &WhitelistProof::Merkle(Vec::new())));
    }

    proptest! {
        #[test]
        fn every_member_of_any_list_verifies(n in 1usize..40, pick in 0usize..40) {
            let list = members(n);
            let idx = pick % n;
            let tree = MerkleTree::from_addresses(&list);
            let gate = MerkleWhitelist::new(tree.root());
            let proof = WhitelistProof::Merkle(tree.proof(idx).unwrap());
            prop_assert!(gate.verify(&list[idx], 3, &proof));
        }
    }
}
