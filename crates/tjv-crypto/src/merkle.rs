use tjv_types::Address;

use crate::hasher::{ContentHasher, Digest};

/// Whitelist leaf for an address.
pub fn hash_leaf(address: &Address) -> Digest {
    ContentHasher::LEAF.hash(address.as_bytes())
}

/// Binary Merkle tree with sorted sibling pairs.
///
/// Each interior node hashes its two children in ascending byte order, so a
/// proof is just the ordered list of sibling hashes from leaf to root; no
/// left/right flags travel with it. An unpaired node at the end of a level is
/// promoted to the next level unchanged.
///
/// This is the offline side: the full leaf set builds the tree and hands out
/// proofs. Claim-time verification only needs [`MerkleTree::verify`] and the
/// committed root.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    /// Level 0 = leaves, last level = `[root]`.
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Build a tree from pre-hashed leaves, in the given order.
    ///
    /// An empty list produces the all-zero root. A single leaf is its own root.
    pub fn from_leaves(leaves: Vec<Digest>) -> Self {
        if leaves.is_empty() {
            return Self { levels: vec![] };
        }

        let mut levels = vec![leaves];
        while levels[levels.len() - 1].len() > 1 {
            let current = &levels[levels.len() - 1];
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for pair in current.chunks(2) {
                match pair {
                    [left, right] => next.push(hash_pair(left, right)),
                    _ => next.push(pair[0]),
                }
            }
            levels.push(next);
        }

        Self { levels }
    }

    /// Build a tree over the leaf hashes of a whitelist.
    pub fn from_addresses(addresses: &[Address]) -> Self {
        Self::from_leaves(addresses.iter().map(hash_leaf).collect())
    }

    /// The committed root (all zeros for an empty tree).
    pub fn root(&self) -> Digest {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or([0u8; 32])
    }

    /// Hex-encoded root, for operator tooling.
    pub fn hex_root(&self) -> String {
        format!("0x{}", hex::encode(self.root()))
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Number of hashing levels above the leaves.
    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Sibling path for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Option<Vec<Digest>> {
        if index >= self.leaf_count() {
            return None;
        }

        let mut path = Vec::with_capacity(self.depth());
        let mut idx = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = idx ^ 1;
            if sibling < level.len() {
                path.push(level[sibling]);
            }
            idx /= 2;
        }
        Some(path)
    }

    /// Sibling path for an address, if it is in the tree.
    pub fn proof_for(&self, address: &Address) -> Option<Vec<Digest>> {
        let leaf = hash_leaf(address);
        let index = self.levels.first()?.iter().position(|l| *l == leaf)?;
        self.proof(index)
    }

    /// Recompute the root from a leaf and its sibling path, and compare.
    pub fn verify(root: &Digest, leaf: &Digest, proof: &[Digest]) -> bool {
        let computed = proof
            .iter()
            .fold(*leaf, |current, sibling| hash_pair(&current, sibling));
        computed == *root
    }
}

fn hash_pair(a: &Digest, b: &Digest) -> Digest {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    ContentHasher::NODE.hash_parts(&[&lo[..], &hi[..]])
}
