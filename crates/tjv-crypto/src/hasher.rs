/// A 32-byte BLAKE3 digest.
pub type Digest = [u8; 32];

/// Domain-separated BLAKE3 hasher.
///
/// Each hasher carries a domain tag that is prepended to every hash
/// computation, so a whitelist leaf and an interior Merkle node built from
/// identical bytes never collide.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for whitelist leaves (one per admitted address).
    pub const LEAF: Self = Self {
        domain: "tjv-leaf-v1",
    };
    /// Hasher for interior Merkle nodes.
    pub const NODE: Self = Self {
        domain: "tjv-merkle-v1",
    };
    /// Domain for claim signature messages. Signed as raw bytes, not hashed.
    pub const CLAIM: Self = Self {
        domain: "tjv-claim-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> Digest {
        self.hash_parts(&[data])
    }

    /// Hash several byte strings as one message, with domain separation.
    pub fn hash_parts(&self, parts: &[&[u8]]) -> Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        for part in parts {
            hasher.update(part);
        }
        *hasher.finalize().as_bytes()
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &'static str {
        self.domain
    }
}
