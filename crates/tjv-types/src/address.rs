use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Claimant identity.
///
/// A 20-byte account address. Addresses are opaque to the engine: they are
/// hashed into whitelist leaves, bound into claim signatures, and recorded as
/// token owners.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address([u8; 20]);

impl Address {
    /// Byte length of an address.
    pub const LEN: usize = 20;

    /// The zero address. Never a valid claimant.
    pub const fn zero() -> Self {
        Self([0u8; 20])
    }

    /// Create from raw bytes.
    pub const fn from_raw(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Derive an address from a label (deterministic; handy for fixtures).
    pub fn derive(label: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"tjv-address-v1:");
        hasher.update(label.as_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash.as_bytes()[..20]);
        Self(bytes)
    }

    /// Create a random address for tests and demos.
    pub fn random() -> Self {
        let mut bytes = [0u8; 20];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Returns `true` for the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// The raw 20 bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Hex-encoded string with a `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Short identifier (first 4 bytes).
    pub fn short_id(&self) -> String {
        format!("0x{}", hex::encode(&self.0[..4]))
    }

    /// Parse from a hex string, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != Self::LEN {
            return Err(TypeError::InvalidLength {
                expected: Self::LEN,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.short_id())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

/// Identity of a deployed collection.
///
/// Bound into every claim signature so a signature issued for one collection
/// cannot be replayed against another.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionId([u8; 32]);

impl CollectionId {
    /// Derive a collection identity from its name and a deployment salt.
    pub fn derive(name: &str, salt: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"tjv-collection-v1:");
        hasher.update(name.as_bytes());
        hasher.update(b":");
        hasher.update(&salt.to_le_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// Create from a raw 32-byte value.
    pub const fn from_raw(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CollectionId({})", hex::encode(&self.0[..4]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        assert_eq!(Address::derive("alice"), Address::derive("alice"));
        assert_ne!(Address::derive("alice"), Address::derive("bob"));
    }

    #[test]
    fn random_addresses_are_unique() {
        assert_ne!(Address::random(), Address::random());
    }

    #[test]
    fn hex_roundtrip_with_and_without_prefix() {
        let addr = Address::derive("carol");
        let hex = addr.to_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 42);
        assert_eq!(Address::from_hex(&hex).unwrap(), addr);
        assert_eq!(Address::from_hex(&hex[2..]).unwrap(), addr);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = Address::from_hex("0xabcd").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidLength {
                expected: 20,
                actual: 2
            }
        );
    }

    #[test]
    fn bad_hex_is_rejected() {
        assert!(matches!(
            "0xzz".parse::<Address>(),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn zero_address() {
        assert!(Address::zero().is_zero());
        assert!(!Address::derive("x").is_zero());
    }

    #[test]
    fn serde_roundtrip() {
        let addr = Address::derive("dave");
        let json = serde_json::to_string(&addr).unwrap();
        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, parsed);
    }

    #[test]
    fn collection_id_depends_on_salt() {
        let a = CollectionId::derive("Tejiverse", 1);
        let b = CollectionId::derive("Tejiverse", 2);
        assert_ne!(a, b);
        assert_eq!(a, CollectionId::derive("Tejiverse", 1));
    }
}
