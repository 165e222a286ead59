use serde::{Deserialize, Serialize};
use tjv_types::{Address, CollectionId};

use crate::hasher::ContentHasher;

/// Ed25519 signing key (private). Held by the off-chain whitelist signer.
pub struct SigningKey(ed25519_dalek::SigningKey);

/// Ed25519 verifying key (public). Configured as the authorized signer.
#[derive(Clone, PartialEq, Eq)]
pub struct VerifyingKey(ed25519_dalek::VerifyingKey);

/// Ed25519 signature.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "signature_serde")] ed25519_dalek::Signature);

/// The statement a whitelist signer authorizes.
///
/// Binds the collection, the claimant, and optionally the claim amount, so a
/// signature cannot be replayed by another address or against another
/// collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimMessage {
    pub collection: CollectionId,
    pub claimant: Address,
    pub amount: Option<u32>,
}

impl ClaimMessage {
    pub fn new(collection: CollectionId, claimant: Address, amount: Option<u32>) -> Self {
        Self {
            collection,
            claimant,
            amount,
        }
    }

    /// Canonical signed bytes.
    ///
    /// ```text
    /// "tjv-claim-v1:" || collection (32) || claimant (20) || 0x00
    /// "tjv-claim-v1:" || collection (32) || claimant (20) || 0x01 || amount (u32 LE)
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        let domain = ContentHasher::CLAIM.domain();
        let mut buf = Vec::with_capacity(domain.len() + 1 + 32 + 20 + 5);
        buf.extend_from_slice(domain.as_bytes());
        buf.push(b':');
        buf.extend_from_slice(self.collection.as_bytes());
        buf.extend_from_slice(self.claimant.as_bytes());
        match self.amount {
            None => buf.push(0),
            Some(amount) => {
                buf.push(1);
                buf.extend_from_slice(&amount.to_le_bytes());
            }
        }
        buf
    }
}

impl SigningKey {
    /// Generate a new random signing key.
    pub fn generate() -> Self {
        let mut csprng = rand::thread_rng();
        Self(ed25519_dalek::SigningKey::generate(&mut csprng))
    }

    /// Create from raw 32-byte secret.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(ed25519_dalek::SigningKey::from_bytes(&bytes))
    }

    /// The corresponding public verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.0.verifying_key())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        use ed25519_dalek::Signer;
        Signature(self.0.sign(message))
    }

    /// Sign a whitelist claim authorization.
    pub fn sign_claim(&self, claim: &ClaimMessage) -> Signature {
        self.sign(&claim.to_bytes())
    }

    /// Raw secret key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl VerifyingKey {
    /// Verify a signature on a message.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        use ed25519_dalek::Verifier;
        self.0
            .verify(message, &signature.0)
            .map_err(|_| SignatureError::InvalidSignature)
    }

    /// Verify a whitelist claim authorization.
    pub fn verify_claim(
        &self,
        claim: &ClaimMessage,
        signature: &Signature,
    ) -> Result<(), SignatureError> {
        self.verify(&claim.to_bytes(), signature)
    }

    /// Raw public key bytes.
    pub fn as_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Create from raw 32-byte public key.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, SignatureError> {
        let key = ed25519_dalek::VerifyingKey::from_bytes(&bytes)
            .map_err(|_| SignatureError::InvalidKey)?;
        Ok(Self(key))
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, SignatureError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|_| SignatureError::InvalidKey)?;
        let arr: [u8; 32] = bytes.try_into().map_err(|_| SignatureError::InvalidKey)?;
        Self::from_bytes(arr)
    }

    /// Hex-encoded public key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0.to_bytes())
    }
}

impl Signature {
    /// Raw 64-byte signature.
    pub fn to_bytes(&self) -> [u8; 64] {
        self.0.to_bytes()
    }

    /// Create from raw 64 bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(ed25519_dalek::Signature::from_bytes(&bytes))
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningKey(<redacted>)")
    }
}

impl std::fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VerifyingKey({})", hex::encode(self.0.to_bytes()))
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({}...)", hex::encode(&self.0.to_bytes()[..8]))
    }
}

/// Errors from signing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid key")]
    InvalidKey,
}

mod signature_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(sig: &ed25519_dalek::Signature, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&sig.to_bytes())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<ed25519_dalek::Signature, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes: Vec<u8> = Vec::deserialize(deserializer)?;
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 64-byte signature"))?;
        Ok(ed25519_dalek::Signature::from_bytes(&arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> CollectionId {
        CollectionId::derive("Tejiverse", 0)
    }

    #[test]
    fn sign_and_verify() {
        let sk = SigningKey::generate();
        let vk = sk.verifying_key();
        let sig = sk.sign(b"hello world");
        assert!(vk.verify(b"hello world", &sig).is_ok());
    }

    #[test]
    fn verify_fails_with_wrong_key() {
        let sk1 = SigningKey::generate();
        let sk2 = SigningKey::generate();
        let sig = sk1.sign(b"message");
        assert!(sk2.verifying_key().verify(b"message", &sig).is_err());
    }

    #[test]
    fn claim_signature_verifies() {
        let sk = SigningKey::generate();
        let claim = ClaimMessage::new(collection(), Address::derive("alice"), Some(2));
        let sig = sk.sign_claim(&claim);
        assert!(sk.verifying_key().verify_claim(&claim, &sig).is_ok());
    }

    #[test]
    fn claim_signature_is_bound_to_claimant() {
        let sk = SigningKey::generate();
        let claim = ClaimMessage::new(collection(), Address::derive("alice"), None);
        let sig = sk.sign_claim(&claim);
        let replay = ClaimMessage::new(collection(), Address::derive("mallory"), None);
        assert_eq!(
            sk.verifying_key().verify_claim(&replay, &sig),
            Err(SignatureError::InvalidSignature)
        );
    }

    #[test]
    fn claim_signature_is_bound_to_amount_and_collection() {
        let sk = SigningKey::generate();
        let alice = Address::derive("alice");
        let sig = sk.sign_claim(&ClaimMessage::new(collection(), alice, Some(1)));
        let vk = sk.verifying_key();
        assert!(vk
            .verify_claim(&ClaimMessage::new(collection(), alice, Some(5)), &sig)
            .is_err());
        assert!(vk
            .verify_claim(&ClaimMessage::new(collection(), alice, None), &sig)
            .is_err());
        let other = CollectionId::derive("Other", 0);
        assert!(vk
            .verify_claim(&ClaimMessage::new(other, alice, Some(1)), &sig)
            .is_err());
    }

    #[test]
    fn message_layout() {
        let claim = ClaimMessage::new(collection(), Address::zero(), Some(3));
        let bytes = claim.to_bytes();
        assert_eq!(bytes.len(), 13 + 32 + 20 + 5);
        assert_eq!(&bytes[..13], b"tjv-claim-v1:");
        assert_eq!(&bytes[..12], ContentHasher::CLAIM.domain().as_bytes());
        assert_eq!(bytes[65], 1);
        assert_eq!(&bytes[66..], &3u32.to_le_bytes());
        let unbound = ClaimMessage::new(collection(), Address::zero(), None).to_bytes();
        assert_eq!(unbound.len(), 13 + 32 + 20 + 1);
    }

    #[test]
    fn verifying_key_hex_roundtrip() {
        let vk = SigningKey::generate().verifying_key();
        assert_eq!(VerifyingKey::from_hex(&vk.to_hex()).unwrap(), vk);
        assert_eq!(
            VerifyingKey::from_hex("0x1234"),
            Err(SignatureError::InvalidKey)
        );
    }

    #[test]
    fn signature_serde_roundtrip() {
        let sk = SigningKey::generate();
        let sig = sk.sign(b"test");
        let json = serde_json::to_string(&sig).unwrap();
        let parsed: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig, parsed);
        assert_eq!(Signature::from_bytes(sig.to_bytes()), sig);
    }

    #[test]
    fn debug_redacts_signing_key() {
        let sk = SigningKey::generate();
        assert!(format!("{sk:?}").contains("redacted"));
    }
}
