/// Errors raised while building a whitelist verifier from configuration.
///
/// Verification itself never errors: a bad proof is simply `false`.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum GateError {
    /// The configured Merkle root is not 32 bytes of hex.
    #[error("invalid merkle root: {0}")]
    InvalidRoot(String),

    /// The configured signer key is not a valid Ed25519 public key.
    #[error("invalid signer key: {0}")]
    InvalidSignerKey(String),
}

pub type GateResult<T> = Result<T, GateError>;
