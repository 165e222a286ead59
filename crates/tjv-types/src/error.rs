use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unknown layer index: {0}")]
    UnknownLayer(u8),

    #[error("unknown layer name: {0}")]
    UnknownLayerName(String),

    #[error("unknown sale state: {0}")]
    UnknownSaleState(u8),

    #[error("invalid base64 payload: {0}")]
    InvalidEncoding(String),
}
