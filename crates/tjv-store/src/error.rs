use tjv_types::TraitKey;

/// Errors from trait store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No item is stored under the key.
    #[error("trait not found: {0}")]
    NotFound(TraitKey),

    /// The key is already stored, or appears twice in one chunk.
    #[error("duplicate trait key: {0}")]
    DuplicateKey(TraitKey),

    /// Items must carry a non-empty payload.
    #[error("empty payload for trait {0}")]
    EmptyItem(TraitKey),

    /// Layer index outside the fixed category set.
    #[error("unknown layer index {0}")]
    UnknownLayer(u8),

    /// A chunk with no items.
    #[error("chunk has no items")]
    EmptyChunk,

    /// A chunk whose encoded size exceeds the store's budget.
    #[error("chunk of {size} bytes exceeds the {budget}-byte budget")]
    ChunkTooLarge { size: usize, budget: usize },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing log is malformed beyond what recovery tolerates.
    #[error("corrupt store log at offset {offset}: {reason}")]
    Corrupt { offset: u64, reason: String },

    /// A previous writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
