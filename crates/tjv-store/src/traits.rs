use std::collections::HashSet;

use tjv_types::{Layer, StorageChunk, TraitItem, TraitKey, LAYER_COUNT};

use crate::error::{StoreError, StoreResult};

/// Immutable store of trait fragments keyed by `(layer, item)`.
///
/// All implementations must satisfy these invariants:
/// - Entries are immutable once written. There is no update or delete.
/// - `insert_chunk` is all-or-nothing: every item is validated before any is
///   written, and a failing chunk leaves the store unchanged.
/// - Re-inserting a stored key is rejected with [`StoreError::DuplicateKey`];
///   resubmitting an already-applied chunk therefore fails instead of being
///   silently reapplied.
/// - The store never interprets payloads.
pub trait TraitStore: Send + Sync {
    /// Atomically write every item of a chunk. Returns the number written.
    fn insert_chunk(&self, chunk: &StorageChunk) -> StoreResult<usize>;

    /// Read the item stored at `(layer, item)`.
    ///
    /// Returns [`StoreError::NotFound`] if absent.
    fn get_item(&self, layer: u8, item: u8) -> StoreResult<TraitItem>;

    /// Check whether a key is stored.
    fn contains(&self, key: TraitKey) -> StoreResult<bool>;

    /// Total number of stored items.
    fn len(&self) -> StoreResult<usize>;

    /// Number of stored items in one layer.
    fn item_count(&self, layer: u8) -> StoreResult<usize>;

    /// Stored item count of every layer, in z-order.
    fn layer_counts(&self) -> StoreResult<[u16; LAYER_COUNT]> {
        let mut counts = [0u16; LAYER_COUNT];
        for layer in Layer::ALL {
            // At most 256 keys per layer.
            let count = self.item_count(layer.index())?;
            counts[layer.index() as usize] = u16::try_from(count).unwrap_or(u16::MAX);
        }
        Ok(counts)
    }

    /// Returns `true` if nothing has been stored.
    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Insert chunks in order, stopping at the first failure.
    ///
    /// Each chunk is atomic on its own; chunks before the failing one stay
    /// applied, so callers retry from the failing chunk.
    fn insert_chunks(&self, chunks: &[StorageChunk]) -> StoreResult<usize> {
        let mut written = 0;
        for chunk in chunks {
            written += self.insert_chunk(chunk)?;
        }
        Ok(written)
    }
}

/// Check a chunk against the store's rules before anything is written.
///
/// `stored` reports whether a key is already present.
pub(crate) fn validate_chunk(
    chunk: &StorageChunk,
    budget: usize,
    stored: impl Fn(&TraitKey) -> bool,
) -> StoreResult<()> {
    if chunk.is_empty() {
        return Err(StoreError::EmptyChunk);
    }

    let size = chunk.encoded_len();
    if size > budget {
        return Err(StoreError::ChunkTooLarge { size, budget });
    }

    let mut seen = HashSet::with_capacity(chunk.len());
    for item in &chunk.items {
        let key = item.key();
        if Layer::from_index(item.layer).is_err() {
            return Err(StoreError::UnknownLayer(item.layer));
        }
        if item.data.is_empty() {
            return Err(StoreError::EmptyItem(key));
        }
        if !seen.insert(key) || stored(&key) {
            return Err(StoreError::DuplicateKey(key));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(layer: u8, idx: u8) -> TraitItem {
        TraitItem::from_raw(layer, idx, format!("item-{idx}"), &[idx; 30])
    }

    #[test]
    fn valid_chunk_passes() {
        let chunk = StorageChunk::new(vec![item(0, 0), item(0, 1), item(1, 0)]);
        assert!(validate_chunk(&chunk, 1_000, |_| false).is_ok());
    }

    #[test]
    fn empty_chunk_is_rejected() {
        let err = validate_chunk(&StorageChunk::default(), 1_000, |_| false).unwrap_err();
        assert!(matches!(err, StoreError::EmptyChunk));
    }

    #[test]
    fn duplicate_within_chunk_is_rejected() {
        let chunk = StorageChunk::new(vec![item(2, 3), item(2, 3)]);
        let err = validate_chunk(&chunk, 1_000, |_| false).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(k) if k == TraitKey::new(2, 3)));
    }

    #[test]
    fn duplicate_of_stored_key_is_rejected() {
        let chunk = StorageChunk::new(vec![item(0, 0), item(0, 1)]);
        let err = validate_chunk(&chunk, 1_000, |k| *k == TraitKey::new(0, 1)).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(k) if k == TraitKey::new(0, 1)));
    }

    #[test]
    fn oversized_chunk_is_rejected() {
        let chunk = StorageChunk::new(vec![item(0, 0), item(0, 1)]);
        let err = validate_chunk(&chunk, 50, |_| false).unwrap_err();
        assert!(matches!(err, StoreError::ChunkTooLarge { size: 80, budget: 50 }));
    }

    #[test]
    fn unknown_layer_is_rejected() {
        let chunk = StorageChunk::new(vec![item(6, 0)]);
        let err = validate_chunk(&chunk, 1_000, |_| false).unwrap_err();
        assert!(matches!(err, StoreError::UnknownLayer(6)));
    }

    #[test]
    fn empty_payload_is_rejected() {
        let mut bad = item(1, 1);
        bad.data.clear();
        let err = validate_chunk(&StorageChunk::new(vec![bad]), 1_000, |_| false).unwrap_err();
        assert!(matches!(err, StoreError::EmptyItem(_)));
    }
}
