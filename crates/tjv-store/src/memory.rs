use std::collections::BTreeMap;
use std::sync::RwLock;

use tjv_types::{StorageChunk, TraitItem, TraitKey, DEFAULT_CHUNK_BUDGET};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{validate_chunk, TraitStore};

/// In-memory, BTreeMap-based trait store.
///
/// Intended for tests and embedding. Items are held behind a `RwLock`;
/// an insert holds the write lock across validation and apply.
pub struct InMemoryTraitStore {
    budget: usize,
    items: RwLock<BTreeMap<TraitKey, TraitItem>>,
}

impl InMemoryTraitStore {
    /// Create an empty store with the default chunk budget.
    pub fn new() -> Self {
        Self::with_budget(DEFAULT_CHUNK_BUDGET)
    }

    /// Create an empty store accepting chunks up to `budget` encoded bytes.
    pub fn with_budget(budget: usize) -> Self {
        Self {
            budget,
            items: RwLock::new(BTreeMap::new()),
        }
    }

    /// Chunk byte budget.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// All stored keys in `(layer, item)` order.
    pub fn keys(&self) -> StoreResult<Vec<TraitKey>> {
        let map = self.items.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.keys().copied().collect())
    }
}

impl Default for InMemoryTraitStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TraitStore for InMemoryTraitStore {
    fn insert_chunk(&self, chunk: &StorageChunk) -> StoreResult<usize> {
        let mut map = self.items.write().map_err(|_| StoreError::LockPoisoned)?;
        validate_chunk(chunk, self.budget, |key| map.contains_key(key))?;

        for item in &chunk.items {
            map.insert(item.key(), item.clone());
        }
        debug!(items = chunk.len(), bytes = chunk.encoded_len(), "chunk inserted");
        Ok(chunk.len())
    }

    fn get_item(&self, layer: u8, item: u8) -> StoreResult<TraitItem> {
        let key = TraitKey::new(layer, item);
        let map = self.items.read().map_err(|_| StoreError::LockPoisoned)?;
        map.get(&key).cloned().ok_or(StoreError::NotFound(key))
    }

    fn contains(&self, key: TraitKey) -> StoreResult<bool> {
        let map = self.items.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.contains_key(&key))
    }

    fn len(&self) -> StoreResult<usize> {
        let map = self.items.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.len())
    }

    fn item_count(&self, layer: u8) -> StoreResult<usize> {
        let map = self.items.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map
            .range(TraitKey::new(layer, 0)..=TraitKey::new(layer, u8::MAX))
            .count())
    }
}

impl std::fmt::Debug for InMemoryTraitStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.items.read().map(|m| m.len()).unwrap_or(0);
        f.debug_struct("InMemoryTraitStore")
            .field("budget", &self.budget)
            .field("item_count", &count)
            .finish()
    }
}
