use serde::{Deserialize, Serialize};

use crate::layer::{Layer, TraitKey, LAYER_COUNT};

/// Token identifier. Assigned sequentially from 0 in mint order.
pub type TokenId = u64;

/// Visual composition of a single token: one item index per layer, in z-order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenTraits([u8; LAYER_COUNT]);

impl TokenTraits {
    pub const fn new(items: [u8; LAYER_COUNT]) -> Self {
        Self(items)
    }

    /// Derive traits for a token from the collection seed.
    ///
    /// `layer_sizes[i]` is the number of items available in layer `i`; a zero
    /// size selects item 0. The same inputs always give the same traits.
    pub fn derive(seed: &[u8; 32], token: TokenId, layer_sizes: &[u16; LAYER_COUNT]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"tjv-traits-v1:");
        hasher.update(seed);
        hasher.update(&token.to_le_bytes());
        let hash = hasher.finalize();
        let bytes = hash.as_bytes();

        let mut items = [0u8; LAYER_COUNT];
        for (i, slot) in items.iter_mut().enumerate() {
            let size = layer_sizes[i];
            if size == 0 {
                continue;
            }
            let draw = u32::from_le_bytes([
                bytes[i * 4],
                bytes[i * 4 + 1],
                bytes[i * 4 + 2],
                bytes[i * 4 + 3],
            ]);
            // size <= 256, so the remainder always fits in a u8.
            *slot = (draw % size as u32) as u8;
        }
        Self(items)
    }

    /// Selected item for a layer.
    pub fn item(&self, layer: Layer) -> u8 {
        self.0[layer.index() as usize]
    }

    /// The raw item indices.
    pub fn as_array(&self) -> &[u8; LAYER_COUNT] {
        &self.0
    }

    /// `(layer, store key)` pairs in z-order.
    pub fn keys(&self) -> impl Iterator<Item = (Layer, TraitKey)> + '_ {
        Layer::ALL
            .iter()
            .map(move |&layer| (layer, TraitKey::new(layer.index(), self.item(layer))))
    }
}
