use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::layer::TraitKey;

/// Default byte budget of one storage chunk.
pub const DEFAULT_CHUNK_BUDGET: usize = 24_000;

/// One selectable option within a trait category.
///
/// `data` is the transport encoding (base64 text) of the raw asset. The store
/// treats it as opaque bytes; the composer embeds it directly in data URIs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitItem {
    pub layer: u8,
    pub item: u8,
    pub name: String,
    pub data: Vec<u8>,
}

impl TraitItem {
    /// Build an item from raw asset bytes, encoding them for transport.
    pub fn from_raw(layer: u8, item: u8, name: impl Into<String>, raw: &[u8]) -> Self {
        Self {
            layer,
            item,
            name: name.into(),
            data: BASE64.encode(raw).into_bytes(),
        }
    }

    /// Store coordinate of this item.
    pub fn key(&self) -> TraitKey {
        TraitKey::new(self.layer, self.item)
    }

    /// Encoded payload length in bytes. This is what counts against a chunk budget.
    pub fn encoded_len(&self) -> usize {
        self.data.len()
    }

    /// The payload as text (base64 is always ASCII).
    pub fn data_str(&self) -> Result<&str, TypeError> {
        std::str::from_utf8(&self.data).map_err(|e| TypeError::InvalidEncoding(e.to_string()))
    }

    /// Decode the payload back to the original asset bytes.
    pub fn decode_raw(&self) -> Result<Vec<u8>, TypeError> {
        BASE64
            .decode(&self.data)
            .map_err(|e| TypeError::InvalidEncoding(e.to_string()))
    }
}

/// A batch of items written to the store in one insert.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageChunk {
    pub items: Vec<TraitItem>,
}

impl StorageChunk {
    pub fn new(items: Vec<TraitItem>) -> Self {
        Self { items }
    }

    /// Number of items in the chunk.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the chunk has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of encoded payload lengths.
    pub fn encoded_len(&self) -> usize {
        self.items.iter().map(TraitItem::encoded_len).sum()
    }

    /// Keys of the chunk's items, in chunk order.
    pub fn keys(&self) -> impl Iterator<Item = TraitKey> + '_ {
        self.items.iter().map(TraitItem::key)
    }
}
