use tjv_types::{StorageChunk, TraitItem};

use crate::error::{PackError, PackResult};

/// Partition items into storage chunks that fit `budget` encoded bytes.
///
/// The partition is static: every chunk holds `floor(budget / item_size)`
/// contiguous items (the last may hold fewer), where `item_size` is the
/// largest encoded item. Items keep their input order, so layer/item
/// locality survives packing. Pure: no I/O, no logging.
pub fn pack(items: &[TraitItem], budget: usize) -> PackResult<Vec<StorageChunk>> {
    let Some(item_size) = items.iter().map(TraitItem::encoded_len).max() else {
        return Ok(Vec::new());
    };

    let per_chunk = items_per_chunk(item_size, budget)?;
    Ok(items
        .chunks(per_chunk)
        .map(|slice| StorageChunk::new(slice.to_vec()))
        .collect())
}

/// How many items of `item_size` bytes fit one chunk.
pub fn items_per_chunk(item_size: usize, budget: usize) -> PackResult<usize> {
    // Zero-length items are rejected by the store; size them as one byte here.
    let per_chunk = budget / item_size.max(1);
    if per_chunk == 0 {
        return Err(PackError::ItemTooLarge {
            size: item_size,
            budget,
        });
    }
    Ok(per_chunk)
}
