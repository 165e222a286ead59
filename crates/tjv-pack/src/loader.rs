use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tjv_types::{Layer, TraitItem, LAYER_COUNT};
use tracing::debug;

use crate::error::{PackError, PackResult};

/// Load the trait catalog under `root`.
///
/// Each layer reads `root/<LayerName>/`. Items are numbered by their file
/// name in byte-wise lexicographic order, so the same directory always yields
/// the same `(layer, item)` coordinates. The item name is the file stem.
/// Sub-directories and dot-files are ignored.
pub fn load_catalog(root: &Path, layers: &[Layer]) -> PackResult<Vec<TraitItem>> {
    let mut items = Vec::new();
    for &layer in layers {
        items.extend(load_layer(root, layer)?);
    }
    debug!(root = %root.display(), items = items.len(), "trait catalog loaded");
    Ok(items)
}

/// Load a single layer's items.
pub fn load_layer(root: &Path, layer: Layer) -> PackResult<Vec<TraitItem>> {
    let dir = root.join(layer.name());
    let files = sorted_asset_files(&dir)?;
    if files.len() > usize::from(u8::MAX) + 1 {
        return Err(PackError::TooManyItems {
            layer,
            count: files.len(),
        });
    }

    let mut items = Vec::with_capacity(files.len());
    for (index, path) in files.into_iter().enumerate() {
        let raw = fs::read(&path).map_err(|e| PackError::io(&path, e))?;
        if raw.is_empty() {
            return Err(PackError::EmptyAsset(path));
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| PackError::InvalidName(path.clone()))?;
        items.push(TraitItem::from_raw(layer.index(), index as u8, name, &raw));
    }

    debug!(%layer, items = items.len(), "layer loaded");
    Ok(items)
}

/// Item count per layer once `items` join a catalog that already holds
/// `stored` items per layer, in z-order.
///
/// Token traits draw item indices from `0..count`, so every layer must run
/// contiguously from 0. Indices below a layer's stored count, and items of
/// unknown layers, are left for the store to reject.
pub fn layer_sizes(
    stored: [u16; LAYER_COUNT],
    items: &[TraitItem],
) -> PackResult<[u16; LAYER_COUNT]> {
    let mut added: [BTreeSet<u16>; LAYER_COUNT] = Default::default();
    for item in items {
        let layer = usize::from(item.layer);
        let index = u16::from(item.item);
        if let Some(set) = added.get_mut(layer) {
            if index >= stored[layer] {
                set.insert(index);
            }
        }
    }

    let mut sizes = stored;
    for layer in Layer::ALL {
        let size = &mut sizes[layer.index() as usize];
        for &index in &added[layer.index() as usize] {
            if index != *size {
                return Err(PackError::GappedLayer {
                    layer,
                    missing: *size,
                });
            }
            *size += 1;
        }
    }
    Ok(sizes)
}

fn sorted_asset_files(dir: &Path) -> PackResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| PackError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PackError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| PackError::io(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }
        let hidden = entry.file_name().to_str().is_some_and(|n| n.starts_with('.'));
        if hidden {
            continue;
        }
        files.push(entry.path());
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
