use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tjv_types::{StorageChunk, TraitItem, TraitKey, DEFAULT_CHUNK_BUDGET};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::{validate_chunk, TraitStore};

/// Header size: 4 bytes length + 4 bytes CRC.
const HEADER_SIZE: usize = 8;

/// Flush/sync strategy for the store log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// `fsync` after every chunk.
    #[default]
    EveryWrite,
    /// Flush to the OS and rely on its page cache.
    OsDefault,
}

/// Configuration for [`LogTraitStore`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogStoreConfig {
    /// Largest accepted chunk, in encoded payload bytes.
    pub max_chunk_bytes: usize,
    /// Sync strategy after each chunk.
    pub sync_mode: SyncMode,
}

impl Default for LogStoreConfig {
    fn default() -> Self {
        Self {
            max_chunk_bytes: DEFAULT_CHUNK_BUDGET,
            sync_mode: SyncMode::default(),
        }
    }
}

struct LogState {
    writer: BufWriter<File>,
    /// End of the last complete record.
    offset: u64,
    items: BTreeMap<TraitKey, TraitItem>,
}

/// Persistent trait store backed by an append-only chunk log.
///
/// Each accepted chunk becomes one record:
///
/// ```text
/// [4 bytes: payload length (little-endian u32)]
/// [4 bytes: CRC32 of payload (little-endian u32)]
/// [N bytes: payload (bincode-serialized StorageChunk)]
/// ```
///
/// Opening the store replays the log into an in-memory index. A torn record
/// at the tail (crash mid-write) is cut off; a record that fails its CRC is
/// skipped with a warning. Chunks are validated against the index before
/// anything is written, so a rejected chunk never reaches the file.
pub struct LogTraitStore {
    path: PathBuf,
    config: LogStoreConfig,
    inner: RwLock<LogState>,
}

impl LogTraitStore {
    /// Open (or create) a store log at the given path.
    pub fn open(path: &Path, config: LogStoreConfig) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        let (items, valid_end) = replay(path)?;
        let file_len = file.metadata()?.len();
        if valid_end < file_len {
            warn!(
                path = %path.display(),
                valid_end,
                file_len,
                "cutting torn tail from store log"
            );
            file.set_len(valid_end)?;
        }

        info!(path = %path.display(), items = items.len(), "trait store opened");

        Ok(Self {
            path: path.to_path_buf(),
            config,
            inner: RwLock::new(LogState {
                writer: BufWriter::new(file),
                offset: valid_end,
                items,
            }),
        })
    }

    /// Path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The active configuration.
    pub fn config(&self) -> &LogStoreConfig {
        &self.config
    }

    /// Bytes of complete records in the log.
    pub fn offset(&self) -> StoreResult<u64> {
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.offset)
    }

    fn append_record(&self, state: &mut LogState, payload: &[u8]) -> io::Result<()> {
        let length = payload.len() as u32;
        let crc = crc32fast::hash(payload);

        state.writer.write_all(&length.to_le_bytes())?;
        state.writer.write_all(&crc.to_le_bytes())?;
        state.writer.write_all(payload)?;
        state.writer.flush()?;
        if self.config.sync_mode == SyncMode::EveryWrite {
            state.writer.get_ref().sync_all()?;
        }
        Ok(())
    }

    /// Drop a partially written record so the next append starts clean.
    fn rollback(&self, state: &mut LogState) -> io::Result<()> {
        let file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        file.set_len(state.offset)?;
        state.writer = BufWriter::new(file);
        Ok(())
    }
}

impl TraitStore for LogTraitStore {
    fn insert_chunk(&self, chunk: &StorageChunk) -> StoreResult<usize> {
        let mut state = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        validate_chunk(chunk, self.config.max_chunk_bytes, |key| {
            state.items.contains_key(key)
        })?;

        let payload =
            bincode::serialize(chunk).map_err(|e| StoreError::Serialization(e.to_string()))?;

        if let Err(e) = self.append_record(&mut state, &payload) {
            if let Err(rollback_err) = self.rollback(&mut state) {
                warn!(error = %rollback_err, "failed to roll back partial store record");
            }
            return Err(e.into());
        }

        let record_offset = state.offset;
        state.offset += (HEADER_SIZE + payload.len()) as u64;
        for item in &chunk.items {
            state.items.insert(item.key(), item.clone());
        }

        debug!(
            offset = record_offset,
            items = chunk.len(),
            bytes = chunk.encoded_len(),
            "chunk appended"
        );
        Ok(chunk.len())
    }

    fn get_item(&self, layer: u8, item: u8) -> StoreResult<TraitItem> {
        let key = TraitKey::new(layer, item);
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        state.items.get(&key).cloned().ok_or(StoreError::NotFound(key))
    }

    fn contains(&self, key: TraitKey) -> StoreResult<bool> {
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.items.contains_key(&key))
    }

    fn len(&self) -> StoreResult<usize> {
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.items.len())
    }

    fn item_count(&self, layer: u8) -> StoreResult<usize> {
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state
            .items
            .range(TraitKey::new(layer, 0)..=TraitKey::new(layer, u8::MAX))
            .count())
    }
}

impl std::fmt::Debug for LogTraitStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogTraitStore")
            .field("path", &self.path)
            .field("config", &self.config)
            .finish()
    }
}

/// Rebuild the index from the log. Returns the items and the end offset of
/// the last complete record.
fn replay(path: &Path) -> StoreResult<(BTreeMap<TraitKey, TraitItem>, u64)> {
    let mut reader = BufReader::new(File::open(path)?);
    let file_len = reader.get_ref().metadata()?.len();
    let mut items = BTreeMap::new();
    let mut offset: u64 = 0;
    let mut records = 0usize;

    while offset + HEADER_SIZE as u64 <= file_len {
        let mut header = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header)?;
        let length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let expected_crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);

        if length == 0 || offset + HEADER_SIZE as u64 + length as u64 > file_len {
            warn!(offset, length, file_len, "incomplete store record; stopping replay");
            break;
        }

        let mut payload = vec![0u8; length as usize];
        reader.read_exact(&mut payload)?;
        let next = offset + HEADER_SIZE as u64 + length as u64;

        let actual_crc = crc32fast::hash(&payload);
        if actual_crc != expected_crc {
            warn!(
                offset,
                expected = expected_crc,
                actual = actual_crc,
                "CRC mismatch; skipping store record"
            );
            offset = next;
            continue;
        }

        let chunk: StorageChunk = bincode::deserialize(&payload).map_err(|e| {
            StoreError::Corrupt {
                offset,
                reason: e.to_string(),
            }
        })?;
        for item in chunk.items {
            let key = item.key();
            if items.contains_key(&key) {
                warn!(offset, %key, "duplicate key in store log; keeping first");
                continue;
            }
            items.insert(key, item);
        }

        records += 1;
        offset = next;
    }

    debug!(records, items = items.len(), "store log replay complete");
    Ok((items, offset))
}
