use std::path::PathBuf;

use thiserror::Error;
use tjv_types::Layer;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("asset file is empty: {0}")]
    EmptyAsset(PathBuf),

    #[error("asset file name is not valid UTF-8: {0}")]
    InvalidName(PathBuf),

    #[error("layer {layer} has {count} items; at most 256 are addressable")]
    TooManyItems { layer: Layer, count: usize },

    #[error("layer {layer} skips item {missing}; items must be numbered from 0 without gaps")]
    GappedLayer { layer: Layer, missing: u16 },

    #[error("item of {size} bytes does not fit the {budget}-byte chunk budget")]
    ItemTooLarge { size: usize, budget: usize },
}

impl PackError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type PackResult<T> = Result<T, PackError>;
