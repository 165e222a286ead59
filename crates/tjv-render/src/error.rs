use thiserror::Error;
use tjv_store::StoreError;
use tjv_types::Layer;

#[derive(Debug, Error)]
pub enum RenderError {
    /// A layer's selected item is not in the store.
    #[error("missing trait: {layer} item {item}")]
    MissingTrait { layer: Layer, item: u8 },

    /// A stored payload is not base64 text and cannot be embedded.
    #[error("fragment for {layer} item {item} is not base64 text")]
    InvalidFragment { layer: Layer, item: u8 },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
