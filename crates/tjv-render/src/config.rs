use serde::{Deserialize, Serialize};
use tjv_types::TokenId;

/// Static presentation settings of a collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Collection name; token names are `"{name} #{id}"`.
    pub name: String,
    pub description: String,
    /// MIME type of the stored fragments.
    pub fragment_mime: String,
    /// Width and height of the composed SVG, in pixels.
    pub canvas_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            name: "Tejiverse".into(),
            description: "Fully on-chain generative collection.".into(),
            fragment_mime: "image/png".into(),
            canvas_size: 320,
        }
    }
}

/// Operator-controlled reveal settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealSettings {
    pub revealed: bool,
    /// Returned for every token until reveal.
    pub unrevealed_uri: String,
    /// When non-empty after reveal, metadata is served from
    /// `"{base_uri}{token_id}{extension}"` instead of being composed.
    pub base_uri: String,
    pub extension: String,
}

/// Where a token's metadata comes from under the current reveal settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetadataSource {
    Placeholder(String),
    External(String),
    Composed,
}

impl RevealSettings {
    pub fn unrevealed(uri: impl Into<String>) -> Self {
        Self {
            unrevealed_uri: uri.into(),
            ..Self::default()
        }
    }

    /// Resolve the metadata source for a token. Only `Composed` requires a render.
    pub fn source_for(&self, token: TokenId) -> MetadataSource {
        if !self.revealed {
            return MetadataSource::Placeholder(self.unrevealed_uri.clone());
        }
        if self.base_uri.is_empty() {
            return MetadataSource::Composed;
        }
        MetadataSource::External(format!("{}{}{}", self.base_uri, token, self.extension))
    }
}
