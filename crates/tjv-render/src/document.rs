use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use tjv_types::{Layer, TokenId};

use crate::config::RenderConfig;
use crate::error::{RenderError, RenderResult};

/// One layer's contribution to a composed token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposedLayer {
    pub layer: Layer,
    pub item: u8,
    pub name: String,
}

/// A token's visual document: the layered SVG plus the trait names that built it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposedDocument {
    pub svg: String,
    pub layers: Vec<ComposedLayer>,
}

impl ComposedDocument {
    /// The SVG as a self-contained `data:` URI.
    pub fn image_uri(&self) -> String {
        format!("data:image/svg+xml;base64,{}", BASE64.encode(self.svg.as_bytes()))
    }

    /// Wrap the visual document into the token's metadata.
    pub fn metadata(&self, token: TokenId, config: &RenderConfig) -> TokenMetadata {
        TokenMetadata {
            name: format!("{} #{}", config.name, token),
            description: config.description.clone(),
            image: self.image_uri(),
            attributes: self
                .layers
                .iter()
                .map(|l| Attribute {
                    trait_type: l.layer.name().to_string(),
                    value: l.name.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

/// Full metadata document of a revealed token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<Attribute>,
}

impl TokenMetadata {
    pub fn to_json(&self) -> RenderResult<String> {
        serde_json::to_string(self).map_err(|e| RenderError::Serialization(e.to_string()))
    }

    /// The JSON document as a self-contained `data:` URI.
    pub fn to_data_uri(&self) -> RenderResult<String> {
        let json = self.to_json()?;
        Ok(format!(
            "data:application/json;base64,{}",
            BASE64.encode(json.as_bytes())
        ))
    }
}
