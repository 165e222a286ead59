use std::fmt::Write as _;

use tjv_store::{StoreError, TraitStore};
use tjv_types::{Layer, TokenId, TokenTraits, TraitItem};
use tracing::debug;

use crate::config::{MetadataSource, RenderConfig, RevealSettings};
use crate::document::{ComposedDocument, ComposedLayer, TokenMetadata};
use crate::error::{RenderError, RenderResult};

/// Assembles tokens from stored fragments.
///
/// Read-only over the store. The same traits and store contents always
/// produce byte-identical output.
pub struct Composer<'a, S: TraitStore + ?Sized> {
    store: &'a S,
    config: &'a RenderConfig,
}

impl<'a, S: TraitStore + ?Sized> Composer<'a, S> {
    pub fn new(store: &'a S, config: &'a RenderConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RenderConfig {
        self.config
    }

    /// Stack one fragment per layer, background first, into an SVG document.
    pub fn render_token(&self, traits: &TokenTraits) -> RenderResult<ComposedDocument> {
        let size = self.config.canvas_size;
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" \
             viewBox=\"0 0 {size} {size}\" shape-rendering=\"crispEdges\">"
        );
        let mut layers = Vec::with_capacity(Layer::ALL.len());

        for (layer, key) in traits.keys() {
            let item = self.fetch(layer, key.item)?;
            let data = fragment_text(&item).ok_or(RenderError::InvalidFragment {
                layer,
                item: key.item,
            })?;
            // Writing into a String cannot fail.
            let _ = write!(
                svg,
                "<image x=\"0\" y=\"0\" width=\"{size}\" height=\"{size}\" \
                 style=\"image-rendering:pixelated\" href=\"data:{};base64,{}\"/>",
                self.config.fragment_mime, data
            );
            layers.push(ComposedLayer {
                layer,
                item: key.item,
                name: item.name,
            });
        }
        svg.push_str("</svg>");

        Ok(ComposedDocument { svg, layers })
    }

    /// The token image as a `data:image/svg+xml` URI.
    pub fn image_uri(&self, traits: &TokenTraits) -> RenderResult<String> {
        Ok(self.render_token(traits)?.image_uri())
    }

    /// Full metadata document of a token.
    pub fn metadata(&self, token: TokenId, traits: &TokenTraits) -> RenderResult<TokenMetadata> {
        Ok(self.render_token(traits)?.metadata(token, self.config))
    }

    /// Resolve a token's URI under the reveal settings.
    ///
    /// Nothing is read from the store unless the token is revealed and no
    /// external base URI is set.
    pub fn token_uri(
        &self,
        token: TokenId,
        traits: &TokenTraits,
        reveal: &RevealSettings,
    ) -> RenderResult<String> {
        match reveal.source_for(token) {
            MetadataSource::Placeholder(uri) | MetadataSource::External(uri) => Ok(uri),
            MetadataSource::Composed => {
                debug!(token, "composing token metadata");
                self.metadata(token, traits)?.to_data_uri()
            }
        }
    }

    fn fetch(&self, layer: Layer, item: u8) -> RenderResult<TraitItem> {
        self.store
            .get_item(layer.index(), item)
            .map_err(|e| match e {
                StoreError::NotFound(_) => RenderError::MissingTrait { layer, item },
                other => RenderError::Store(other),
            })
    }
}

/// The payload as embeddable text, if it is well-formed base64.
fn fragment_text(item: &TraitItem) -> Option<&str> {
    let valid = !item.data.is_empty()
        && item
            .data
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='));
    if !valid {
        return None;
    }
    item.data_str().ok()
}
