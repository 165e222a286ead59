//! Token composition for the Tejiverse collection engine.
//!
//! A [`Composer`] reads one fragment per layer from a
//! [`TraitStore`](tjv_store::TraitStore) and stacks them, background first,
//! into an SVG. [`RevealSettings`] decide whether a token URI is a
//! placeholder, an external link, or a composed `data:` document.

pub mod composer;
pub mod config;
pub mod document;
pub mod error;

pub use composer::Composer;
pub use config::{MetadataSource, RenderConfig, RevealSettings};
pub use document::{Attribute, ComposedDocument, ComposedLayer, TokenMetadata};
pub use error::{RenderError, RenderResult};
