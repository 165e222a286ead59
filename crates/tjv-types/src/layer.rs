use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Number of trait layers in a composed token.
pub const LAYER_COUNT: usize = 6;

/// Trait category.
///
/// The declaration order is the composition z-order: `Background` is drawn
/// first, `Mouth` last. The discriminant is the on-store layer index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    Background = 0,
    Base = 1,
    Clothes = 2,
    Eyes = 3,
    Hat = 4,
    Mouth = 5,
}

impl Layer {
    /// All layers in z-order.
    pub const ALL: [Layer; LAYER_COUNT] = [
        Layer::Background,
        Layer::Base,
        Layer::Clothes,
        Layer::Eyes,
        Layer::Hat,
        Layer::Mouth,
    ];

    /// Store index of this layer.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Look up a layer by store index.
    pub fn from_index(index: u8) -> Result<Self, TypeError> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(TypeError::UnknownLayer(index))
    }

    /// Category name, also the asset directory name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Background => "Background",
            Self::Base => "Base",
            Self::Clothes => "Clothes",
            Self::Eyes => "Eyes",
            Self::Hat => "Hat",
            Self::Mouth => "Mouth",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layer {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|layer| layer.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| TypeError::UnknownLayerName(s.to_string()))
    }
}

/// Store coordinate of a trait item: `(layer index, item index)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraitKey {
    pub layer: u8,
    pub item: u8,
}

impl TraitKey {
    pub const fn new(layer: u8, item: u8) -> Self {
        Self { layer, item }
    }
}

impl fmt::Display for TraitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.layer, self.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip() {
        for layer in Layer::ALL {
            assert_eq!(Layer::from_index(layer.index()).unwrap(), layer);
        }
    }

    #[test]
    fn z_order_matches_declaration() {
        let indices: Vec<u8> = Layer::ALL.iter().map(|l| l.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(Layer::Background < Layer::Mouth);
    }

    #[test]
    fn unknown_index_is_rejected() {
        assert_eq!(Layer::from_index(6), Err(TypeError::UnknownLayer(6)));
    }

    #[test]
    fn parse_by_name() {
        assert_eq!("hat".parse::<Layer>().unwrap(), Layer::Hat);
        assert_eq!("Clothes".parse::<Layer>().unwrap(), Layer::Clothes);
        assert!("Shoes".parse::<Layer>().is_err());
    }

    #[test]
    fn trait_key_ordering_is_layer_major() {
        assert!(TraitKey::new(0, 9) < TraitKey::new(1, 0));
        assert_eq!(format!("{}", TraitKey::new(2, 7)), "(2, 7)");
    }
}
