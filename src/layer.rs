//! Physics layers
//!
//! Every collider lives on exactly one layer. Spatial queries take a
//! `LayerMask` selecting which layers they consider.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of layers a `LayerMask` can address
pub const LAYER_COUNT: u8 = 32;

/// A single physics layer, always in `0..LAYER_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Layer(u8);

/// Layer index outside `0..LAYER_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidLayer(pub u8);

impl fmt::Display for InvalidLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {} out of range (0..{LAYER_COUNT})", self.0)
    }
}

impl std::error::Error for InvalidLayer {}

impl TryFrom<u8> for Layer {
    type Error = InvalidLayer;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Layer::new(index).ok_or(InvalidLayer(index))
    }
}

impl From<Layer> for u8 {
    fn from(layer: Layer) -> Self {
        layer.0
    }
}

impl Layer {
    pub const HEADS: Layer = Layer(0);
    pub const BODIES: Layer = Layer(1);
    pub const ORBS: Layer = Layer(2);
    pub const OBSTACLES: Layer = Layer(3);

    pub const fn new(index: u8) -> Option<Layer> {
        if index < LAYER_COUNT {
            Some(Layer(index))
        } else {
            None
        }
    }

    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    /// Mask containing only this layer
    #[inline]
    pub fn mask(self) -> LayerMask {
        LayerMask(1u32 << self.0)
    }
}

/// Bitmask of layers a query considers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub fn from_layers(layers: &[Layer]) -> Self {
        layers.iter().fold(Self::NONE, |mask, layer| mask.with(*layer))
    }

    #[inline]
    pub fn with(self, layer: Layer) -> Self {
        LayerMask(self.0 | layer.mask().0)
    }

    #[inline]
    pub fn contains(self, layer: Layer) -> bool {
        self.0 & layer.mask().0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Layer> for LayerMask {
    fn from(layer: Layer) -> Self {
        layer.mask()
    }
}
