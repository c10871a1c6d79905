//! Scene model produced by the compositor.
//!
//! A [`Canvas`] holds the physical poster size, a background color, an
//! ordered stack of [`Layer`]s and the text [`Label`]s drawn on top. Layers
//! are drawn bottom-to-top (index 0 = bottom); each layer draws its shadow
//! stack first, then its own fill.
//!
//! Coordinates are in the unit square with y pointing up. Shapes may extend
//! past the square and are clipped when rasterized.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::blob::Shape;
use crate::color::Srgb;
use crate::error::PosterError;
use crate::settings::TextAlign;

/// A tinted copy of a layer's shape drawn beneath it, shifted by `offset`.
///
/// Only the offset is stored; the rasterizer reuses the layer's path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub offset: DVec2,
    pub color: Srgb,
    pub alpha: f64,
}

/// Where a layer came from. Kept for inspection and regression tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub center: DVec2,
    pub radius: f64,
    pub wobble: f64,
    /// Palette entry the fill came from; `None` for fills not taken from a palette.
    pub palette_index: Option<usize>,
}

/// A single filled blob with its shadow stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    shape: Shape,
    fill: Srgb,
    alpha: f64,
    shadows: Vec<Shadow>,
    provenance: Provenance,
}

impl Layer {
    /// Creates a layer. Alpha is clamped to [0.0, 1.0].
    pub fn new(shape: Shape, fill: Srgb, alpha: f64, provenance: Provenance) -> Self {
        Self {
            shape,
            fill,
            alpha: alpha.clamp(0.0, 1.0),
            shadows: Vec::new(),
            provenance,
        }
    }

    /// Returns a new layer with the given shadow stack (drawn first to last).
    pub fn with_shadows(mut self, shadows: Vec<Shadow>) -> Self {
        self.shadows = shadows;
        self
    }

    pub fn shape(&self) -> &[DVec2] {
        &self.shape
    }

    pub fn fill(&self) -> Srgb {
        self.fill
    }

    /// Returns the opacity in [0.0, 1.0].
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn shadows(&self) -> &[Shadow] {
        &self.shadows
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }
}

/// Text drawn above all layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    /// Baseline anchor in unit coordinates.
    pub position: DVec2,
    pub size_pt: f64,
    pub bold: bool,
    pub color: Srgb,
    pub align: TextAlign,
}

/// The poster scene: size, background, layers and labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Canvas {
    width_in: f64,
    height_in: f64,
    background: Srgb,
    layers: Vec<Layer>,
    labels: Vec<Label>,
}

impl Canvas {
    /// Creates an empty canvas of the given physical size in inches.
    ///
    /// Returns `PosterError::InvalidDimensions` unless both sides are finite
    /// and positive.
    pub fn new(width_in: f64, height_in: f64, background: Srgb) -> Result<Self, PosterError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width_in) || !valid(height_in) {
            return Err(PosterError::InvalidDimensions(format!(
                "canvas must be positive, got {width_in}x{height_in} in"
            )));
        }
        Ok(Self {
            width_in,
            height_in,
            background,
            layers: Vec::new(),
            labels: Vec::new(),
        })
    }

    pub fn width_in(&self) -> f64 {
        self.width_in
    }

    pub fn height_in(&self) -> f64 {
        self.height_in
    }

    pub fn background(&self) -> Srgb {
        self.background
    }

    /// Returns the number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Returns all layers in bottom-to-top order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Adds a layer to the top of the stack.
    pub fn push_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn push_label(&mut self, label: Label) {
        self.labels.push(label);
    }
}
