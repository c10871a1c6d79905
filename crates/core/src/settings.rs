//! Compositor settings: the per-variant knobs that a [`RenderSpec`] does not
//! carry (vertex count, radius ranges, palette size, labels, depth cue).
//!
//! Each poster variant is a [`PosterSettings`] value. Settings also supply the
//! default bundle used when a render names no preset.
//!
//! [`RenderSpec`]: crate::spec::RenderSpec

use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::blob::{BlobParams, BIASED_CENTERING, CANONICAL_CENTERING};
use crate::color::Srgb;
use crate::error::PosterError;
use crate::palette::{PaletteMode, CLASSIC_SWATCHES, DEFAULT_MONO_HUE};
use crate::params::{param_bool, param_color, param_f64, param_range, param_string, param_usize};
use crate::spec::Wobble;

/// Upper bound on vertices per blob.
pub const MAX_POINTS: usize = 10_000;
/// Upper bound on shadow copies per layer.
pub const MAX_SHADOWS: usize = 100;

/// Where the primary palette comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteSource {
    /// HSV sampling under the render's palette mode.
    Generated,
    /// Sampling with replacement from fixed swatches; the palette mode is ignored.
    Swatches(Vec<Srgb>),
}

/// Horizontal alignment of a label relative to its anchor point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Start,
    Middle,
}

/// A text label with `{style}`, `{mode}`, `{seed}` and `{layers}` placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTemplate {
    pub text: String,
    /// Baseline anchor in unit coordinates (y up).
    pub position: DVec2,
    pub size_pt: f64,
    pub bold: bool,
    pub color: Srgb,
    pub align: TextAlign,
}

impl LabelTemplate {
    pub fn new(text: &str, x: f64, y: f64, size_pt: f64) -> Self {
        Self {
            text: text.to_string(),
            position: DVec2::new(x, y),
            size_pt,
            bold: false,
            color: Srgb::BLACK,
            align: TextAlign::Start,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_color(mut self, color: Srgb) -> Self {
        self.color = color;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = TextAlign::Middle;
        self
    }

    /// Substitutes the placeholders.
    pub fn render_text(&self, style: &str, mode: PaletteMode, seed: u64, layers: usize) -> String {
        self.text
            .replace("{style}", style)
            .replace("{mode}", mode.name())
            .replace("{seed}", &seed.to_string())
            .replace("{layers}", &layers.to_string())
    }
}

/// Depth-cue behavior: grey index-colored layers, one large layer, and a
/// rainbow shadow stack under every layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthCue {
    /// Default number of shadow copies per layer.
    pub shadow_count: usize,
    /// Offset of the deepest shadow; copy `j` is offset by `(j + 1) / n` of it.
    pub shadow_offset: DVec2,
    pub shadow_alpha: f64,
    /// Radius range for the single large layer.
    pub large_radius_range: (f64, f64),
    /// Per-channel brightening added per layer index.
    pub brighten_step: f64,
    pub alpha_base: f64,
    pub alpha_step: f64,
}

impl Default for DepthCue {
    fn default() -> Self {
        Self {
            shadow_count: 10,
            shadow_offset: DVec2::new(0.02, -0.02),
            shadow_alpha: 0.1,
            large_radius_range: (0.15, 0.3),
            brighten_step: 0.01,
            alpha_base: 0.4,
            alpha_step: 0.08,
        }
    }
}

/// Compositor knobs for one poster variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosterSettings {
    /// Physical poster size; the exporter multiplies by DPI.
    pub width_in: f64,
    pub height_in: f64,
    pub points: usize,
    pub centering: f64,
    pub endpoint: bool,
    pub radius_range: (f64, f64),
    pub palette_size: usize,
    pub palette_source: PaletteSource,
    pub mono_hue: f64,
    // Defaults for renders without a preset.
    pub default_layer_count: usize,
    pub default_wobble: Wobble,
    pub default_alpha_range: (f64, f64),
    pub default_palette_mode: PaletteMode,
    pub background: Srgb,
    pub title: Option<LabelTemplate>,
    pub caption: Option<LabelTemplate>,
    pub depth: Option<DepthCue>,
}

impl Default for PosterSettings {
    fn default() -> Self {
        Self::interactive()
    }
}

impl PosterSettings {
    /// Fixed swatch palette, ranged wobble, title and caption.
    pub fn classic() -> Self {
        Self {
            width_in: 7.0,
            height_in: 10.0,
            points: 25,
            centering: CANONICAL_CENTERING,
            endpoint: true,
            radius_range: (0.15, 0.45),
            palette_size: 6,
            palette_source: PaletteSource::Swatches(CLASSIC_SWATCHES.to_vec()),
            mono_hue: DEFAULT_MONO_HUE,
            default_layer_count: 8,
            default_wobble: Wobble::Range(0.05, 0.25),
            default_alpha_range: (0.25, 0.6),
            default_palette_mode: PaletteMode::Random,
            background: Srgb::new(0.98, 0.98, 0.97),
            title: Some(LabelTemplate::new("Generative Poster", 0.05, 0.95, 18.0).bold()),
            caption: Some(LabelTemplate::new(
                "seed {seed} \u{2022} {layers} layers",
                0.05,
                0.91,
                11.0,
            )),
            depth: None,
        }
    }

    /// Preset-driven poster with dense, outward-biased blobs.
    pub fn styled() -> Self {
        Self {
            width_in: 7.0,
            height_in: 10.0,
            points: 900,
            centering: BIASED_CENTERING,
            endpoint: false,
            radius_range: (0.05, 0.3),
            palette_size: 30,
            palette_source: PaletteSource::Generated,
            mono_hue: DEFAULT_MONO_HUE,
            default_layer_count: 10,
            default_wobble: Wobble::Range(0.2, 0.7),
            default_alpha_range: (0.38, 0.3),
            default_palette_mode: PaletteMode::Pastel,
            background: Srgb::new(0.4, 0.4, 0.4),
            title: Some(
                LabelTemplate::new("Generative Poster \u{2022} {style}", 0.05, 0.95, 14.0)
                    .bold()
                    .with_color(Srgb::WHITE),
            ),
            caption: None,
            depth: None,
        }
    }

    /// Fixed wobble with the palette mode chosen by the user.
    pub fn interactive() -> Self {
        Self {
            width_in: 6.0,
            height_in: 8.0,
            points: 200,
            centering: CANONICAL_CENTERING,
            endpoint: false,
            radius_range: (0.15, 0.45),
            palette_size: 6,
            palette_source: PaletteSource::Generated,
            mono_hue: DEFAULT_MONO_HUE,
            default_layer_count: 8,
            default_wobble: Wobble::Fixed(0.15),
            default_alpha_range: (0.09, 0.3),
            default_palette_mode: PaletteMode::Pastel,
            background: Srgb::new(1.0, 1.0, 0.0),
            title: Some(
                LabelTemplate::new("Interactive Poster \u{2022} {mode}", 0.05, 0.95, 12.0).bold(),
            ),
            caption: None,
            depth: None,
        }
    }

    /// Depth-cue poster: small grey blobs, one large blob, rainbow shadows.
    pub fn depth() -> Self {
        Self {
            width_in: 6.0,
            height_in: 7.0,
            points: 500,
            centering: CANONICAL_CENTERING,
            endpoint: false,
            radius_range: (0.02, 0.08),
            palette_size: 0,
            palette_source: PaletteSource::Generated,
            mono_hue: DEFAULT_MONO_HUE,
            default_layer_count: 50,
            default_wobble: Wobble::Fixed(0.12),
            default_alpha_range: (0.4, 1.0),
            default_palette_mode: PaletteMode::Grey,
            background: Srgb::new(0.95, 0.95, 0.95),
            title: Some(
                LabelTemplate::new("3D-like Generative Poster", 0.5, 0.985, 14.0)
                    .bold()
                    .centered(),
            ),
            caption: None,
            depth: Some(DepthCue::default()),
        }
    }

    /// Blob parameters for one layer.
    pub fn blob_params(&self, wobble: f64) -> BlobParams {
        BlobParams {
            points: self.points,
            wobble,
            centering: self.centering,
            endpoint: self.endpoint,
        }
    }

    /// Palette size for a render with `layer_count` layers.
    ///
    /// The depth cue colors layer `i` with palette entry `i`, so its palette
    /// tracks the layer count; otherwise the size is fixed.
    pub fn palette_len(&self, layer_count: usize) -> usize {
        if self.depth.is_some() {
            layer_count
        } else {
            self.palette_size
        }
    }

    /// Applies overrides from a JSON object, keeping current values for
    /// anything missing or malformed.
    pub fn with_overrides(mut self, params: &Value) -> Self {
        self.width_in = param_f64(params, "width_in", self.width_in);
        self.height_in = param_f64(params, "height_in", self.height_in);
        self.points = param_usize(params, "points", self.points);
        self.centering = param_f64(params, "centering", self.centering);
        self.endpoint = param_bool(params, "endpoint", self.endpoint);
        self.radius_range = param_range(params, "radius_range", self.radius_range);
        self.palette_size = param_usize(params, "palette_size", self.palette_size);
        self.mono_hue = param_f64(params, "mono_hue", self.mono_hue);
        self.default_alpha_range = param_range(params, "alpha_range", self.default_alpha_range);
        self.background = param_color(params, "background", self.background);
        if let Some(title) = self.title.as_mut() {
            title.text = param_string(params, "title", &title.text);
        }
        if let Some(caption) = self.caption.as_mut() {
            caption.text = param_string(params, "caption", &caption.text);
        }
        if let Some(depth) = self.depth.as_mut() {
            depth.shadow_alpha = param_f64(params, "shadow_alpha", depth.shadow_alpha);
            depth.shadow_offset.x = param_f64(params, "shadow_offset_x", depth.shadow_offset.x);
            depth.shadow_offset.y = param_f64(params, "shadow_offset_y", depth.shadow_offset.y);
            depth.large_radius_range =
                param_range(params, "large_radius_range", depth.large_radius_range);
            depth.brighten_step = param_f64(params, "brighten_step", depth.brighten_step);
        }
        self
    }

    /// Schema of the keys accepted by [`PosterSettings::with_overrides`].
    pub fn param_schema(&self) -> Value {
        let mut schema = json!({
            "width_in": {"type": "number", "default": self.width_in, "min": 0.5, "max": 48.0,
                "description": "Poster width in inches"},
            "height_in": {"type": "number", "default": self.height_in, "min": 0.5, "max": 48.0,
                "description": "Poster height in inches"},
            "points": {"type": "integer", "default": self.points, "min": 3, "max": MAX_POINTS,
                "description": "Vertices per blob"},
            "centering": {"type": "number", "default": self.centering, "min": 0.0, "max": 1.0,
                "description": "Centering constant c in r * (1 + w * (u - c))"},
            "endpoint": {"type": "boolean", "default": self.endpoint,
                "description": "Repeat the first angle as the last vertex"},
            "radius_range": {"type": "range", "default": [self.radius_range.0, self.radius_range.1],
                "description": "Base radius range in unit coordinates"},
            "palette_size": {"type": "integer", "default": self.palette_size, "min": 1,
                "description": "Colors in the primary palette"},
            "mono_hue": {"type": "number", "default": self.mono_hue, "min": 0.0, "max": 1.0,
                "description": "Hue used by the mono palette mode"},
            "alpha_range": {"type": "range",
                "default": [self.default_alpha_range.0, self.default_alpha_range.1],
                "description": "Layer opacity range when no preset is selected"},
            "background": {"type": "color", "default": self.background.to_hex(),
                "description": "Default background color"},
        });
        if let Some(obj) = schema.as_object_mut() {
            if let Some(title) = &self.title {
                obj.insert(
                    "title".into(),
                    json!({"type": "string", "default": title.text,
                        "description": "Title text ({style}, {mode}, {seed}, {layers})"}),
                );
            }
            if let Some(caption) = &self.caption {
                obj.insert(
                    "caption".into(),
                    json!({"type": "string", "default": caption.text,
                        "description": "Caption text ({style}, {mode}, {seed}, {layers})"}),
                );
            }
            if let Some(depth) = &self.depth {
                obj.insert(
                    "shadow_alpha".into(),
                    json!({"type": "number", "default": depth.shadow_alpha, "min": 0.0, "max": 1.0,
                        "description": "Opacity of each shadow copy"}),
                );
                obj.insert(
                    "shadow_offset_x".into(),
                    json!({"type": "number", "default": depth.shadow_offset.x,
                        "description": "Horizontal offset of the deepest shadow"}),
                );
                obj.insert(
                    "shadow_offset_y".into(),
                    json!({"type": "number", "default": depth.shadow_offset.y,
                        "description": "Vertical offset of the deepest shadow"}),
                );
                obj.insert(
                    "large_radius_range".into(),
                    json!({"type": "range",
                        "default": [depth.large_radius_range.0, depth.large_radius_range.1],
                        "description": "Radius range of the single large layer"}),
                );
                obj.insert(
                    "brighten_step".into(),
                    json!({"type": "number", "default": depth.brighten_step, "min": 0.0,
                        "description": "Brightening added per layer index"}),
                );
            }
        }
        schema
    }

    /// Rejects settings the compositor cannot honor.
    pub fn validate(&self) -> Result<(), PosterError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.width_in) || !positive(self.height_in) {
            return Err(PosterError::InvalidDimensions(format!(
                "poster size must be positive, got {}x{} in",
                self.width_in, self.height_in
            )));
        }
        if self.points < 3 || self.points > MAX_POINTS {
            return Err(PosterError::InvalidPointCount(self.points));
        }
        check_range("radius_range", self.radius_range, 0.0, f64::INFINITY)?;
        check_range("alpha_range", self.default_alpha_range, 0.0, 1.0)?;
        check_range("centering", (self.centering, self.centering), 0.0, 1.0)?;
        check_range("mono_hue", (self.mono_hue, self.mono_hue), 0.0, 1.0)?;
        if self.depth.is_none() && self.palette_size == 0 {
            return Err(PosterError::InvalidPalette(
                "palette_size must be at least 1".to_string(),
            ));
        }
        if let PaletteSource::Swatches(swatches) = &self.palette_source {
            if swatches.is_empty() {
                return Err(PosterError::InvalidPalette(
                    "swatch list is empty".to_string(),
                ));
            }
        }
        if let Some(depth) = &self.depth {
            if depth.shadow_count > MAX_SHADOWS {
                return Err(PosterError::InvalidRange {
                    name: "shadow_count".into(),
                    lo: 0.0,
                    hi: depth.shadow_count as f64,
                });
            }
            check_range("large_radius_range", depth.large_radius_range, 0.0, f64::INFINITY)?;
            check_range("shadow_alpha", (depth.shadow_alpha, depth.shadow_alpha), 0.0, 1.0)?;
        }
        Ok(())
    }
}

/// Checks that both bounds are finite and inside `[min, max]`. Order is free.
pub(crate) fn check_range(
    name: &str,
    (lo, hi): (f64, f64),
    min: f64,
    max: f64,
) -> Result<(), PosterError> {
    let ok = |v: f64| v.is_finite() && v >= min && v <= max;
    if ok(lo) && ok(hi) {
        Ok(())
    } else {
        Err(PosterError::InvalidRange {
            name: name.to_string(),
            lo,
            hi,
        })
    }
}
