//! The complete, explicit input of one render.
//!
//! A [`RenderSpec`] is what a user (or a JSON config file) provides. Missing
//! fields fall back to the variant's [`PosterSettings`] defaults when the spec
//! is resolved into [`ResolvedParams`]; a named preset overrides them all.

use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::error::PosterError;
use crate::palette::PaletteMode;
use crate::preset::Style;
use crate::prng::Xorshift64;
use crate::settings::{check_range, PosterSettings, MAX_SHADOWS};

/// Upper bound on layers per poster.
pub const MAX_LAYERS: usize = 1000;

/// Wobble magnitude: a fixed value or a range drawn once per layer.
///
/// Serialized as a bare number or a `[lo, hi]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Wobble {
    Fixed(f64),
    Range(f64, f64),
}

impl Wobble {
    /// Returns the wobble for one layer. A fixed wobble consumes no draws.
    pub fn sample(&self, rng: &mut Xorshift64) -> f64 {
        match *self {
            Wobble::Fixed(w) => w,
            Wobble::Range(lo, hi) => rng.next_range(lo, hi),
        }
    }

    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            Wobble::Fixed(w) => (w, w),
            Wobble::Range(lo, hi) => (lo, hi),
        }
    }

    pub fn validate(&self) -> Result<(), PosterError> {
        let (lo, hi) = self.bounds();
        for w in [lo, hi] {
            if !w.is_finite() || w < 0.0 {
                return Err(PosterError::InvalidWobble(w));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Wobble {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Wobble::Fixed(w) => write!(f, "{w}"),
            Wobble::Range(lo, hi) => write!(f, "{lo}..{hi}"),
        }
    }
}

/// User-facing render parameters. Every field except the seed is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSpec {
    pub seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wobble: Option<Wobble>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette_mode: Option<PaletteMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Srgb>,
    /// Preset name, or `"Custom"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Shadow copies per layer; only read by the depth cue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha_range: Option<(f64, f64)>,
}

/// Concrete parameters of one render after preset and default resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedParams {
    pub seed: u64,
    pub style: Style,
    pub layer_count: usize,
    pub wobble: Wobble,
    pub alpha_range: (f64, f64),
    pub palette_mode: PaletteMode,
    pub background: Srgb,
    pub shadow_count: usize,
}

impl RenderSpec {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parses a spec from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Rejects values the compositor cannot honor. Reversed ranges are allowed.
    pub fn validate(&self) -> Result<(), PosterError> {
        if let Some(count) = self.layer_count {
            if count > MAX_LAYERS {
                return Err(PosterError::InvalidLayerCount {
                    count,
                    max: MAX_LAYERS,
                });
            }
        }
        if let Some(wobble) = &self.wobble {
            wobble.validate()?;
        }
        if let Some(alpha) = self.alpha_range {
            check_range("alpha_range", alpha, 0.0, 1.0)?;
        }
        if let Some(shadows) = self.shadow_count {
            if shadows > MAX_SHADOWS {
                return Err(PosterError::InvalidRange {
                    name: "shadow_count".into(),
                    lo: 0.0,
                    hi: shadows as f64,
                });
            }
        }
        Ok(())
    }

    /// Resolves the spec against `settings`.
    ///
    /// A recognized preset replaces layer count, wobble, alpha range and
    /// palette mode, ignoring any ad-hoc values for those fields.
    pub fn resolve(&self, settings: &PosterSettings) -> ResolvedParams {
        let style = Style::resolve(self.style.as_deref());
        let (layer_count, wobble, alpha_range, palette_mode) = match style.preset() {
            Some(preset) => (
                preset.layer_count,
                Wobble::Range(preset.wobble_range.0, preset.wobble_range.1),
                preset.alpha_range,
                preset.palette_mode,
            ),
            None => (
                self.layer_count.unwrap_or(settings.default_layer_count),
                self.wobble.unwrap_or(settings.default_wobble),
                self.alpha_range.unwrap_or(settings.default_alpha_range),
                self.palette_mode.unwrap_or(settings.default_palette_mode),
            ),
        };
        let shadow_count = self
            .shadow_count
            .or(settings.depth.map(|d| d.shadow_count))
            .unwrap_or(0);
        ResolvedParams {
            seed: self.seed,
            style,
            layer_count,
            wobble,
            alpha_range,
            palette_mode,
            background: self.background.unwrap_or(settings.background),
            shadow_count,
        }
    }
}
