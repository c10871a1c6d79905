//! Named style presets.
//!
//! A preset is a static bundle of layer count, wobble range, alpha range and
//! palette mode. Presets are looked up once, when a [`RenderSpec`] is
//! resolved, into a [`Style`] value; names that match no preset resolve to
//! [`Style::Custom`].
//!
//! [`RenderSpec`]: crate::spec::RenderSpec

use serde::Serialize;

use crate::palette::PaletteMode;

/// A named, read-only bundle of generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StylePreset {
    pub name: &'static str,
    pub layer_count: usize,
    pub wobble_range: (f64, f64),
    pub alpha_range: (f64, f64),
    pub palette_mode: PaletteMode,
}

/// Preset table, in display order.
pub const PRESETS: &[StylePreset] = &[
    StylePreset {
        name: "Minimal",
        layer_count: 5,
        wobble_range: (0.02, 0.08),
        alpha_range: (0.30, 0.50),
        palette_mode: PaletteMode::Pastel,
    },
    StylePreset {
        name: "Vivid",
        layer_count: 12,
        wobble_range: (0.05, 0.20),
        alpha_range: (0.35, 0.70),
        palette_mode: PaletteMode::Vivid,
    },
    StylePreset {
        name: "NoiseTouch",
        layer_count: 14,
        wobble_range: (0.12, 0.30),
        alpha_range: (0.25, 0.55),
        palette_mode: PaletteMode::Mono,
    },
];

/// Name shown for renders that use no preset.
pub const CUSTOM_STYLE_NAME: &str = "Custom";

/// Either a preset from [`PRESETS`] or the caller's own parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Style {
    Preset(&'static StylePreset),
    Custom,
}

impl Style {
    /// Resolves an optional style name. Matching is case-insensitive.
    ///
    /// `None`, `"Custom"` and unknown names all resolve to [`Style::Custom`].
    pub fn resolve(name: Option<&str>) -> Self {
        let Some(name) = name.map(str::trim) else {
            return Style::Custom;
        };
        match find_preset(name) {
            Some(preset) => Style::Preset(preset),
            None => {
                if !name.eq_ignore_ascii_case(CUSTOM_STYLE_NAME) {
                    tracing::debug!(style = name, "unknown style preset, using custom parameters");
                }
                Style::Custom
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Style::Preset(p) => p.name,
            Style::Custom => CUSTOM_STYLE_NAME,
        }
    }

    pub fn preset(&self) -> Option<&'static StylePreset> {
        match self {
            Style::Preset(p) => Some(p),
            Style::Custom => None,
        }
    }
}

/// Finds a preset by case-insensitive name.
pub fn find_preset(name: &str) -> Option<&'static StylePreset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Preset names followed by the custom entry, as offered to users.
pub fn style_names() -> Vec<&'static str> {
    PRESETS
        .iter()
        .map(|p| p.name)
        .chain(std::iter::once(CUSTOM_STYLE_NAME))
        .collect()
}
