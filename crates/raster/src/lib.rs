#![deny(unsafe_code)]
//! Variant registry, rasterization and PNG export.
//!
//! This crate sits between `poster-core` (which builds a [`Canvas`] scene) and
//! the CLI. It maps variant names to compositor settings, draws canvases into
//! pixmaps and encodes them as PNG.
//!
//! [`Canvas`]: poster_core::canvas::Canvas

pub mod pixel;
pub mod raster;

#[cfg(feature = "png")]
pub mod snapshot;

use poster_core::error::PosterError;
use poster_core::preset::Style;
use poster_core::settings::PosterSettings;
use poster_core::spec::RenderSpec;
use serde_json::Value;

pub use raster::{render_pixmap, ExportOptions};

/// All available variant names, in display order.
const VARIANT_NAMES: &[&str] = &["classic", "styled", "interactive", "depth"];

/// Named bundles of compositor settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PosterVariant {
    /// Fixed pink swatches, ranged wobble, title and caption.
    Classic,
    /// Preset-driven, outward-biased blobs on a grey background.
    Styled,
    /// User-chosen palette mode with a fixed wobble.
    #[default]
    Interactive,
    /// Grey layers over rainbow shadow stacks.
    Depth,
}

impl PosterVariant {
    /// Looks up a variant by name (case-insensitive).
    ///
    /// Returns `PosterError::UnknownVariant` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, PosterError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(PosterVariant::Classic),
            "styled" => Ok(PosterVariant::Styled),
            "interactive" => Ok(PosterVariant::Interactive),
            "depth" | "3d" => Ok(PosterVariant::Depth),
            _ => Err(PosterError::UnknownVariant(name.to_string())),
        }
    }

    /// Returns a slice of all recognized variant names.
    pub fn list_variants() -> &'static [&'static str] {
        VARIANT_NAMES
    }

    pub fn name(self) -> &'static str {
        match self {
            PosterVariant::Classic => "classic",
            PosterVariant::Styled => "styled",
            PosterVariant::Interactive => "interactive",
            PosterVariant::Depth => "depth",
        }
    }

    pub fn settings(self) -> PosterSettings {
        match self {
            PosterVariant::Classic => PosterSettings::classic(),
            PosterVariant::Styled => PosterSettings::styled(),
            PosterVariant::Interactive => PosterSettings::interactive(),
            PosterVariant::Depth => PosterSettings::depth(),
        }
    }

    /// Settings with `--params` style overrides applied and validated.
    pub fn settings_from_json(self, params: &Value) -> Result<PosterSettings, PosterError> {
        let settings = self.settings().with_overrides(params);
        settings.validate()?;
        Ok(settings)
    }

    /// Default output file name for a render of `spec` under this variant.
    pub fn export_filename(self, spec: &RenderSpec) -> String {
        match self {
            PosterVariant::Depth => format!("3d_poster_seed{}.png", spec.seed),
            PosterVariant::Styled => {
                let style = Style::resolve(spec.style.as_deref());
                format!("poster_{}.png", style.name().to_lowercase())
            }
            PosterVariant::Classic => format!("poster_classic_seed{}.png", spec.seed),
            PosterVariant::Interactive => {
                let params = spec.resolve(&self.settings());
                format!("poster_{}_seed{}.png", params.palette_mode, spec.seed)
            }
        }
    }
}

impl std::fmt::Display for PosterVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
