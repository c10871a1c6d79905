//! Palettes: HSV-sampled color lists and the rainbow shadow gradient.
//!
//! A [`Palette`] is an ordered, non-empty list of sRGB colors built once per
//! render and never mutated afterwards. Random palettes draw from the caller's
//! [`Xorshift64`], so a palette is fully determined by the seed and the draws
//! made before it.

use crate::color::{hsv_to_srgb, Hsv, Srgb};
use crate::error::PosterError;
use crate::prng::Xorshift64;
use serde::{Deserialize, Serialize};

/// Default hue for [`PaletteMode::Mono`] (a mid blue).
pub const DEFAULT_MONO_HUE: f64 = 0.60;

/// Stops of the shadow gradient: red, orange, yellow, green, blue, indigo, violet.
const RAINBOW_STOPS: [Srgb; 7] = [
    Srgb::new(1.0, 0.0, 0.0),
    Srgb::new(1.0, 0.5, 0.0),
    Srgb::new(1.0, 1.0, 0.0),
    Srgb::new(0.0, 1.0, 0.0),
    Srgb::new(0.0, 0.0, 1.0),
    Srgb::new(0.29, 0.0, 0.51),
    Srgb::new(0.58, 0.0, 0.83),
];

/// Swatches used by the classic poster: light pink, pale violet red, plum.
pub const CLASSIC_SWATCHES: [Srgb; 3] = [
    Srgb::new(255.0 / 255.0, 182.0 / 255.0, 193.0 / 255.0),
    Srgb::new(219.0 / 255.0, 112.0 / 255.0, 147.0 / 255.0),
    Srgb::new(221.0 / 255.0, 160.0 / 255.0, 221.0 / 255.0),
];

/// Named HSV sampling rule.
///
/// Deserializes through [`PaletteMode::from_name`], so config files with an
/// unknown mode still load and render with [`PaletteMode::Random`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum PaletteMode {
    Pastel,
    Vivid,
    Mono,
    Dark,
    Grey,
    #[default]
    Random,
}

impl PaletteMode {
    pub const ALL: [PaletteMode; 6] = [
        PaletteMode::Pastel,
        PaletteMode::Vivid,
        PaletteMode::Mono,
        PaletteMode::Dark,
        PaletteMode::Grey,
        PaletteMode::Random,
    ];

    /// Looks up a mode by name, case-insensitively.
    ///
    /// Unrecognized names fall back to [`PaletteMode::Random`]; this never fails.
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        match Self::ALL
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(trimmed))
        {
            Some(mode) => *mode,
            None if trimmed.eq_ignore_ascii_case("gray") => PaletteMode::Grey,
            None => {
                tracing::debug!(mode = trimmed, "unknown palette mode, using random");
                PaletteMode::Random
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PaletteMode::Pastel => "pastel",
            PaletteMode::Vivid => "vivid",
            PaletteMode::Mono => "mono",
            PaletteMode::Dark => "dark",
            PaletteMode::Grey => "grey",
            PaletteMode::Random => "random",
        }
    }

    /// Returns the documented `(lo, hi)` bounds for saturation and value.
    pub fn sv_bounds(self) -> ((f64, f64), (f64, f64)) {
        match self {
            PaletteMode::Pastel => ((0.15, 0.35), (0.90, 1.00)),
            PaletteMode::Vivid => ((0.80, 1.00), (0.80, 1.00)),
            PaletteMode::Mono => ((0.20, 0.60), (0.50, 1.00)),
            PaletteMode::Dark => ((0.80, 1.00), (0.20, 0.50)),
            PaletteMode::Grey => ((0.0, 0.0), (0.10, 0.60)),
            PaletteMode::Random => ((0.30, 1.00), (0.50, 1.00)),
        }
    }

    /// Draws one HSV color under this mode.
    ///
    /// Draw order is hue (when random), saturation (when random), then value.
    pub fn sample_hsv(self, base_hue: f64, rng: &mut Xorshift64) -> Hsv {
        let ((s_lo, s_hi), (v_lo, v_hi)) = self.sv_bounds();
        match self {
            PaletteMode::Mono => Hsv {
                h: base_hue,
                s: rng.next_range(s_lo, s_hi),
                v: rng.next_range(v_lo, v_hi),
            },
            PaletteMode::Grey => Hsv {
                h: 0.0,
                s: 0.0,
                v: rng.next_range(v_lo, v_hi),
            },
            _ => {
                let h = rng.next_f64();
                let s = rng.next_range(s_lo, s_hi);
                let v = rng.next_range(v_lo, v_hi);
                Hsv { h, s, v }
            }
        }
    }
}

impl From<String> for PaletteMode {
    fn from(name: String) -> Self {
        PaletteMode::from_name(&name)
    }
}

impl std::fmt::Display for PaletteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered, non-empty list of colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Srgb>,
}

impl Palette {
    /// Creates a palette from explicit colors. Requires at least one color.
    pub fn new(colors: Vec<Srgb>) -> Result<Self, PosterError> {
        if colors.is_empty() {
            return Err(PosterError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        Ok(Self { colors })
    }

    /// Draws `k` HSV triples under `mode`, in palette order.
    pub fn generate_hsv(
        k: usize,
        mode: PaletteMode,
        base_hue: f64,
        rng: &mut Xorshift64,
    ) -> Result<Vec<Hsv>, PosterError> {
        if k == 0 {
            return Err(PosterError::InvalidPalette(
                "palette size must be at least 1".to_string(),
            ));
        }
        Ok((0..k).map(|_| mode.sample_hsv(base_hue, rng)).collect())
    }

    /// Generates `k` colors under `mode`, converting each HSV draw to sRGB.
    ///
    /// `base_hue` is only read by [`PaletteMode::Mono`].
    pub fn generate(
        k: usize,
        mode: PaletteMode,
        base_hue: f64,
        rng: &mut Xorshift64,
    ) -> Result<Self, PosterError> {
        let colors = Self::generate_hsv(k, mode, base_hue, rng)?
            .into_iter()
            .map(hsv_to_srgb)
            .collect();
        Ok(Self { colors })
    }

    /// Picks `k` colors from `swatches` with replacement.
    pub fn from_swatches(
        swatches: &[Srgb],
        k: usize,
        rng: &mut Xorshift64,
    ) -> Result<Self, PosterError> {
        if k == 0 {
            return Err(PosterError::InvalidPalette(
                "palette size must be at least 1".to_string(),
            ));
        }
        let colors = (0..k)
            .map(|_| rng.choose(swatches).copied())
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| PosterError::InvalidPalette("no swatches to pick from".to_string()))?;
        Ok(Self { colors })
    }

    /// The rainbow gradient sampled at `t = i / k` for `i` in `0..k`.
    ///
    /// Pure function of `k`; an empty palette cannot be built, so `k = 0`
    /// is rejected.
    pub fn rainbow(k: usize) -> Result<Self, PosterError> {
        if k == 0 {
            return Err(PosterError::InvalidPalette(
                "rainbow needs at least 1 stop".to_string(),
            ));
        }
        let stops = Self {
            colors: RAINBOW_STOPS.to_vec(),
        };
        let colors = (0..k).map(|i| stops.sample(i as f64 / k as f64)).collect();
        Ok(Self { colors })
    }

    /// Returns the number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colors in generation order; a shadow stack draws them first to last.
    pub fn colors(&self) -> &[Srgb] {
        &self.colors
    }

    /// Color at `index`, wrapping around the palette length.
    pub fn get_wrapped(&self, index: usize) -> Srgb {
        self.colors[index % self.colors.len()]
    }

    /// Samples the palette as an evenly spaced RGB gradient at `t` in [0, 1].
    ///
    /// `t` is clamped; NaN is treated as 0.
    pub fn sample(&self, t: f64) -> Srgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let n = self.colors.len();
        if n == 1 {
            return self.colors[0];
        }

        let scaled = t * (n - 1) as f64;
        let idx = (scaled as usize).min(n - 2);
        let frac = scaled - idx as f64;
        self.colors[idx].lerp(self.colors[idx + 1], frac)
    }

    /// Picks a uniformly random color, returning its index as well.
    pub fn pick(&self, rng: &mut Xorshift64) -> (usize, Srgb) {
        let idx = rng.next_usize(self.colors.len());
        (idx, self.colors[idx])
    }
}
