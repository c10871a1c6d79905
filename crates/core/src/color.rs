//! Color types and conversion functions for the poster generator.
//!
//! Palettes are sampled in HSV and stored as sRGB. All conversions are pure
//! functions over `f64` components in [0, 1].

use crate::error::PosterError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"` for human-readable formats.
/// The hex round-trip has 8-bit quantization (1/255 precision loss),
/// which is acceptable since hex colors are inherently 8-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// HSV color with hue, saturation and value all in [0, 1].
///
/// Hue 0 and hue 1 both denote red.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// A handful of CSS color keywords accepted wherever a hex color is.
const NAMED_COLORS: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("grey", "#808080"),
    ("gray", "#808080"),
    ("red", "#ff0000"),
    ("green", "#008000"),
    ("blue", "#0000ff"),
    ("yellow", "#ffff00"),
];

impl Srgb {
    pub const BLACK: Srgb = Srgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Srgb = Srgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `PosterError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Srgb, PosterError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(PosterError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let r = u8::from_str_radix(&hex[0..2], 16)
            .map_err(|e| PosterError::InvalidColor(format!("invalid red component: {e}")))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .map_err(|e| PosterError::InvalidColor(format!("invalid green component: {e}")))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .map_err(|e| PosterError::InvalidColor(format!("invalid blue component: {e}")))?;
        Ok(Srgb::from_rgb8(r, g, b))
    }

    /// Parses either a hex color or one of the supported color keywords
    /// (`black`, `white`, `grey`/`gray`, `red`, `green`, `blue`, `yellow`).
    pub fn parse(s: &str) -> Result<Srgb, PosterError> {
        let trimmed = s.trim();
        match NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
        {
            Some((_, hex)) => Srgb::from_hex(hex),
            None => Srgb::from_hex(trimmed),
        }
    }

    /// Builds a color from 8-bit channels, e.g. a `#rrggbb` swatch.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Quantizes each component to 8 bits with rounding, clamping to [0, 1] first.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Converts the color to a hex string like `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Component-wise linear interpolation toward `other`.
    pub fn lerp(self, other: Srgb, t: f64) -> Srgb {
        Srgb {
            r: self.r + t * (other.r - self.r),
            g: self.g + t * (other.g - self.g),
            b: self.b + t * (other.b - self.b),
        }
    }

    /// Adds `amount` to every channel, clamping the result to [0, 1].
    pub fn brighten(self, amount: f64) -> Srgb {
        Srgb {
            r: (self.r + amount).clamp(0.0, 1.0),
            g: (self.g + amount).clamp(0.0, 1.0),
            b: (self.b + amount).clamp(0.0, 1.0),
        }
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Converts HSV to sRGB using the standard sextant formula.
///
/// Hue wraps (`h = 1.0` is red again); saturation and value are clamped to [0, 1].
pub fn hsv_to_srgb(c: Hsv) -> Srgb {
    let h = c.h.rem_euclid(1.0);
    let s = c.s.clamp(0.0, 1.0);
    let v = c.v.clamp(0.0, 1.0);

    let h6 = h * 6.0;
    let sector = (h6.floor() as usize) % 6;
    let f = h6 - h6.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Srgb { r, g, b }
}

/// Converts sRGB to HSV. Achromatic colors report hue 0.
pub fn srgb_to_hsv(c: Srgb) -> Hsv {
    let max = c.r.max(c.g).max(c.b);
    let min = c.r.min(c.g).min(c.b);
    let delta = max - min;

    let s = if max > 0.0 { delta / max } else { 0.0 };
    let h = if delta < 1e-12 {
        0.0
    } else if max == c.r {
        ((c.g - c.b) / delta).rem_euclid(6.0) / 6.0
    } else if max == c.g {
        ((c.b - c.r) / delta + 2.0) / 6.0
    } else {
        ((c.r - c.g) / delta + 4.0) / 6.0
    };
    Hsv { h, s, v: max }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn assert_srgb(actual: Srgb, r: f64, g: f64, b: f64) {
        assert!(
            approx_eq(actual.r, r) && approx_eq(actual.g, g) && approx_eq(actual.b, b),
            "expected ({r}, {g}, {b}), got {actual:?}"
        );
    }

    // -- HSV -> sRGB --

    #[test]
    fn hsv_primary_hues() {
        assert_srgb(hsv_to_srgb(Hsv { h: 0.0, s: 1.0, v: 1.0 }), 1.0, 0.0, 0.0);
        assert_srgb(
            hsv_to_srgb(Hsv { h: 1.0 / 3.0, s: 1.0, v: 1.0 }),
            0.0,
            1.0,
            0.0,
        );
        assert_srgb(
            hsv_to_srgb(Hsv { h: 2.0 / 3.0, s: 1.0, v: 1.0 }),
            0.0,
            0.0,
            1.0,
        );
    }

    #[test]
    fn hsv_secondary_hues() {
        assert_srgb(
            hsv_to_srgb(Hsv { h: 1.0 / 6.0, s: 1.0, v: 1.0 }),
            1.0,
            1.0,
            0.0,
        );
        assert_srgb(hsv_to_srgb(Hsv { h: 0.5, s: 1.0, v: 1.0 }), 0.0, 1.0, 1.0);
        assert_srgb(
            hsv_to_srgb(Hsv { h: 5.0 / 6.0, s: 1.0, v: 1.0 }),
            1.0,
            0.0,
            1.0,
        );
    }

    #[test]
    fn hsv_hue_one_wraps_to_red() {
        assert_srgb(hsv_to_srgb(Hsv { h: 1.0, s: 1.0, v: 1.0 }), 1.0, 0.0, 0.0);
    }

    #[test]
    fn hsv_zero_saturation_is_grey() {
        let grey = hsv_to_srgb(Hsv { h: 0.0, s: 0.0, v: 0.4 });
        assert_srgb(grey, 0.4, 0.4, 0.4);
    }

    #[test]
    fn hsv_zero_value_is_black() {
        let black = hsv_to_srgb(Hsv { h: 0.7, s: 0.9, v: 0.0 });
        assert_srgb(black, 0.0, 0.0, 0.0);
    }

    #[test]
    fn hsv_known_pastel() {
        // h=0.6, s=0.25, v=1.0 -> a pale blue
        let c = hsv_to_srgb(Hsv { h: 0.6, s: 0.25, v: 1.0 });
        assert_srgb(c, 0.75, 0.85, 1.0);
    }

    #[test]
    fn srgb_to_hsv_recovers_known_values() {
        let hsv = srgb_to_hsv(Srgb::new(0.75, 0.85, 1.0));
        assert!(approx_eq(hsv.h, 0.6), "h = {}", hsv.h);
        assert!(approx_eq(hsv.s, 0.25), "s = {}", hsv.s);
        assert!(approx_eq(hsv.v, 1.0), "v = {}", hsv.v);
    }

    #[test]
    fn srgb_to_hsv_achromatic_has_zero_hue() {
        let hsv = srgb_to_hsv(Srgb::new(0.3, 0.3, 0.3));
        assert_eq!(hsv.h, 0.0);
        assert_eq!(hsv.s, 0.0);
        assert!(approx_eq(hsv.v, 0.3));
    }

    // -- Hex parsing --

    #[test]
    fn from_hex_parses_red_with_hash() {
        assert_srgb(Srgb::from_hex("#ff0000").unwrap(), 1.0, 0.0, 0.0);
    }

    #[test]
    fn from_hex_parses_green_without_hash() {
        assert_srgb(Srgb::from_hex("00ff00").unwrap(), 0.0, 1.0, 0.0);
    }

    #[test]
    fn from_hex_is_case_insensitive() {
        assert_eq!(
            Srgb::from_hex("#FF00AA").unwrap(),
            Srgb::from_hex("#ff00aa").unwrap()
        );
    }

    #[test]
    fn from_hex_returns_error_for_invalid_hex() {
        assert!(Srgb::from_hex("#gggggg").is_err());
        assert!(Srgb::from_hex("#fff").is_err());
        assert!(Srgb::from_hex("").is_err());
        assert!(Srgb::from_hex("#ff00ff00").is_err());
        assert!(Srgb::from_hex("#ffé000").is_err());
    }

    #[test]
    fn parse_accepts_color_keywords() {
        assert_eq!(Srgb::parse("yellow").unwrap(), Srgb::new(1.0, 1.0, 0.0));
        assert_eq!(Srgb::parse("  White ").unwrap(), Srgb::WHITE);
        assert_eq!(Srgb::parse("gray").unwrap(), Srgb::parse("grey").unwrap());
    }

    #[test]
    fn parse_falls_back_to_hex() {
        assert_eq!(Srgb::parse("#666666").unwrap(), Srgb::from_rgb8(102, 102, 102));
        assert!(Srgb::parse("chartreuse-ish").is_err());
    }

    #[test]
    fn to_hex_known_color() {
        let color = Srgb::from_rgb8(0x80, 0x40, 0x20);
        assert_eq!(color.to_hex(), "#804020");
    }

    #[test]
    fn to_hex_clamps_out_of_range() {
        assert_eq!(Srgb::new(1.5, -0.1, 0.5).to_hex(), "#ff0080");
    }

    #[test]
    fn from_hex_to_hex_round_trip() {
        let original = "#c0ffee";
        assert_eq!(Srgb::from_hex(original).unwrap().to_hex(), original);
    }

    // -- Helpers --

    #[test]
    fn lerp_midpoint() {
        let mid = Srgb::BLACK.lerp(Srgb::WHITE, 0.5);
        assert_srgb(mid, 0.5, 0.5, 0.5);
    }

    #[test]
    fn brighten_clamps_at_white() {
        let c = Srgb::new(0.9, 0.5, 0.1).brighten(0.2);
        assert_srgb(c, 1.0, 0.7, 0.3);
    }

    // -- Serde --

    #[test]
    fn srgb_serializes_as_hex_string() {
        let json = serde_json::to_string(&Srgb::new(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(json, "\"#ff0000\"");
    }

    #[test]
    fn srgb_deserializes_from_keyword() {
        let c: Srgb = serde_json::from_str("\"yellow\"").unwrap();
        assert_eq!(c, Srgb::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn srgb_deserialize_rejects_invalid_hex() {
        let result: Result<Srgb, _> = serde_json::from_str("\"not-a-color\"");
        assert!(result.is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn hsv_to_srgb_always_in_unit_cube(
                h in -2.0_f64..3.0,
                s in -0.5_f64..1.5,
                v in -0.5_f64..1.5,
            ) {
                let c = hsv_to_srgb(Hsv { h, s, v });
                for (name, x) in [("r", c.r), ("g", c.g), ("b", c.b)] {
                    prop_assert!((0.0..=1.0).contains(&x), "{name} = {x} for h={h} s={s} v={v}");
                }
            }

            #[test]
            fn hsv_round_trip_within_epsilon(
                h in 0.0_f64..1.0,
                s in 0.01_f64..=1.0,
                v in 0.01_f64..=1.0,
            ) {
                let back = srgb_to_hsv(hsv_to_srgb(Hsv { h, s, v }));
                let dh = (back.h - h).abs();
                prop_assert!(dh.min(1.0 - dh) < 1e-9, "h: {} vs {}", back.h, h);
                prop_assert!((back.s - s).abs() < 1e-9, "s: {} vs {}", back.s, s);
                prop_assert!((back.v - v).abs() < 1e-9, "v: {} vs {}", back.v, v);
            }

            #[test]
            fn srgb_hex_round_trip_within_quantization(
                r in 0.0_f64..=1.0,
                g in 0.0_f64..=1.0,
                b in 0.0_f64..=1.0,
            ) {
                let original = Srgb { r, g, b };
                let round_tripped = Srgb::from_hex(&original.to_hex()).unwrap();
                let max_err = 0.5 / 255.0 + 1e-10;
                prop_assert!((round_tripped.r - original.r).abs() < max_err);
                prop_assert!((round_tripped.g - original.g).abs() < max_err);
                prop_assert!((round_tripped.b - original.b).abs() < max_err);
            }
        }
    }
}
