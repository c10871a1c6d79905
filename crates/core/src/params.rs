//! Fail-soft readers for `--params` style JSON override objects.
//!
//! Each helper takes a JSON value, a key, and a default. Missing keys, wrong
//! types and unparsable values all yield the default, so an override object
//! can never break a render; it can only fail to change it.

use serde_json::Value;

use crate::color::Srgb;

/// Reads an `f64`; integers are accepted and widened.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Reads a non-negative integer as `usize`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// Reads a two-element numeric array `[lo, hi]`.
///
/// The bounds are returned as written; ordering is not enforced here.
pub fn param_range(params: &Value, name: &str, default: (f64, f64)) -> (f64, f64) {
    match params.get(name).and_then(Value::as_array).map(Vec::as_slice) {
        Some([lo, hi]) => match (lo.as_f64(), hi.as_f64()) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => default,
        },
        _ => default,
    }
}

/// Reads a color given as hex (`"#rrggbb"`) or a color keyword.
pub fn param_color(params: &Value, name: &str, default: Srgb) -> Srgb {
    params
        .get(name)
        .and_then(Value::as_str)
        .and_then(|s| Srgb::parse(s).ok())
        .unwrap_or(default)
}
