//! Error types for the poster core.

use thiserror::Error;

/// Errors produced while building, validating, or exporting a poster.
#[derive(Debug, Error)]
pub enum PosterError {
    /// A blob needs at least three vertices to form a polygon.
    #[error("invalid point count: {0} (a blob needs at least 3 points)")]
    InvalidPointCount(usize),

    /// Wobble magnitude was negative or not a finite number.
    #[error("invalid wobble: {0} (must be finite and >= 0)")]
    InvalidWobble(f64),

    /// Layer count exceeded the supported maximum.
    #[error("invalid layer count: {count} (max {max})")]
    InvalidLayerCount { count: usize, max: usize },

    /// A numeric range parameter had a non-finite or out-of-domain bound.
    #[error("invalid range for '{name}': ({lo}, {hi})")]
    InvalidRange { name: String, lo: f64, hi: f64 },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed from the given inputs.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// A requested poster variant name is not registered.
    #[error("unknown variant: {0}")]
    UnknownVariant(String),

    /// Canvas size or export resolution produced an empty or oversized raster.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// The image encoder failed.
    #[error("encode failed: {0}")]
    Encode(String),

    /// Writing the exported image failed.
    #[error("io error: {0}")]
    Io(String),
}
