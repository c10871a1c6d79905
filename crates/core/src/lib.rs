#![deny(unsafe_code)]
//! Core types for the poster generator.
//!
//! Provides the `Xorshift64` PRNG, color types (`Srgb`, `Hsv`), HSV and
//! rainbow `Palette`s, the blob shape generator, style presets, the
//! `RenderSpec` input model, per-variant `PosterSettings`, the `Canvas` scene
//! model, and the `compose` entry point that ties them together.

pub mod blob;
pub mod canvas;
pub mod color;
pub mod compositor;
pub mod error;
pub mod palette;
pub mod params;
pub mod preset;
pub mod prng;
pub mod settings;
pub mod spec;

pub use blob::{blob, BlobParams, Shape};
pub use canvas::{Canvas, Label, Layer, Provenance, Shadow};
pub use color::{Hsv, Srgb};
pub use compositor::compose;
pub use error::PosterError;
pub use palette::{Palette, PaletteMode};
pub use preset::{Style, StylePreset};
pub use prng::Xorshift64;
pub use settings::{DepthCue, LabelTemplate, PosterSettings, TextAlign};
pub use spec::{RenderSpec, ResolvedParams, Wobble};
