//! PNG export of a rendered [`Canvas`].
//!
//! Feature-gated behind `png` (default on) so that callers that only need
//! pixels can skip the `image` crate. Rasterization itself lives in
//! [`crate::raster`] and the premultiplied-to-straight conversion in
//! [`crate::pixel`].

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};
use poster_core::canvas::Canvas;
use poster_core::error::PosterError;

use crate::pixel::pixmap_to_rgba;
use crate::raster::{render_pixmap, ExportOptions};

fn to_image(canvas: &Canvas, opts: &ExportOptions) -> Result<RgbaImage, PosterError> {
    let pixmap = render_pixmap(canvas, opts)?;
    let rgba = pixmap_to_rgba(&pixmap);
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), rgba)
        .ok_or_else(|| PosterError::Encode("RGBA buffer size mismatch".into()))
}

/// Renders the canvas and encodes it as PNG bytes.
///
/// Encoder failures surface as `PosterError::Encode`.
#[tracing::instrument(skip_all, fields(dpi = opts.dpi))]
pub fn encode_png(canvas: &Canvas, opts: &ExportOptions) -> Result<Vec<u8>, PosterError> {
    let img = to_image(canvas, opts)?;
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| PosterError::Encode(e.to_string()))?;
    let bytes = bytes.into_inner();
    tracing::debug!(
        width = img.width(),
        height = img.height(),
        bytes = bytes.len(),
        "encoded png"
    );
    Ok(bytes)
}

/// Renders the canvas and writes it as a PNG file.
///
/// Returns `PosterError::Encode` if encoding fails, or `PosterError::Io` on
/// write failure.
pub fn write_png(canvas: &Canvas, opts: &ExportOptions, path: &Path) -> Result<(), PosterError> {
    let bytes = encode_png(canvas, opts)?;
    std::fs::write(path, bytes)
        .map_err(|e| PosterError::Io(format!("{}: {e}", path.display())))
}
