//! Pixel buffer conversion from a rendered [`Pixmap`].
//!
//! tiny-skia stores premultiplied RGBA; image encoders expect straight alpha.
//! This module is always available (no feature gate) so callers without the
//! `png` feature can still get at the pixels.

use resvg::tiny_skia::Pixmap;

/// Converts a pixmap to a straight-alpha RGBA8 buffer of `width * height * 4` bytes.
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}
