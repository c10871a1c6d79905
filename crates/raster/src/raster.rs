//! Rasterizes a [`Canvas`] into an RGBA pixmap.
//!
//! The poster occupies `width_in x height_in` inches at the export DPI, framed
//! by `pad_inches` of frame color on every side. Unit-square coordinates map
//! onto the poster area with y pointing up; anything outside the square is
//! clipped. Polygons are filled with tiny-skia (anti-aliased, source-over
//! blending). Labels go through usvg so that text shaping uses system fonts.

use std::sync::{Arc, OnceLock};

use glam::DVec2;
use poster_core::canvas::{Canvas, Label};
use poster_core::color::Srgb;
use poster_core::error::PosterError;
use poster_core::settings::TextAlign;
use resvg::tiny_skia::{
    Color, FillRule, Mask, Paint, Path, PathBuilder, Pixmap, Rect, Transform,
};
use serde::{Deserialize, Serialize};

/// Largest raster side, in pixels.
pub const MAX_DIM: u32 = 16_384;

/// Resolution and framing of an exported poster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    pub dpi: f64,
    /// Frame width around the poster, in inches.
    pub pad_inches: f64,
    pub frame: Srgb,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            dpi: 300.0,
            pad_inches: 0.1,
            frame: Srgb::WHITE,
        }
    }
}

impl ExportOptions {
    /// Rejects non-finite or non-positive DPI and negative padding.
    pub fn validate(&self) -> Result<(), PosterError> {
        if !self.dpi.is_finite() || self.dpi <= 0.0 {
            return Err(PosterError::InvalidDimensions(format!(
                "dpi must be positive, got {}",
                self.dpi
            )));
        }
        if !self.pad_inches.is_finite() || self.pad_inches < 0.0 {
            return Err(PosterError::InvalidDimensions(format!(
                "padding must be >= 0, got {} in",
                self.pad_inches
            )));
        }
        Ok(())
    }
}

/// Pixel geometry derived from a canvas and export options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterLayout {
    pub width: u32,
    pub height: u32,
    /// Poster area inside the frame.
    pub plot: (f32, f32, f32, f32),
}

impl RasterLayout {
    pub fn new(canvas: &Canvas, opts: &ExportOptions) -> Result<Self, PosterError> {
        Self::for_size(canvas.width_in(), canvas.height_in(), opts)
    }

    /// Layout for a `width_in x height_in` poster, checked before any scene exists.
    pub fn for_size(
        width_in: f64,
        height_in: f64,
        opts: &ExportOptions,
    ) -> Result<Self, PosterError> {
        opts.validate()?;
        let plot_w = (width_in * opts.dpi).round();
        let plot_h = (height_in * opts.dpi).round();
        let pad = (opts.pad_inches * opts.dpi).round();
        let to_px = |v: f64| -> Result<u32, PosterError> {
            if !(1.0..=f64::from(MAX_DIM)).contains(&v) {
                return Err(PosterError::InvalidDimensions(format!(
                    "raster size {v} px outside 1..={MAX_DIM}"
                )));
            }
            Ok(v as u32)
        };
        to_px(plot_w)?;
        to_px(plot_h)?;
        Ok(Self {
            width: to_px(plot_w + 2.0 * pad)?,
            height: to_px(plot_h + 2.0 * pad)?,
            plot: (pad as f32, pad as f32, plot_w as f32, plot_h as f32),
        })
    }

    /// Maps unit coordinates (y up) to pixels (y down).
    pub fn transform(&self) -> Transform {
        let (x, y, w, h) = self.plot;
        Transform::from_row(w, 0.0, 0.0, -h, x, y + h)
    }

    fn plot_rect(&self) -> Option<Rect> {
        let (x, y, w, h) = self.plot;
        Rect::from_xywh(x, y, w, h)
    }

    fn to_pixel(&self, ux: f64, uy: f64) -> (f64, f64) {
        let (x, y, w, h) = self.plot;
        (
            f64::from(x) + ux * f64::from(w),
            f64::from(y) + (1.0 - uy) * f64::from(h),
        )
    }
}

/// Draws the whole canvas: frame, background, layers bottom to top, labels.
#[tracing::instrument(skip_all, fields(layers = canvas.layer_count(), dpi = opts.dpi))]
pub fn render_pixmap(canvas: &Canvas, opts: &ExportOptions) -> Result<Pixmap, PosterError> {
    let layout = RasterLayout::new(canvas, opts)?;
    let mut pixmap = Pixmap::new(layout.width, layout.height)
        .ok_or_else(|| PosterError::InvalidDimensions("failed to allocate pixmap".into()))?;
    pixmap.fill(color(opts.frame, 1.0)?);

    let plot = layout
        .plot_rect()
        .ok_or_else(|| PosterError::InvalidDimensions("empty poster area".into()))?;
    pixmap.fill_rect(
        plot,
        &paint(canvas.background(), 1.0)?,
        Transform::identity(),
        None,
    );
    let mut clip = Mask::new(layout.width, layout.height)
        .ok_or_else(|| PosterError::InvalidDimensions("failed to allocate clip mask".into()))?;
    clip.fill_path(
        &PathBuilder::from_rect(plot),
        FillRule::Winding,
        false,
        Transform::identity(),
    );

    let xform = layout.transform();
    for layer in canvas.layers() {
        let Some(path) = polygon(layer.shape()) else {
            tracing::trace!(points = layer.shape().len(), "skipping degenerate shape");
            continue;
        };
        for shadow in layer.shadows() {
            let shifted = xform.pre_translate(shadow.offset.x as f32, shadow.offset.y as f32);
            fill(&mut pixmap, &path, shadow.color, shadow.alpha, shifted, &clip)?;
        }
        fill(&mut pixmap, &path, layer.fill(), layer.alpha(), xform, &clip)?;
    }

    if !canvas.labels().is_empty() {
        draw_labels(&mut pixmap, canvas.labels(), &layout, opts.dpi)?;
    }
    Ok(pixmap)
}

fn color(c: Srgb, alpha: f64) -> Result<Color, PosterError> {
    Color::from_rgba(c.r as f32, c.g as f32, c.b as f32, alpha as f32)
        .ok_or_else(|| PosterError::InvalidColor(format!("{} with alpha {alpha}", c.to_hex())))
}

fn paint(c: Srgb, alpha: f64) -> Result<Paint<'static>, PosterError> {
    let mut paint = Paint::default();
    paint.set_color(color(c, alpha)?);
    paint.anti_alias = true;
    Ok(paint)
}

/// Closed polygon through `points`, or `None` when it has no area to draw.
fn polygon(points: &[DVec2]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::with_capacity(points.len() + 1, points.len() + 1);
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    pb.close();
    pb.finish()
}

fn fill(
    pixmap: &mut Pixmap,
    path: &Path,
    c: Srgb,
    alpha: f64,
    xform: Transform,
    clip: &Mask,
) -> Result<(), PosterError> {
    pixmap.fill_path(path, &paint(c, alpha)?, FillRule::Winding, xform, Some(clip));
    Ok(())
}

fn font_database() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Builds a full-size SVG document holding one `<text>` element per label.
///
/// Font sizes are in points, converted at `dpi`.
pub fn labels_svg(labels: &[Label], layout: &RasterLayout, dpi: f64) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = layout.width,
        h = layout.height,
    );
    for label in labels {
        let (x, y) = layout.to_pixel(label.position.x, label.position.y);
        let anchor = match label.align {
            TextAlign::Start => "start",
            TextAlign::Middle => "middle",
        };
        svg.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" font-family="DejaVu Sans, Helvetica, Arial, sans-serif" font-size="{size:.2}" font-weight="{weight}" fill="{fill}" text-anchor="{anchor}">{text}</text>"#,
            size = label.size_pt * dpi / 72.0,
            weight = if label.bold { "bold" } else { "normal" },
            fill = label.color.to_hex(),
            text = escape_xml(&label.text),
        ));
    }
    svg.push_str("</svg>");
    svg
}

fn draw_labels(
    pixmap: &mut Pixmap,
    labels: &[Label],
    layout: &RasterLayout,
    dpi: f64,
) -> Result<(), PosterError> {
    let svg = labels_svg(labels, layout, dpi);
    let opts = usvg::Options {
        fontdb: font_database(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&svg, &opts)
        .map_err(|e| PosterError::Encode(format!("label layout failed: {e}")))?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use poster_core::canvas::{Layer, Provenance, Shadow};

    fn opts(dpi: f64) -> ExportOptions {
        ExportOptions {
            dpi,
            ..ExportOptions::default()
        }
    }

    fn square(center: DVec2, half: f64) -> Vec<DVec2> {
        vec![
            center + DVec2::new(-half, -half),
            center + DVec2::new(half, -half),
            center + DVec2::new(half, half),
            center + DVec2::new(-half, half),
        ]
    }

    fn provenance() -> Provenance {
        Provenance {
            center: DVec2::splat(0.5),
            radius: 0.25,
            wobble: 0.0,
            palette_index: None,
        }
    }

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let c = pixmap.pixel(x, y).unwrap().demultiply();
        [c.red(), c.green(), c.blue(), c.alpha()]
    }

    #[test]
    fn layout_adds_padding_on_every_side() {
        let canvas = Canvas::new(6.0, 8.0, Srgb::WHITE).unwrap();
        let layout = RasterLayout::new(&canvas, &ExportOptions::default()).unwrap();
        assert_eq!((layout.width, layout.height), (1860, 2460));
        assert_eq!(layout.plot, (30.0, 30.0, 1800.0, 2400.0));
    }

    #[test]
    fn layout_rejects_bad_dpi_and_huge_rasters() {
        let canvas = Canvas::new(6.0, 8.0, Srgb::WHITE).unwrap();
        assert!(RasterLayout::new(&canvas, &opts(0.0)).is_err());
        assert!(RasterLayout::new(&canvas, &opts(f64::NAN)).is_err());
        assert!(matches!(
            RasterLayout::new(&canvas, &opts(10_000.0)),
            Err(PosterError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn transform_flips_y() {
        let canvas = Canvas::new(1.0, 1.0, Srgb::WHITE).unwrap();
        let layout = RasterLayout::new(&canvas, &opts(100.0)).unwrap();
        assert_eq!(layout.to_pixel(0.0, 1.0), (10.0, 10.0));
        assert_eq!(layout.to_pixel(1.0, 0.0), (110.0, 110.0));
    }

    #[test]
    fn background_frame_and_opaque_layer() {
        let mut canvas = Canvas::new(1.0, 1.0, Srgb::new(1.0, 1.0, 0.0)).unwrap();
        canvas.push_layer(Layer::new(
            square(DVec2::new(0.25, 0.25), 0.1),
            Srgb::new(0.0, 0.0, 1.0),
            1.0,
            provenance(),
        ));
        let pixmap = render_pixmap(&canvas, &opts(100.0)).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (120, 120));
        // Frame.
        assert_eq!(pixel(&pixmap, 2, 2), [255, 255, 255, 255]);
        // Background.
        assert_eq!(pixel(&pixmap, 90, 30), [255, 255, 0, 255]);
        // Lower-left square (y up), centered at (35, 85) in pixels.
        assert_eq!(pixel(&pixmap, 35, 85), [0, 0, 255, 255]);
    }

    #[test]
    fn translucent_layer_blends_over_background() {
        let mut canvas = Canvas::new(1.0, 1.0, Srgb::WHITE).unwrap();
        canvas.push_layer(Layer::new(
            square(DVec2::splat(0.5), 0.3),
            Srgb::BLACK,
            0.5,
            provenance(),
        ));
        let pixmap = render_pixmap(&canvas, &opts(50.0)).unwrap();
        let [r, g, b, a] = pixel(&pixmap, 30, 30);
        assert_eq!(a, 255);
        assert!((126..=129).contains(&r) && r == g && g == b, "got {r},{g},{b}");
    }

    #[test]
    fn shapes_outside_the_square_are_clipped() {
        let mut canvas = Canvas::new(1.0, 1.0, Srgb::WHITE).unwrap();
        canvas.push_layer(Layer::new(
            square(DVec2::new(0.0, 0.5), 0.2),
            Srgb::BLACK,
            1.0,
            provenance(),
        ));
        let pixmap = render_pixmap(&canvas, &opts(100.0)).unwrap();
        // Left frame stays white even though the square overhangs it.
        assert_eq!(pixel(&pixmap, 3, 60), [255, 255, 255, 255]);
        assert_eq!(pixel(&pixmap, 15, 60), [0, 0, 0, 255]);
    }

    #[test]
    fn shadows_draw_beneath_the_fill() {
        let shape = square(DVec2::splat(0.5), 0.2);
        let mut canvas = Canvas::new(1.0, 1.0, Srgb::WHITE).unwrap();
        canvas.push_layer(
            Layer::new(shape, Srgb::BLACK, 1.0, provenance()).with_shadows(vec![Shadow {
                offset: DVec2::ZERO,
                color: Srgb::new(1.0, 0.0, 0.0),
                alpha: 1.0,
            }]),
        );
        let pixmap = render_pixmap(&canvas, &opts(100.0)).unwrap();
        assert_eq!(pixel(&pixmap, 60, 60), [0, 0, 0, 255]);
    }

    #[test]
    fn shadow_offset_is_in_unit_coordinates() {
        // Square spans pixels 40..80; the shadow is shifted 0.2 right and 0.2 down.
        let shape = square(DVec2::splat(0.5), 0.2);
        let mut canvas = Canvas::new(1.0, 1.0, Srgb::WHITE).unwrap();
        canvas.push_layer(
            Layer::new(shape, Srgb::BLACK, 1.0, provenance()).with_shadows(vec![Shadow {
                offset: DVec2::new(0.2, -0.2),
                color: Srgb::new(1.0, 0.0, 0.0),
                alpha: 1.0,
            }]),
        );
        let pixmap = render_pixmap(&canvas, &opts(100.0)).unwrap();
        assert_eq!(pixel(&pixmap, 60, 60), [0, 0, 0, 255]);
        assert_eq!(pixel(&pixmap, 90, 90), [255, 0, 0, 255]);
        assert_eq!(pixel(&pixmap, 50, 90), [255, 255, 255, 255]);
        assert_eq!(pixel(&pixmap, 90, 50), [255, 255, 255, 255]);
    }

    #[test]
    fn degenerate_shape_is_skipped() {
        let mut canvas = Canvas::new(1.0, 1.0, Srgb::WHITE).unwrap();
        canvas.push_layer(Layer::new(
            vec![DVec2::splat(0.5); 8],
            Srgb::BLACK,
            1.0,
            provenance(),
        ));
        let pixmap = render_pixmap(&canvas, &opts(40.0)).unwrap();
        assert_eq!(pixel(&pixmap, 24, 24), [255, 255, 255, 255]);
    }

    #[test]
    fn labels_svg_escapes_and_scales_text() {
        let canvas = Canvas::new(1.0, 1.0, Srgb::WHITE).unwrap();
        let layout = RasterLayout::new(&canvas, &opts(144.0)).unwrap();
        let label = Label {
            text: "A & <B>".into(),
            position: DVec2::new(0.5, 0.5),
            size_pt: 12.0,
            bold: true,
            color: Srgb::BLACK,
            align: TextAlign::Middle,
        };
        let svg = labels_svg(&[label], &layout, 144.0);
        assert!(svg.contains("A &amp; &lt;B&gt;"));
        assert!(svg.contains(r#"font-size="24.00""#));
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.contains(r#"font-weight="bold""#));
    }

    #[test]
    fn labels_render_without_error() {
        let mut canvas = Canvas::new(2.0, 1.0, Srgb::WHITE).unwrap();
        canvas.push_label(Label {
            text: "Generative Poster \u{2022} Vivid".into(),
            position: DVec2::new(0.05, 0.5),
            size_pt: 14.0,
            bold: true,
            color: Srgb::BLACK,
            align: TextAlign::Start,
        });
        assert!(render_pixmap(&canvas, &opts(72.0)).is_ok());
    }

    #[test]
    fn export_options_reject_bad_dpi_and_padding() {
        assert!(ExportOptions::default().validate().is_ok());
        assert!(opts(-3.0).validate().is_err());
        assert!(opts(f64::INFINITY).validate().is_err());
        let negative_pad = ExportOptions {
            pad_inches: -0.1,
            ..ExportOptions::default()
        };
        assert!(matches!(
            negative_pad.validate(),
            Err(PosterError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn for_size_matches_canvas_layout() {
        let canvas = Canvas::new(7.0, 10.0, Srgb::WHITE).unwrap();
        let o = opts(72.0);
        assert_eq!(
            RasterLayout::for_size(7.0, 10.0, &o).unwrap(),
            RasterLayout::new(&canvas, &o).unwrap()
        );
        assert!(RasterLayout::for_size(f64::NAN, 10.0, &o).is_err());
    }

    mod proptests {
        use super::*;
        use poster_core::settings::PosterSettings;
        use poster_core::spec::RenderSpec;
        use poster_core::compose;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn layout_is_poster_plus_padding(
                width_in in 0.5_f64..8.0,
                height_in in 0.5_f64..8.0,
                dpi in 10.0_f64..300.0,
                pad_inches in 0.0_f64..0.5,
            ) {
                let o = ExportOptions { dpi, pad_inches, ..ExportOptions::default() };
                let layout = RasterLayout::for_size(width_in, height_in, &o).unwrap();
                let pad = (pad_inches * dpi).round();
                prop_assert_eq!(layout.width, ((width_in * dpi).round() + 2.0 * pad) as u32);
                prop_assert_eq!(layout.height, ((height_in * dpi).round() + 2.0 * pad) as u32);
                prop_assert_eq!(layout.plot.0, pad as f32);
                prop_assert_eq!(layout.plot.1, pad as f32);
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(16))]

            #[test]
            fn render_is_deterministic_and_clipped(seed: u64, layers in 0_usize..20) {
                let spec = RenderSpec { layer_count: Some(layers), ..RenderSpec::new(seed) };
                let canvas = compose(&spec, &PosterSettings::interactive()).unwrap();
                let o = opts(10.0);
                let a = render_pixmap(&canvas, &o).unwrap();
                let b = render_pixmap(&canvas, &o).unwrap();
                prop_assert_eq!(a.data(), b.data());
                // The frame below the poster never receives paint.
                prop_assert_eq!(pixel(&a, a.width() - 1, a.height() - 1), [255, 255, 255, 255]);
            }
        }
    }
}
