//! Lays out N blobs on a canvas, deterministically under a seed.
//!
//! [`compose`] seeds its own [`Xorshift64`] and consumes draws in a fixed
//! order, so the same [`RenderSpec`] and [`PosterSettings`] always produce the
//! same [`Canvas`]:
//!
//! 1. primary palette (`palette_size` entries, or one per layer for the depth cue)
//! 2. depth cue only: the index of the single large layer
//! 3. per layer: `cx`, `cy`, radius, wobble (ranged only), one draw per blob
//!    vertex, then palette index and alpha (flat layout only)

use glam::DVec2;

use crate::blob::blob;
use crate::canvas::{Canvas, Label, Layer, Provenance, Shadow};
use crate::error::PosterError;
use crate::palette::Palette;
use crate::prng::Xorshift64;
use crate::settings::{DepthCue, PaletteSource, PosterSettings};
use crate::spec::{RenderSpec, ResolvedParams};

/// Builds the poster scene for `spec` under `settings`.
#[tracing::instrument(skip_all, fields(seed = spec.seed, style = spec.style.as_deref()))]
pub fn compose(spec: &RenderSpec, settings: &PosterSettings) -> Result<Canvas, PosterError> {
    spec.validate()?;
    settings.validate()?;
    let params = spec.resolve(settings);
    let mut rng = Xorshift64::new(params.seed);
    let mut canvas = Canvas::new(settings.width_in, settings.height_in, params.background)?;

    match &settings.depth {
        Some(cue) => compose_depth(&mut canvas, &params, settings, cue, &mut rng)?,
        None => compose_flat(&mut canvas, &params, settings, &mut rng)?,
    }
    add_labels(&mut canvas, &params, settings);

    tracing::debug!(
        layers = canvas.layer_count(),
        mode = %params.palette_mode,
        wobble = %params.wobble,
        "composed poster"
    );
    Ok(canvas)
}

fn primary_palette(
    params: &ResolvedParams,
    settings: &PosterSettings,
    rng: &mut Xorshift64,
) -> Result<Palette, PosterError> {
    match &settings.palette_source {
        PaletteSource::Generated => Palette::generate(
            settings.palette_size,
            params.palette_mode,
            settings.mono_hue,
            rng,
        ),
        PaletteSource::Swatches(swatches) => {
            Palette::from_swatches(swatches, settings.palette_size, rng)
        }
    }
}

/// Random position, radius, color and alpha per layer.
fn compose_flat(
    canvas: &mut Canvas,
    params: &ResolvedParams,
    settings: &PosterSettings,
    rng: &mut Xorshift64,
) -> Result<(), PosterError> {
    let palette = primary_palette(params, settings, rng)?;
    let (r_lo, r_hi) = settings.radius_range;
    let (a_lo, a_hi) = params.alpha_range;

    for _ in 0..params.layer_count {
        let center = DVec2::new(rng.next_f64(), rng.next_f64());
        let radius = rng.next_range(r_lo, r_hi);
        let wobble = params.wobble.sample(rng);
        let shape = blob(center, radius, &settings.blob_params(wobble), rng)?;
        let (index, fill) = palette.pick(rng);
        let alpha = rng.next_range(a_lo, a_hi);
        canvas.push_layer(Layer::new(
            shape,
            fill,
            alpha,
            Provenance {
                center,
                radius,
                wobble,
                palette_index: Some(index),
            },
        ));
    }
    Ok(())
}

/// Index-colored layers over rainbow shadow stacks, one of them large.
fn compose_depth(
    canvas: &mut Canvas,
    params: &ResolvedParams,
    settings: &PosterSettings,
    cue: &DepthCue,
    rng: &mut Xorshift64,
) -> Result<(), PosterError> {
    let layers = params.layer_count;
    if layers == 0 {
        return Ok(());
    }
    let palette = Palette::generate(
        settings.palette_len(layers),
        params.palette_mode,
        settings.mono_hue,
        rng,
    )?;
    let rainbow = match params.shadow_count {
        0 => None,
        n => Some(Palette::rainbow(n)?),
    };
    let large = rng.next_int(0, layers as i64 - 1) as usize;

    for i in 0..layers {
        let center = DVec2::new(rng.next_f64(), rng.next_f64());
        let (r_lo, r_hi) = if i == large {
            cue.large_radius_range
        } else {
            settings.radius_range
        };
        let radius = rng.next_range(r_lo, r_hi);
        let wobble = params.wobble.sample(rng);
        let shape = blob(center, radius, &settings.blob_params(wobble), rng)?;

        let shadows = match &rainbow {
            Some(rainbow) => shadow_stack(rainbow, cue),
            None => Vec::new(),
        };
        let step = i as f64;
        let fill = palette.get_wrapped(i).brighten(cue.brighten_step * step);
        let alpha = (cue.alpha_base + cue.alpha_step * step).min(1.0);
        canvas.push_layer(
            Layer::new(
                shape,
                fill,
                alpha,
                Provenance {
                    center,
                    radius,
                    wobble,
                    palette_index: Some(i),
                },
            )
            .with_shadows(shadows),
        );
    }
    Ok(())
}

/// Copy `j` of `n` sits at `(j + 1) / n` of the full offset, tinted `rainbow[j]`.
fn shadow_stack(rainbow: &Palette, cue: &DepthCue) -> Vec<Shadow> {
    let n = rainbow.len() as f64;
    rainbow
        .colors()
        .iter()
        .enumerate()
        .map(|(j, &color)| Shadow {
            offset: cue.shadow_offset * ((j + 1) as f64 / n),
            color,
            alpha: cue.shadow_alpha,
        })
        .collect()
}

fn add_labels(canvas: &mut Canvas, params: &ResolvedParams, settings: &PosterSettings) {
    for template in [&settings.title, &settings.caption].into_iter().flatten() {
        canvas.push_label(Label {
            text: template.render_text(
                params.style.name(),
                params.palette_mode,
                params.seed,
                params.layer_count,
            ),
            position: template.position,
            size_pt: template.size_pt,
            bold: template.bold,
            color: template.color,
            align: template.align,
        });
    }
}
