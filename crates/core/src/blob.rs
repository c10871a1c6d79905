//! Wobbly closed shapes ("blobs").
//!
//! A blob is a polygon whose vertices sit at evenly spaced angles around a
//! center, each at a randomly perturbed radius:
//!
//! ```text
//! radius_i = r * (1 + wobble * (u_i - centering)),   u_i uniform in [0, 1)
//! ```
//!
//! With `centering = 0.5` the perturbation is symmetric around `r`. A smaller
//! centering constant biases every vertex outward.

use std::f64::consts::TAU;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::PosterError;
use crate::prng::Xorshift64;

/// Symmetric perturbation around the base radius.
pub const CANONICAL_CENTERING: f64 = 0.5;
/// Outward-biased perturbation used by the styled poster.
pub const BIASED_CENTERING: f64 = 0.05;

/// Ordered polygon vertices. The closing edge is implicit.
pub type Shape = Vec<DVec2>;

/// Sampling parameters for [`blob`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlobParams {
    /// Number of vertices, at least 3.
    pub points: usize,
    /// Fractional radius perturbation, finite and >= 0.
    pub wobble: f64,
    /// Centering constant `c` in `r * (1 + w * (u - c))`.
    pub centering: f64,
    /// When set, angles run over `[0, 2π]` inclusive so the last vertex
    /// lands on the first angle again.
    pub endpoint: bool,
}

impl Default for BlobParams {
    fn default() -> Self {
        Self {
            points: 200,
            wobble: 0.15,
            centering: CANONICAL_CENTERING,
            endpoint: false,
        }
    }
}

impl BlobParams {
    /// Requires at least 3 points and a finite, non-negative wobble.
    pub fn validate(&self) -> Result<(), PosterError> {
        if self.points < 3 {
            return Err(PosterError::InvalidPointCount(self.points));
        }
        if !self.wobble.is_finite() || self.wobble < 0.0 {
            return Err(PosterError::InvalidWobble(self.wobble));
        }
        Ok(())
    }

    /// Angle of vertex `i`.
    fn angle(&self, i: usize) -> f64 {
        let divisions = if self.endpoint {
            self.points - 1
        } else {
            self.points
        };
        TAU * i as f64 / divisions as f64
    }

    /// Largest fractional deviation from the base radius this blob can reach.
    pub fn max_deviation(&self) -> f64 {
        self.wobble * self.centering.max(1.0 - self.centering)
    }
}

/// Generates a blob around `center` with base radius `radius`.
///
/// Draws exactly `params.points` values from `rng`, one per vertex, in
/// angular order.
pub fn blob(
    center: DVec2,
    radius: f64,
    params: &BlobParams,
    rng: &mut Xorshift64,
) -> Result<Shape, PosterError> {
    params.validate()?;
    let shape = (0..params.points)
        .map(|i| {
            let angle = params.angle(i);
            let u = rng.next_f64();
            let r = radius * (1.0 + params.wobble * (u - params.centering));
            center + DVec2::new(angle.cos(), angle.sin()) * r
        })
        .collect();
    Ok(shape)
}

/// Checks that every vertex lies at a positive distance from `center` and
/// that vertex angles increase around the center (no vertex folds back).
pub fn is_star_shaped(shape: &[DVec2], center: DVec2) -> bool {
    if shape.len() < 3 {
        return false;
    }
    let mut previous: Option<f64> = None;
    for &p in shape {
        let d = p - center;
        if d.length() <= 0.0 {
            return false;
        }
        let angle = d.y.atan2(d.x).rem_euclid(TAU);
        if let Some(prev) = previous {
            // The last vertex of an endpoint blob wraps back to angle ~0.
            if angle + 1e-9 < prev && angle > 1e-6 && (TAU - angle) > 1e-6 {
                return false;
            }
        }
        previous = Some(angle);
    }
    true
}
