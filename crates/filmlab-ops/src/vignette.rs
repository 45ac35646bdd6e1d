//! Radial vignette.
//!
//! Pixel centers are mapped linearly onto `[-1, 1]` along each axis (the
//! first column to -1, the last to 1). With `r = sqrt(x^2 + y^2)` the
//! achromatic gain is
//!
//! ```text
//! mask = 1 - clamp(r - 0.5, 0, 1) * strength
//! ```
//!
//! so the inner disc of radius 0.5 is untouched and the corners
//! (`r = sqrt(2)`) lose `0.914 * strength` of their intensity.

use crate::{OpsError, OpsResult};
use rayon::prelude::*;
use tracing::trace;

/// Normalized coordinate of sample `i` on an axis of `len` samples.
///
/// A single-sample axis maps to the center.
#[inline]
fn axis_coord(i: usize, len: usize) -> f32 {
    if len <= 1 {
        0.0
    } else {
        -1.0 + 2.0 * i as f32 / (len - 1) as f32
    }
}

/// Gain applied at pixel `(x, y)`.
#[inline]
pub fn vignette_gain(x: usize, y: usize, width: usize, height: usize, strength: f32) -> f32 {
    let nx = axis_coord(x, width);
    let ny = axis_coord(y, height);
    let r = (nx * nx + ny * ny).sqrt();
    1.0 - (r - 0.5).clamp(0.0, 1.0) * strength
}

/// Darkens `data` in place towards the corners.
///
/// `strength` must be within `[0, 1]`; every channel of a pixel is scaled by
/// the same gain.
pub fn apply_vignette(
    data: &mut [f32],
    width: usize,
    height: usize,
    channels: usize,
    strength: f32,
) -> OpsResult<()> {
    if data.len() != width * height * channels {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            width * height * channels,
            data.len()
        )));
    }
    if !(0.0..=1.0).contains(&strength) {
        return Err(OpsError::InvalidParameter(format!(
            "vignette strength must be within [0, 1], got {}",
            strength
        )));
    }
    if strength == 0.0 || data.is_empty() {
        return Ok(());
    }
    trace!(width, height, strength, "apply_vignette");

    data.par_chunks_mut(width * channels)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(channels).enumerate() {
                let gain = vignette_gain(x, y, width, height, strength);
                px.iter_mut().for_each(|v| *v *= gain);
            }
        });
    Ok(())
}
