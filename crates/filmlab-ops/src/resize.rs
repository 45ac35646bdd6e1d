//! Image resize and resampling.
//!
//! Separable two-pass resampling (horizontal then vertical) over packed
//! `f32` buffers. Filter weights for each output column or row are computed
//! once and reused for every line; lines are processed in parallel.
//!
//! # Filters
//!
//! - [`Filter::Nearest`] - no interpolation
//! - [`Filter::Bilinear`] - triangle filter
//! - [`Filter::Bicubic`] - Mitchell-Netravali
//! - [`Filter::Lanczos3`] - windowed sinc, used by the develop pipeline
//!
//! # Example
//!
//! ```rust
//! use filmlab_ops::resize::{resize_f32, Filter};
//!
//! let src = vec![0.25f32; 64 * 48 * 3];
//! let dst = resize_f32(&src, 64, 48, 3, 32, 24, Filter::Lanczos3).unwrap();
//! assert_eq!(dst.len(), 32 * 24 * 3);
//! ```

use crate::{OpsError, OpsResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Resampling filter for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Nearest-neighbor.
    Nearest,
    /// Bilinear interpolation.
    Bilinear,
    /// Bicubic (Mitchell-Netravali B=C=1/3).
    Bicubic,
    /// Lanczos with a = 3.
    #[default]
    Lanczos3,
}

impl Filter {
    /// Support radius of the kernel at scale 1.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Filter::Nearest => 0.5,
            Filter::Bilinear => 1.0,
            Filter::Bicubic => 2.0,
            Filter::Lanczos3 => 3.0,
        }
    }

    /// Evaluates the kernel at distance `x`.
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        let ax = x.abs();
        match self {
            Filter::Nearest => {
                if ax < 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            Filter::Bilinear => (1.0 - ax).max(0.0),
            Filter::Bicubic => mitchell(ax),
            Filter::Lanczos3 => lanczos(ax, 3.0),
        }
    }
}

#[inline]
fn mitchell(ax: f32) -> f32 {
    const B: f32 = 1.0 / 3.0;
    const C: f32 = 1.0 / 3.0;
    if ax < 1.0 {
        ((12.0 - 9.0 * B - 6.0 * C) * ax * ax * ax
            + (-18.0 + 12.0 * B + 6.0 * C) * ax * ax
            + (6.0 - 2.0 * B))
            / 6.0
    } else if ax < 2.0 {
        ((-B - 6.0 * C) * ax * ax * ax
            + (6.0 * B + 30.0 * C) * ax * ax
            + (-12.0 * B - 48.0 * C) * ax
            + (8.0 * B + 24.0 * C))
            / 6.0
    } else {
        0.0
    }
}

#[inline]
fn lanczos(ax: f32, a: f32) -> f32 {
    if ax < 1e-6 {
        1.0
    } else if ax < a {
        let pi_x = std::f32::consts::PI * ax;
        let pi_x_a = pi_x / a;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

/// Normalized taps for one output coordinate.
struct Taps {
    start: usize,
    weights: Vec<f32>,
}

/// Precomputes taps for resampling `src_len` samples to `dst_len`.
fn compute_taps(src_len: usize, dst_len: usize, filter: Filter) -> Vec<Taps> {
    let scale = src_len as f32 / dst_len as f32;
    let stretch = scale.max(1.0);
    let support = filter.support() * stretch;

    (0..dst_len)
        .map(|i| {
            let center = (i as f32 + 0.5) * scale - 0.5;
            let lo = ((center - support).floor().max(0.0)) as usize;
            let hi = ((center + support).ceil() as usize).min(src_len - 1);

            let mut weights: Vec<f32> = (lo..=hi)
                .map(|s| filter.weight((s as f32 - center) / stretch))
                .collect();
            let sum: f32 = weights.iter().sum();
            if sum.abs() > f32::EPSILON {
                weights.iter_mut().for_each(|w| *w /= sum);
            } else {
                // Degenerate window: fall back to the nearest sample
                let nearest = (center.round().max(0.0) as usize).clamp(lo, hi);
                weights.iter_mut().for_each(|w| *w = 0.0);
                weights[nearest - lo] = 1.0;
            }
            Taps { start: lo, weights }
        })
        .collect()
}

/// Resizes packed `f32` image data.
///
/// # Arguments
///
/// * `src` - Source pixel data
/// * `src_w`, `src_h` - Source dimensions
/// * `channels` - Samples per pixel
/// * `dst_w`, `dst_h` - Destination dimensions
/// * `filter` - Resampling filter
pub fn resize_f32(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    dst_h: usize,
    filter: Filter,
) -> OpsResult<Vec<f32>> {
    let expected = src_w * src_h * channels;
    if src.len() != expected || expected == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples for {}x{}x{}, got {}",
            expected,
            src_w,
            src_h,
            channels,
            src.len()
        )));
    }
    if dst_w == 0 || dst_h == 0 {
        return Err(OpsError::InvalidDimensions(
            "destination size must be > 0".into(),
        ));
    }
    if (src_w, src_h) == (dst_w, dst_h) {
        return Ok(src.to_vec());
    }
    trace!(src_w, src_h, dst_w, dst_h, ?filter, "resize_f32");

    // Horizontal pass: src_w -> dst_w on every source row
    let h_taps = compute_taps(src_w, dst_w, filter);
    let mut temp = vec![0.0f32; dst_w * src_h * channels];
    temp.par_chunks_mut(dst_w * channels)
        .enumerate()
        .for_each(|(y, row)| {
            let src_row = &src[y * src_w * channels..(y + 1) * src_w * channels];
            for (x, taps) in h_taps.iter().enumerate() {
                let out = &mut row[x * channels..(x + 1) * channels];
                for (k, &w) in taps.weights.iter().enumerate() {
                    let s = (taps.start + k) * channels;
                    for c in 0..channels {
                        out[c] += src_row[s + c] * w;
                    }
                }
            }
        });

    // Vertical pass: src_h -> dst_h on every column
    let v_taps = compute_taps(src_h, dst_h, filter);
    let row_len = dst_w * channels;
    let mut dst = vec![0.0f32; dst_w * dst_h * channels];
    dst.par_chunks_mut(row_len)
        .zip(v_taps.par_iter())
        .for_each(|(row, taps)| {
            for (k, &w) in taps.weights.iter().enumerate() {
                let s = (taps.start + k) * row_len;
                for (o, &v) in row.iter_mut().zip(&temp[s..s + row_len]) {
                    *o += v * w;
                }
            }
        });

    Ok(dst)
}

/// Height that keeps the aspect ratio at `target_w`, rounded, at least 1.
///
/// # Example
///
/// ```rust
/// use filmlab_ops::resize::width_to_height;
///
/// assert_eq!(width_to_height(4000, 3000, 800), 600);
/// assert_eq!(width_to_height(3, 2, 2), 1);
/// ```
pub fn width_to_height(src_w: usize, src_h: usize, target_w: usize) -> usize {
    let h = (src_h as f64 * target_w as f64 / src_w as f64).round() as usize;
    h.max(1)
}

/// Aspect-preserving dimensions that fit inside `max_w` x `max_h`.
///
/// # Example
///
/// ```rust
/// use filmlab_ops::resize::fit_dimensions;
///
/// assert_eq!(fit_dimensions(1920, 1080, 640, 640), (640, 360));
/// ```
pub fn fit_dimensions(src_w: usize, src_h: usize, max_w: usize, max_h: usize) -> (usize, usize) {
    let scale_w = max_w as f64 / src_w as f64;
    let scale_h = max_h as f64 / src_h as f64;
    let scale = scale_w.min(scale_h);

    let new_w = ((src_w as f64 * scale).round() as usize).clamp(1, max_w.max(1));
    let new_h = ((src_h as f64 * scale).round() as usize).clamp(1, max_h.max(1));
    (new_w, new_h)
}

/// Downscaled dimensions when the longer side exceeds `max_side`.
///
/// Returns `None` if the image already fits; never upscales.
pub fn cap_dimensions(width: usize, height: usize, max_side: usize) -> Option<(usize, usize)> {
    if width.max(height) <= max_side {
        return None;
    }
    Some(fit_dimensions(width, height, max_side, max_side))
}
