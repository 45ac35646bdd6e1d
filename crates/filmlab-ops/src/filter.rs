//! Gaussian blur.
//!
//! A 2D Gaussian is separable, so the blur runs as a horizontal pass and
//! a vertical pass with the same 1D kernel. Edges are clamped. Both passes
//! split the image into rows and run them on the rayon pool.
//!
//! # Example
//!
//! ```rust
//! use filmlab_ops::filter::gaussian_blur;
//!
//! let src = vec![0.5f32; 16 * 16 * 3];
//! let blurred = gaussian_blur(&src, 16, 16, 3, 0.3).unwrap();
//! assert_eq!(blurred.len(), src.len());
//! ```

use crate::{OpsError, OpsResult};
use rayon::prelude::*;
use tracing::trace;

/// Builds a normalized 1D Gaussian kernel.
///
/// The radius is `ceil(3 * sigma)`, at least 1. Returns a single unit tap
/// for non-positive sigma.
///
/// # Example
///
/// ```rust
/// use filmlab_ops::filter::gaussian_kernel;
///
/// let k = gaussian_kernel(1.0);
/// assert_eq!(k.len(), 7);
/// assert!((k.iter().sum::<f32>() - 1.0).abs() < 1e-6);
/// ```
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = ((3.0 * sigma).ceil() as i32).max(1);
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= sum);
    kernel
}

/// Applies a Gaussian blur with standard deviation `sigma` (in pixels).
pub fn gaussian_blur(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    sigma: f32,
) -> OpsResult<Vec<f32>> {
    let expected = width * height * channels;
    if src.len() != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            expected,
            src.len()
        )));
    }
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(OpsError::InvalidParameter(format!(
            "blur sigma must be >= 0, got {}",
            sigma
        )));
    }

    let kernel = gaussian_kernel(sigma);
    if kernel.len() == 1 || expected == 0 {
        return Ok(src.to_vec());
    }
    trace!(width, height, sigma, taps = kernel.len(), "gaussian_blur");

    let radius = (kernel.len() / 2) as isize;
    let row_len = width * channels;

    // Horizontal pass
    let mut temp = vec![0.0f32; expected];
    temp.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let src_row = &src[y * row_len..(y + 1) * row_len];
            for x in 0..width {
                for (k, &w) in kernel.iter().enumerate() {
                    let sx = (x as isize + k as isize - radius).clamp(0, width as isize - 1) as usize;
                    for c in 0..channels {
                        row[x * channels + c] += src_row[sx * channels + c] * w;
                    }
                }
            }
        });

    // Vertical pass
    let mut dst = vec![0.0f32; expected];
    dst.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for (k, &w) in kernel.iter().enumerate() {
                let sy = (y as isize + k as isize - radius).clamp(0, height as isize - 1) as usize;
                let src_row = &temp[sy * row_len..(sy + 1) * row_len];
                for (o, &v) in row.iter_mut().zip(src_row) {
                    *o += v * w;
                }
            }
        });

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_kernel_shape() {
        let k = gaussian_kernel(0.3);
        assert_eq!(k.len(), 3);
        assert!(k[1] > 0.99);
        assert_relative_eq!(k[0], k[2]);
        assert_eq!(gaussian_kernel(0.0), vec![1.0]);
    }

    #[test]
    fn test_constant_unchanged() {
        let src = vec![0.75f32; 9 * 7 * 3];
        let dst = gaussian_blur(&src, 9, 7, 3, 2.0).unwrap();
        for v in dst {
            assert_relative_eq!(v, 0.75, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_impulse_spreads_and_conserves() {
        let mut src = vec![0.0f32; 11 * 11];
        src[5 * 11 + 5] = 1.0;
        let dst = gaussian_blur(&src, 11, 11, 1, 1.0).unwrap();

        assert!(dst[5 * 11 + 5] < 1.0);
        assert!(dst[5 * 11 + 6] > 0.0);
        assert_relative_eq!(dst[5 * 11 + 4], dst[5 * 11 + 6], epsilon = 1e-6);
        assert_relative_eq!(dst.iter().sum::<f32>(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_zero_sigma_is_copy() {
        let src: Vec<f32> = (0..12).map(|i| i as f32).collect();
        assert_eq!(gaussian_blur(&src, 2, 2, 3, 0.0).unwrap(), src);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(gaussian_blur(&[0.0; 5], 2, 1, 3, 1.0).is_err());
        assert!(gaussian_blur(&[0.0; 6], 2, 1, 3, -1.0).is_err());
        assert!(gaussian_blur(&[0.0; 6], 2, 1, 3, f32::NAN).is_err());
    }
}
