//! Achromatic film grain.
//!
//! One Gaussian sample per pixel is added to all of that pixel's channels.
//! Rows are processed in parallel; each row owns an RNG seeded from a
//! per-call base seed, so concurrent calls never share generator state and
//! a fixed seed reproduces the same grain regardless of thread count.

use crate::{OpsError, OpsResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use tracing::trace;

/// Odd 64-bit constant used to spread row indices across seeds.
const ROW_SEED_STEP: u64 = 0x9E37_79B9_7F4A_7C15;

/// Adds zero-mean Gaussian noise with standard deviation `sigma`.
///
/// `seed` makes the result reproducible; `None` draws a fresh base seed from
/// the thread-local generator, so unseeded calls are independent.
///
/// # Example
///
/// ```rust
/// use filmlab_ops::grain::apply_grain;
///
/// let mut data = vec![128.0f32; 8 * 8 * 3];
/// apply_grain(&mut data, 8, 8, 3, 12.0, Some(7)).unwrap();
/// // Channels of a pixel move together
/// assert_eq!(data[0], data[1]);
/// ```
pub fn apply_grain(
    data: &mut [f32],
    width: usize,
    height: usize,
    channels: usize,
    sigma: f32,
    seed: Option<u64>,
) -> OpsResult<()> {
    if data.len() != width * height * channels {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            width * height * channels,
            data.len()
        )));
    }
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(OpsError::InvalidParameter(format!(
            "grain sigma must be >= 0, got {}",
            sigma
        )));
    }
    if sigma == 0.0 || data.is_empty() {
        return Ok(());
    }

    let normal = Normal::new(0.0f32, sigma)
        .map_err(|e| OpsError::InvalidParameter(format!("grain sigma: {}", e)))?;
    let base = seed.unwrap_or_else(rand::random::<u64>);
    trace!(width, height, sigma, seeded = seed.is_some(), "apply_grain");

    data.par_chunks_mut(width * channels)
        .enumerate()
        .for_each(|(y, row)| {
            let mut rng = StdRng::seed_from_u64(base ^ (y as u64 + 1).wrapping_mul(ROW_SEED_STEP));
            for px in row.chunks_exact_mut(channels) {
                let noise = normal.sample(&mut rng);
                px.iter_mut().for_each(|v| *v += noise);
            }
        });
    Ok(())
}
