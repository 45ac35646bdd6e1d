//! Per-channel LUT remap of 8-bit RGB images.

use crate::{OpsError, OpsResult};
use filmlab_io::{CHANNELS, ImageData};
use filmlab_lut::Lut;
use rayon::prelude::*;
use tracing::trace;

/// Remaps every pixel through `lut`, returning a new image.
///
/// Table entries are clamped to `0..=255` at lookup. The identity table
/// reproduces the input exactly.
///
/// # Example
///
/// ```rust
/// use filmlab_io::ImageData;
/// use filmlab_lut::Lut;
/// use filmlab_ops::apply_lut;
///
/// let base = ImageData::filled(4, 4, [10, 128, 250]);
/// let out = apply_lut(&base, &Lut::identity()).unwrap();
/// assert_eq!(out, base);
/// ```
pub fn apply_lut(image: &ImageData, lut: &Lut) -> OpsResult<ImageData> {
    let mut out = image.clone();
    apply_lut_in_place(&mut out, lut)?;
    Ok(out)
}

/// Remaps every pixel through `lut` in place.
pub fn apply_lut_in_place(image: &mut ImageData, lut: &Lut) -> OpsResult<()> {
    let expected = image.pixel_count() * CHANNELS;
    if image.data.len() != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "{}x{} RGB image needs {} bytes, has {}",
            image.width,
            image.height,
            expected,
            image.data.len()
        )));
    }
    if expected == 0 {
        return Ok(());
    }
    trace!(width = image.width, height = image.height, "apply_lut");

    let tables = lut.to_bytes();
    let stride = image.row_stride();
    image.data.par_chunks_mut(stride).for_each(|row| {
        for px in row.chunks_exact_mut(CHANNELS) {
            px[0] = tables[0][px[0] as usize];
            px[1] = tables[1][px[1] as usize];
            px[2] = tables[2][px[2] as usize];
        }
    });
    Ok(())
}
