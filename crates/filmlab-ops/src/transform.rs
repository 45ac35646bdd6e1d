//! Geometric transformations: flips, right-angle rotations, orientation.
//!
//! All functions work on packed interleaved buffers of any `Copy` sample
//! type, so orientation can be fixed on the decoded bytes before the
//! buffer is widened to `f32`.
//!
//! # Rotation convention
//!
//! [`rotate_right_angle`] treats positive degrees as counter-clockwise.
//! The canvas always grows to fit, which for right angles means width and
//! height swap on 90 and 270.
//!
//! # Example
//!
//! ```rust
//! use filmlab_ops::transform::rotate_right_angle;
//!
//! let src = vec![0u8; 4 * 2 * 3];
//! let (dst, w, h) = rotate_right_angle(&src, 4, 2, 3, 90).unwrap();
//! assert_eq!((w, h), (2, 4));
//! assert_eq!(dst.len(), src.len());
//! ```

use crate::{OpsError, OpsResult};
use filmlab_io::{ImageData, Orientation};
use tracing::trace;

/// Builds a `dst_w` x `dst_h` image where each pixel is copied from
/// the source position returned by `map(x, y)`.
fn remap<T: Copy, F>(
    src: &[T],
    width: usize,
    channels: usize,
    dst_w: usize,
    dst_h: usize,
    map: F,
) -> Vec<T>
where
    F: Fn(usize, usize) -> (usize, usize),
{
    let mut dst = Vec::with_capacity(dst_w * dst_h * channels);
    for y in 0..dst_h {
        for x in 0..dst_w {
            let (sx, sy) = map(x, y);
            let i = (sy * width + sx) * channels;
            dst.extend_from_slice(&src[i..i + channels]);
        }
    }
    dst
}

/// Flips image horizontally (left-right mirror).
///
/// # Example
///
/// ```rust
/// use filmlab_ops::transform::flip_h;
///
/// let src = [1u8, 1, 1, 2, 2, 2];
/// assert_eq!(flip_h(&src, 2, 1, 3), vec![2, 2, 2, 1, 1, 1]);
/// ```
pub fn flip_h<T: Copy>(src: &[T], width: usize, height: usize, channels: usize) -> Vec<T> {
    remap(src, width, channels, width, height, |x, y| (width - 1 - x, y))
}

/// Flips image vertically (top-bottom mirror).
pub fn flip_v<T: Copy>(src: &[T], width: usize, height: usize, channels: usize) -> Vec<T> {
    let row = width * channels;
    let mut dst = Vec::with_capacity(src.len());
    for y in (0..height).rev() {
        dst.extend_from_slice(&src[y * row..(y + 1) * row]);
    }
    dst
}

/// Rotates image 90 degrees clockwise.
///
/// Returns `(data, new_width, new_height)`.
pub fn rotate_90_cw<T: Copy>(
    src: &[T],
    width: usize,
    height: usize,
    channels: usize,
) -> (Vec<T>, usize, usize) {
    let dst = remap(src, width, channels, height, width, |x, y| (y, height - 1 - x));
    (dst, height, width)
}

/// Rotates image 90 degrees counter-clockwise.
///
/// Returns `(data, new_width, new_height)`.
pub fn rotate_90_ccw<T: Copy>(
    src: &[T],
    width: usize,
    height: usize,
    channels: usize,
) -> (Vec<T>, usize, usize) {
    let dst = remap(src, width, channels, height, width, |x, y| (width - 1 - y, x));
    (dst, height, width)
}

/// Rotates image 180 degrees.
pub fn rotate_180<T: Copy>(src: &[T], width: usize, height: usize, channels: usize) -> Vec<T> {
    remap(src, width, channels, width, height, |x, y| {
        (width - 1 - x, height - 1 - y)
    })
}

/// Mirrors along the main diagonal (top-left to bottom-right).
pub fn transpose<T: Copy>(
    src: &[T],
    width: usize,
    height: usize,
    channels: usize,
) -> (Vec<T>, usize, usize) {
    let dst = remap(src, width, channels, height, width, |x, y| (y, x));
    (dst, height, width)
}

/// Mirrors along the anti-diagonal (top-right to bottom-left).
pub fn transverse<T: Copy>(
    src: &[T],
    width: usize,
    height: usize,
    channels: usize,
) -> (Vec<T>, usize, usize) {
    let dst = remap(src, width, channels, height, width, |x, y| {
        (width - 1 - y, height - 1 - x)
    });
    (dst, height, width)
}

/// Transforms stored pixels so they appear upright for `orientation`.
pub fn apply_orientation<T: Copy>(
    src: &[T],
    width: usize,
    height: usize,
    channels: usize,
    orientation: Orientation,
) -> (Vec<T>, usize, usize) {
    trace!(width, height, ?orientation, "apply_orientation");
    match orientation {
        Orientation::Normal => (src.to_vec(), width, height),
        Orientation::FlipHorizontal => (flip_h(src, width, height, channels), width, height),
        Orientation::Rotate180 => (rotate_180(src, width, height, channels), width, height),
        Orientation::FlipVertical => (flip_v(src, width, height, channels), width, height),
        Orientation::Transpose => transpose(src, width, height, channels),
        Orientation::Rotate90 => rotate_90_cw(src, width, height, channels),
        Orientation::Transverse => transverse(src, width, height, channels),
        Orientation::Rotate270 => rotate_90_ccw(src, width, height, channels),
    }
}

/// Normalizes a signed right angle to one of 0, 90, 180, 270.
///
/// Fails for angles that are not multiples of 90.
pub fn normalize_right_angle(degrees: i32) -> OpsResult<i32> {
    if degrees % 90 != 0 {
        return Err(OpsError::InvalidParameter(format!(
            "rotation must be a multiple of 90 degrees, got {}",
            degrees
        )));
    }
    Ok(degrees.rem_euclid(360))
}

/// Rotates by a signed multiple of 90 degrees, positive counter-clockwise.
///
/// Returns `(data, new_width, new_height)`.
pub fn rotate_right_angle<T: Copy>(
    src: &[T],
    width: usize,
    height: usize,
    channels: usize,
    degrees: i32,
) -> OpsResult<(Vec<T>, usize, usize)> {
    let result = match normalize_right_angle(degrees)? {
        0 => (src.to_vec(), width, height),
        90 => rotate_90_ccw(src, width, height, channels),
        180 => (rotate_180(src, width, height, channels), width, height),
        _ => rotate_90_cw(src, width, height, channels),
    };
    trace!(degrees, width = result.1, height = result.2, "rotate_right_angle");
    Ok(result)
}

/// Dimensions an image will have after orientation and rotation.
pub fn upright_dimensions(image: &ImageData, rotation_degrees: i32) -> OpsResult<(u32, u32)> {
    let (mut w, mut h) = image.dimensions();
    if image.metadata.orientation.is_some_and(Orientation::swaps_dimensions) {
        std::mem::swap(&mut w, &mut h);
    }
    if normalize_right_angle(rotation_degrees)? % 180 != 0 {
        std::mem::swap(&mut w, &mut h);
    }
    Ok((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    // 3x2 single-channel image:
    // 1 2 3
    // 4 5 6
    const SRC: [u8; 6] = [1, 2, 3, 4, 5, 6];

    #[test]
    fn test_flips() {
        assert_eq!(flip_h(&SRC, 3, 2, 1), vec![3, 2, 1, 6, 5, 4]);
        assert_eq!(flip_v(&SRC, 3, 2, 1), vec![4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_rotate_90_cw() {
        let (dst, w, h) = rotate_90_cw(&SRC, 3, 2, 1);
        assert_eq!((w, h), (2, 3));
        // 4 1
        // 5 2
        // 6 3
        assert_eq!(dst, vec![4, 1, 5, 2, 6, 3]);
    }

    #[test]
    fn test_rotate_90_ccw() {
        let (dst, w, h) = rotate_90_ccw(&SRC, 3, 2, 1);
        assert_eq!((w, h), (2, 3));
        // 3 6
        // 2 5
        // 1 4
        assert_eq!(dst, vec![3, 6, 2, 5, 1, 4]);
    }

    #[test]
    fn test_rotate_180() {
        assert_eq!(rotate_180(&SRC, 3, 2, 1), vec![6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_diagonal_mirrors() {
        let (dst, w, h) = transpose(&SRC, 3, 2, 1);
        assert_eq!((w, h), (2, 3));
        assert_eq!(dst, vec![1, 4, 2, 5, 3, 6]);

        let (dst, _, _) = transverse(&SRC, 3, 2, 1);
        assert_eq!(dst, vec![6, 3, 5, 2, 4, 1]);
    }

    #[test]
    fn test_multichannel_pixels_move_together() {
        let src = [1u8, 2, 3, 4, 5, 6];
        let (dst, w, h) = rotate_90_cw(&src, 2, 1, 3);
        assert_eq!((w, h), (1, 2));
        assert_eq!(dst, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(flip_h(&src, 2, 1, 3), vec![4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_rotate_right_angle_sign() {
        let (ccw, _, _) = rotate_right_angle(&SRC, 3, 2, 1, 90).unwrap();
        let (cw, _, _) = rotate_right_angle(&SRC, 3, 2, 1, -90).unwrap();
        assert_eq!(ccw, rotate_90_ccw(&SRC, 3, 2, 1).0);
        assert_eq!(cw, rotate_90_cw(&SRC, 3, 2, 1).0);
        assert_eq!(rotate_right_angle(&SRC, 3, 2, 1, 270).unwrap().0, cw);
        assert_eq!(rotate_right_angle(&SRC, 3, 2, 1, 450).unwrap().0, ccw);

        let (same, w, h) = rotate_right_angle(&SRC, 3, 2, 1, 0).unwrap();
        assert_eq!((same, w, h), (SRC.to_vec(), 3, 2));
        assert_eq!(rotate_right_angle(&SRC, 3, 2, 1, -180).unwrap().0, rotate_180(&SRC, 3, 2, 1));
    }

    #[test]
    fn test_rotate_rejects_odd_angles() {
        assert!(matches!(
            rotate_right_angle(&SRC, 3, 2, 1, 45),
            Err(OpsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_orientation_round_trips() {
        // Storing an upright image with orientation N means applying the
        // inverse; orientation 6 stores a CCW-rotated image.
        let (stored, w, h) = rotate_90_ccw(&SRC, 3, 2, 1);
        let (upright, uw, uh) = apply_orientation(&stored, w, h, 1, Orientation::Rotate90);
        assert_eq!((upright, uw, uh), (SRC.to_vec(), 3, 2));

        let (stored, w, h) = rotate_90_cw(&SRC, 3, 2, 1);
        let (upright, _, _) = apply_orientation(&stored, w, h, 1, Orientation::Rotate270);
        assert_eq!(upright, SRC.to_vec());

        for o in [Orientation::FlipHorizontal, Orientation::FlipVertical, Orientation::Rotate180] {
            let (once, w, h) = apply_orientation(&SRC, 3, 2, 1, o);
            let (twice, _, _) = apply_orientation(&once, w, h, 1, o);
            assert_eq!(twice, SRC.to_vec());
        }
    }

    #[test]
    fn test_upright_dimensions() {
        let mut img = ImageData::filled(40, 30, [0, 0, 0]);
        assert_eq!(upright_dimensions(&img, 0).unwrap(), (40, 30));
        assert_eq!(upright_dimensions(&img, -90).unwrap(), (30, 40));

        img.metadata.orientation = Some(Orientation::Rotate90);
        assert_eq!(upright_dimensions(&img, 0).unwrap(), (30, 40));
        assert_eq!(upright_dimensions(&img, 90).unwrap(), (40, 30));
    }
}
