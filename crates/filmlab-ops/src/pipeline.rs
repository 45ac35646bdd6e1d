//! The develop pipeline: base stage, LUT remap, encode.
//!
//! [`prepare_base`] runs the fixed-order base stage once per image:
//!
//! 1. EXIF orientation normalization (when the source carried one)
//! 2. explicit rotation (positive is counter-clockwise, canvas expands)
//! 3. resize to the target width (aspect preserved), bounded by the size cap
//!    on the longer side; the final size is resolved first and resampled once
//! 4. Gaussian blur
//! 5. vignette
//! 6. grain
//! 7. clip and round to 8-bit
//!
//! Steps 1 and 2 shuffle bytes; steps 3 to 6 work on `f32` samples and the
//! result is quantized once. The base image is then fanned out to any
//! number of [`apply_lut`] calls.

use crate::filter::gaussian_blur;
use crate::grain::apply_grain;
use crate::resize::{cap_dimensions, resize_f32, width_to_height};
use crate::transform::{apply_orientation, rotate_right_angle, upright_dimensions};
use crate::vignette::apply_vignette;
use crate::{OpsError, OpsResult, TransformParams, apply_lut};
use filmlab_io::jpeg::{JpegWriter, JpegWriterOptions, Subsampling};
use filmlab_io::{CHANNELS, Format, ImageData, Metadata};
use filmlab_lut::Lut;
use tracing::{debug, trace};

/// Default preview width in pixels.
pub const DEFAULT_PREVIEW_WIDTH: u32 = 800;

/// Default JPEG quality for developed images.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Runs the base stage on a decoded image.
///
/// The returned image has no orientation tag: orientation has been applied.
///
/// # Example
///
/// ```rust
/// use filmlab_io::ImageData;
/// use filmlab_ops::{prepare_base, TransformParams};
///
/// let raw = ImageData::filled(64, 48, [120, 120, 120]);
/// let params = TransformParams { rotation_degrees: 90, seed: Some(1), ..Default::default() };
/// let base = prepare_base(&raw, &params).unwrap();
/// assert_eq!(base.dimensions(), (48, 64));
/// ```
pub fn prepare_base(raw: &ImageData, params: &TransformParams) -> OpsResult<ImageData> {
    params.validate()?;

    let (w, h) = (raw.width as usize, raw.height as usize);
    if w == 0 || h == 0 || raw.data.len() != w * h * CHANNELS {
        return Err(OpsError::InvalidDimensions(format!(
            "{}x{} image with {} bytes",
            raw.width,
            raw.height,
            raw.data.len()
        )));
    }
    trace!(w, h, ?params, "prepare_base");

    let (bytes, w, h) = match raw.metadata.orientation {
        Some(orientation) => apply_orientation(&raw.data, w, h, CHANNELS, orientation),
        None => (raw.data.clone(), w, h),
    };
    let (bytes, mut w, mut h) = rotate_right_angle(&bytes, w, h, CHANNELS, params.rotation_degrees)?;

    let mut samples: Vec<f32> = bytes.iter().map(|&v| v as f32).collect();
    drop(bytes);

    // Target size and cap resolve to one output size before any resampling
    let (mut target_w, mut target_h) = match params.target_width {
        Some(tw) => (tw as usize, width_to_height(w, h, tw as usize)),
        None => (w, h),
    };
    if let Some((cap_w, cap_h)) = cap_dimensions(target_w, target_h, params.max_dimension as usize) {
        debug!(target_w, target_h, cap_w, cap_h, "size cap applied");
        (target_w, target_h) = (cap_w, cap_h);
    }
    if (target_w, target_h) != (w, h) {
        debug!(from_w = w, from_h = h, target_w, target_h, "resizing");
        samples = resize_f32(&samples, w, h, CHANNELS, target_w, target_h, params.resample)?;
        (w, h) = (target_w, target_h);
    }

    samples = gaussian_blur(&samples, w, h, CHANNELS, params.blur_sigma)?;
    apply_vignette(&mut samples, w, h, CHANNELS, params.vignette_strength)?;
    apply_grain(&mut samples, w, h, CHANNELS, params.grain_sigma, params.seed)?;

    let data: Vec<u8> = samples
        .iter()
        .map(|&v| v.round().clamp(0.0, 255.0) as u8)
        .collect();

    let metadata = Metadata {
        orientation: None,
        source_format: raw.metadata.source_format,
    };
    Ok(ImageData::from_rgb(w as u32, h as u32, data)?.with_metadata(metadata))
}

/// Renders a reduced-size preview through the same path as the final image.
///
/// The preview is `preview_width` wide after orientation and rotation, or the
/// upright width if that is smaller.
pub fn render_preview(
    raw: &ImageData,
    params: &TransformParams,
    preview_width: u32,
    lut: &Lut,
) -> OpsResult<ImageData> {
    if preview_width == 0 {
        return Err(OpsError::InvalidParameter("preview width must be > 0".into()));
    }
    let (upright_w, _) = upright_dimensions(raw, params.rotation_degrees)?;
    let preview = TransformParams {
        target_width: Some(preview_width.min(upright_w.max(1))),
        ..params.clone()
    };
    let base = prepare_base(raw, &preview)?;
    apply_lut(&base, lut)
}

/// Renders the full-size image for one filter.
pub fn render_final(raw: &ImageData, params: &TransformParams, lut: &Lut) -> OpsResult<ImageData> {
    let base = prepare_base(raw, params)?;
    apply_lut(&base, lut)
}

/// Encodes a developed image as JPEG without chroma subsampling.
pub fn encode_jpeg(image: &ImageData, quality: u8) -> OpsResult<Vec<u8>> {
    let writer = JpegWriter::with_options(JpegWriterOptions {
        quality,
        subsampling: Subsampling::S444,
    });
    Ok(writer.write_to_memory(image)?)
}

/// Artifact name for a source stem and filter name.
///
/// # Example
///
/// ```rust
/// use filmlab_ops::output_name;
///
/// assert_eq!(output_name("IMG_0042", "Portra"), "IMG_0042_Portra.jpg");
/// ```
pub fn output_name(source_stem: &str, filter_name: &str) -> String {
    format!("{}_{}.{}", source_stem, filter_name, Format::Jpeg.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use filmlab_io::Orientation;

    fn gradient(width: u32, height: u32) -> ImageData {
        let mut img = ImageData::filled(width, height, [0, 0, 0]);
        for y in 0..height {
            for x in 0..width {
                img.set_pixel(x, y, [(x * 255 / width) as u8, (y * 255 / height) as u8, 90]);
            }
        }
        img
    }

    #[test]
    fn test_neutral_params_preserve_pixels() {
        let raw = gradient(20, 10);
        let base = prepare_base(&raw, &TransformParams::neutral()).unwrap();
        assert_eq!(base.data, raw.data);
    }

    #[test]
    fn test_identity_lut_after_base() {
        let raw = gradient(40, 30);
        let params = TransformParams { seed: Some(5), ..Default::default() };
        let base = prepare_base(&raw, &params).unwrap();
        assert_eq!(apply_lut(&base, &Lut::identity()).unwrap(), base);
    }

    #[test]
    fn test_rotation_dimensions() {
        let raw = gradient(60, 40);
        for (deg, dims) in [(0, (60, 40)), (90, (40, 60)), (-90, (40, 60)), (180, (60, 40))] {
            let params = TransformParams { rotation_degrees: deg, ..TransformParams::neutral() };
            assert_eq!(prepare_base(&raw, &params).unwrap().dimensions(), dims, "{}", deg);
        }
    }

    #[test]
    fn test_rotation_direction() {
        let mut raw = ImageData::filled(3, 2, [0, 0, 0]);
        raw.set_pixel(2, 0, [255, 255, 255]); // top-right
        let params = TransformParams { rotation_degrees: 90, ..TransformParams::neutral() };
        let out = prepare_base(&raw, &params).unwrap();
        // Counter-clockwise: top-right moves to top-left
        assert_eq!(out.pixel(0, 0), [255, 255, 255]);
    }

    #[test]
    fn test_orientation_applied_before_rotation() {
        let mut raw = gradient(30, 20);
        raw.metadata.orientation = Some(Orientation::Rotate90);
        let base = prepare_base(&raw, &TransformParams::neutral()).unwrap();
        assert_eq!(base.dimensions(), (20, 30));
        assert_eq!(base.metadata.orientation, None);

        let params = TransformParams { rotation_degrees: 90, ..TransformParams::neutral() };
        assert_eq!(prepare_base(&raw, &params).unwrap().dimensions(), (30, 20));
    }

    #[test]
    fn test_target_width() {
        let raw = gradient(300, 200);
        let params = TransformParams { target_width: Some(150), ..TransformParams::neutral() };
        assert_eq!(prepare_base(&raw, &params).unwrap().dimensions(), (150, 100));

        let params = TransformParams { target_width: Some(301), ..TransformParams::neutral() };
        assert_eq!(prepare_base(&raw, &params).unwrap().dimensions(), (301, 201));
    }

    #[test]
    fn test_size_cap() {
        let raw = gradient(300, 120);
        let params = TransformParams { max_dimension: 100, ..TransformParams::neutral() };
        assert_eq!(prepare_base(&raw, &params).unwrap().dimensions(), (100, 40));

        // The cap also bounds an explicit upscale
        let params = TransformParams {
            target_width: Some(600),
            max_dimension: 200,
            ..TransformParams::neutral()
        };
        assert_eq!(prepare_base(&raw, &params).unwrap().dimensions(), (200, 80));
    }

    #[test]
    fn test_huge_target_width_is_capped_before_resampling() {
        let raw = gradient(40, 20);
        let params = TransformParams {
            target_width: Some(60_000),
            max_dimension: 100,
            ..TransformParams::neutral()
        };
        assert_eq!(prepare_base(&raw, &params).unwrap().dimensions(), (100, 50));
    }

    #[test]
    fn test_vignette_on_white() {
        let raw = ImageData::filled(41, 31, [255, 255, 255]);
        let params = TransformParams { grain_sigma: 0.0, ..Default::default() };
        let base = prepare_base(&raw, &params).unwrap();
        let center = base.pixel(20, 15)[0];
        for (x, y) in [(0, 0), (40, 0), (0, 30), (40, 30)] {
            assert!(center >= base.pixel(x, y)[0]);
        }
        assert_eq!(center, 255);
    }

    #[test]
    fn test_preview_matches_final_orientation() {
        let raw = gradient(400, 200);
        let params = TransformParams { rotation_degrees: -90, seed: Some(9), ..Default::default() };
        let lut = Lut::gamma([1.0, 1.1, 0.9]);

        let full = render_final(&raw, &params, &lut).unwrap();
        let preview = render_preview(&raw, &params, 100, &lut).unwrap();
        assert_eq!(full.dimensions(), (200, 400));
        assert_eq!(preview.dimensions(), (100, 200));

        // Preview never upscales
        let small = render_preview(&raw, &params, 5000, &lut).unwrap();
        assert_eq!(small.dimensions(), (200, 400));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut raw = gradient(4, 4);
        raw.data.truncate(10);
        assert!(matches!(
            prepare_base(&raw, &TransformParams::default()),
            Err(OpsError::InvalidDimensions(_))
        ));

        let raw = gradient(4, 4);
        let params = TransformParams { rotation_degrees: 45, ..Default::default() };
        assert!(prepare_base(&raw, &params).is_err());
        assert!(render_preview(&raw, &TransformParams::default(), 0, &Lut::identity()).is_err());
    }

    #[test]
    fn test_encode_jpeg() {
        let img = gradient(32, 16);
        let bytes = encode_jpeg(&img, DEFAULT_JPEG_QUALITY).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = filmlab_io::read_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (32, 16));
    }
}
