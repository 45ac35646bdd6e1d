//! # filmlab-io
//!
//! Image decoding and encoding for the filmlab pipeline.
//!
//! Every image is handled as packed 8-bit RGB: whatever the source layout
//! (gray, alpha, CMYK, palette, 16-bit), decoding converts it to three
//! bytes per pixel. EXIF orientation is recorded in [`Metadata`] but never
//! applied here; `filmlab-ops` normalizes orientation as its first stage.
//!
//! # Supported Formats
//!
//! | Format | Read | Write | Feature |
//! |--------|------|-------|---------|
//! | JPEG   | yes  | yes   | `jpeg`  |
//! | PNG    | yes  | yes   | `png`   |
//!
//! # Example
//!
//! ```rust,ignore
//! use filmlab_io::{read, jpeg::JpegWriter};
//!
//! let image = read("IMG_0001.jpg")?;
//! println!("{}x{} {:?}", image.width, image.height, image.metadata.orientation);
//! JpegWriter::new().write("copy.jpg", &image)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod detect;
mod error;
pub mod metadata;

#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png")]
pub mod png;

pub use detect::Format;
pub use error::{IoError, IoResult};
pub use metadata::{Metadata, Orientation};

use std::path::Path;
use tracing::debug;

/// Channels per pixel in every [`ImageData`].
pub const CHANNELS: usize = 3;

/// Packed 8-bit RGB image.
///
/// `data.len() == width * height * 3` always holds for values built through
/// the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGB bytes.
    pub data: Vec<u8>,
    /// Source metadata.
    pub metadata: Metadata,
}

impl ImageData {
    /// Wraps an RGB buffer, checking its length.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> IoResult<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(IoError::DimensionMismatch {
                expected: format!("{} bytes for {}x{}", expected, width, height),
                actual: format!("{} bytes", data.len()),
            });
        }
        Ok(Self {
            width,
            height,
            data,
            metadata: Metadata::default(),
        })
    }

    /// Creates an image filled with one color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
            metadata: Metadata::default(),
        }
    }

    /// Replaces the metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Bytes per row.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// Total pixel count.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Sets the pixel at `(x, y)`.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        self.data[i..i + CHANNELS].copy_from_slice(&rgb);
    }
}

/// Reads an image file, detecting the format from content then extension.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let format = Format::detect(path, &bytes);
    debug!(path = %path.display(), ?format, bytes = bytes.len(), "reading image");
    decode(format, &bytes)
}

/// Decodes an in-memory image, detecting the format from its magic bytes.
pub fn read_from_memory(bytes: &[u8]) -> IoResult<ImageData> {
    decode(Format::from_bytes(bytes), bytes)
}

fn decode(format: Format, bytes: &[u8]) -> IoResult<ImageData> {
    match format {
        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::read_from_memory(bytes),
        #[cfg(feature = "png")]
        Format::Png => png::read_from_memory(bytes),
        other => Err(IoError::UnsupportedFormat(format!("{:?}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb_checks_length() {
        assert!(ImageData::from_rgb(2, 2, vec![0; 12]).is_ok());
        assert!(matches!(
            ImageData::from_rgb(2, 2, vec![0; 11]),
            Err(IoError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_pixel_access() {
        let mut img = ImageData::filled(3, 2, [1, 2, 3]);
        assert_eq!(img.pixel_count(), 6);
        assert_eq!(img.row_stride(), 9);
        img.set_pixel(2, 1, [9, 8, 7]);
        assert_eq!(img.pixel(2, 1), [9, 8, 7]);
        assert_eq!(img.pixel(0, 0), [1, 2, 3]);
        assert_eq!(&img.data[15..18], &[9, 8, 7]);
    }

    #[test]
    #[cfg(all(feature = "jpeg", feature = "png"))]
    fn test_read_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let img = ImageData::filled(8, 8, [200, 100, 50]);

        let png_path = dir.path().join("a.png");
        png::write(&png_path, &img).unwrap();
        assert_eq!(read(&png_path).unwrap().metadata.source_format, Some(Format::Png));

        // Content wins over a misleading extension
        let misnamed = dir.path().join("b.png");
        jpeg::write(&misnamed, &img).unwrap();
        assert_eq!(read(&misnamed).unwrap().metadata.source_format, Some(Format::Jpeg));

        let garbage = dir.path().join("c.jpg");
        std::fs::write(&garbage, b"this is not an image").unwrap();
        assert!(matches!(read(&garbage), Err(IoError::DecodeError(_))));

        let unknown = dir.path().join("d.txt");
        std::fs::write(&unknown, b"hello").unwrap();
        assert!(matches!(read(&unknown), Err(IoError::UnsupportedFormat(_))));

        assert!(matches!(read(dir.path().join("missing.jpg")), Err(IoError::Io(_))));
    }
}
