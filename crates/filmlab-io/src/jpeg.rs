//! JPEG format support.
//!
//! Decoding goes through `jpeg-decoder`; every input is converted to 8-bit
//! RGB. Encoding goes through `jpeg-encoder` with explicit control over
//! chroma subsampling, since final renders are written without it.
//!
//! # Example
//!
//! ```rust,ignore
//! use filmlab_io::jpeg::{JpegWriter, JpegWriterOptions, Subsampling};
//!
//! let image = filmlab_io::jpeg::read("photo.jpg")?;
//! let writer = JpegWriter::with_options(JpegWriterOptions {
//!     quality: 95,
//!     subsampling: Subsampling::S444,
//! });
//! writer.write("developed.jpg", &image)?;
//! ```

use crate::metadata::jpeg_orientation;
use crate::{Format, ImageData, IoError, IoResult, Metadata};
use std::io::{BufReader, Cursor};
use std::path::Path;
use tracing::trace;

/// Chroma subsampling mode for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Subsampling {
    /// Full-resolution chroma (no subsampling).
    #[default]
    S444,
    /// Chroma halved in both directions.
    S420,
}

/// Options for writing JPEG files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegWriterOptions {
    /// Quality level 1-100. Default: 95.
    pub quality: u8,
    /// Chroma subsampling. Default: 4:4:4.
    pub subsampling: Subsampling,
}

impl Default for JpegWriterOptions {
    fn default() -> Self {
        Self {
            quality: 95,
            subsampling: Subsampling::S444,
        }
    }
}

/// Expands native-endian 16-bit gray samples to 8-bit RGB.
fn l16_to_rgb(samples: &[u8]) -> Vec<u8> {
    samples
        .chunks_exact(2)
        .flat_map(|l16| {
            let g = (u16::from_ne_bytes([l16[0], l16[1]]) >> 8) as u8;
            [g, g, g]
        })
        .collect()
}

/// Decodes a JPEG byte stream to RGB.
pub fn read_from_memory(data: &[u8]) -> IoResult<ImageData> {
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(Cursor::new(data)));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG info".into()))?;

    let width = info.width as u32;
    let height = info.height as u32;
    trace!(width, height, format = ?info.pixel_format, "decoded JPEG");

    let rgb = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels,
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g]).collect(),
        jpeg_decoder::PixelFormat::L16 => l16_to_rgb(&pixels),
        jpeg_decoder::PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .flat_map(|cmyk| {
                let k = 1.0 - cmyk[3] as f32 / 255.0;
                let ch = |c: u8| ((1.0 - c as f32 / 255.0) * k * 255.0).round() as u8;
                [ch(cmyk[0]), ch(cmyk[1]), ch(cmyk[2])]
            })
            .collect(),
    };

    let metadata = Metadata {
        orientation: jpeg_orientation(data),
        source_format: Some(Format::Jpeg),
    };
    ImageData::from_rgb(width, height, rgb).map(|img| img.with_metadata(metadata))
}

/// Reads a JPEG file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    let data = std::fs::read(path.as_ref())?;
    read_from_memory(&data)
}

/// JPEG file writer.
#[derive(Debug, Clone, Default)]
pub struct JpegWriter {
    options: JpegWriterOptions,
}

impl JpegWriter {
    /// Creates a new writer with default options (quality 95, 4:4:4).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with custom options.
    pub fn with_options(options: JpegWriterOptions) -> Self {
        Self { options }
    }

    /// Encodes an image to a byte vector.
    pub fn write_to_memory(&self, image: &ImageData) -> IoResult<Vec<u8>> {
        use jpeg_encoder::{ColorType, Encoder, SamplingFactor};

        let (Ok(width), Ok(height)) = (u16::try_from(image.width), u16::try_from(image.height))
        else {
            return Err(IoError::EncodeError(format!(
                "{}x{} exceeds JPEG limits",
                image.width, image.height
            )));
        };

        let mut buffer = Vec::new();
        let mut encoder = Encoder::new(&mut buffer, self.options.quality.clamp(1, 100));
        encoder.set_sampling_factor(match self.options.subsampling {
            Subsampling::S444 => SamplingFactor::R_4_4_4,
            Subsampling::S420 => SamplingFactor::R_4_2_0,
        });
        encoder
            .encode(&image.data, width, height, ColorType::Rgb)
            .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;

        trace!(bytes = buffer.len(), quality = self.options.quality, "encoded JPEG");
        Ok(buffer)
    }

    /// Writes a JPEG file to disk.
    pub fn write<P: AsRef<Path>>(&self, path: P, image: &ImageData) -> IoResult<()> {
        let data = self.write_to_memory(image)?;
        std::fs::write(path.as_ref(), data)?;
        Ok(())
    }
}

/// Writes a JPEG file with default options.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData) -> IoResult<()> {
    JpegWriter::new().write(path, image)
}
