//! PNG format support.
//!
//! Any PNG color type and bit depth is accepted on input: the decoder
//! expands palettes and strips 16-bit samples, then gray is widened and
//! alpha dropped so the result is always 8-bit RGB. Output is 8-bit RGB.
//!
//! # Example
//!
//! ```rust,ignore
//! use filmlab_io::png::{read, write};
//!
//! let image = read("scan.png")?;
//! write("copy.png", &image)?;
//! ```

use crate::{Format, ImageData, IoError, IoResult, Metadata};
use std::fs::File;
use std::io::{BufReader, BufWriter, BufRead, Cursor, Seek};
use std::path::Path;

fn decode<R: BufRead + Seek>(reader: R) -> IoResult<ImageData> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let rgb: Vec<u8> = match info.color_type {
        png::ColorType::Rgb => buf,
        png::ColorType::Rgba => buf
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g]).collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0]])
            .collect(),
        png::ColorType::Indexed => {
            return Err(IoError::DecodeError("palette was not expanded".into()));
        }
    };

    let metadata = Metadata {
        orientation: None,
        source_format: Some(Format::Png),
    };
    ImageData::from_rgb(info.width, info.height, rgb).map(|img| img.with_metadata(metadata))
}

/// Reads a PNG file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<ImageData> {
    let file = File::open(path.as_ref())?;
    decode(BufReader::new(file))
}

/// Decodes a PNG from a byte slice.
pub fn read_from_memory(data: &[u8]) -> IoResult<ImageData> {
    decode(Cursor::new(data))
}

/// Encodes an image as 8-bit RGB PNG into a byte vector.
pub fn write_to_memory(image: &ImageData) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, image.width, image.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::default());
        encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

        let mut writer = encoder
            .write_header()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        writer
            .write_image_data(&image.data)
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| IoError::EncodeError(e.to_string()))?;
    }
    Ok(out)
}

/// Writes an image to a PNG file.
pub fn write<P: AsRef<Path>>(path: P, image: &ImageData) -> IoResult<()> {
    let data = write_to_memory(image)?;
    let mut file = BufWriter::new(File::create(path.as_ref())?);
    std::io::Write::write_all(&mut file, &data)?;
    std::io::Write::flush(&mut file)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_raw(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn test_roundtrip_rgb() {
        let data: Vec<u8> = (0..16 * 8 * 3).map(|i| (i % 251) as u8).collect();
        let image = ImageData::from_rgb(16, 8, data.clone()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");

        write(&path, &image).unwrap();
        let loaded = read(&path).unwrap();

        assert_eq!((loaded.width, loaded.height), (16, 8));
        assert_eq!(loaded.data, data);
        assert_eq!(loaded.metadata.source_format, Some(Format::Png));
        assert_eq!(loaded.metadata.orientation, None);
    }

    #[test]
    fn test_rgba_drops_alpha() {
        let bytes = encode_raw(2, 1, png::ColorType::Rgba, &[10, 20, 30, 0, 40, 50, 60, 255]);
        let image = read_from_memory(&bytes).unwrap();
        assert_eq!(image.data, vec![10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_gray_expands() {
        let bytes = encode_raw(3, 1, png::ColorType::Grayscale, &[0, 128, 255]);
        let image = read_from_memory(&bytes).unwrap();
        assert_eq!(image.data, vec![0, 0, 0, 128, 128, 128, 255, 255, 255]);

        let bytes = encode_raw(1, 1, png::ColorType::GrayscaleAlpha, &[77, 9]);
        assert_eq!(read_from_memory(&bytes).unwrap().data, vec![77, 77, 77]);
    }

    #[test]
    fn test_corrupt_is_decode_error() {
        let bytes = encode_raw(4, 4, png::ColorType::Rgb, &[1u8; 48]);
        let truncated = &bytes[..bytes.len() - 20];
        assert!(matches!(read_from_memory(truncated), Err(IoError::DecodeError(_))));
    }
}
