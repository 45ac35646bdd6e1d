//! Format detection from magic bytes and file extensions.

use std::path::Path;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// PNG format.
    Png,
    /// JPEG format.
    Jpeg,
    /// Unknown/unsupported format.
    Unknown,
}

impl Format {
    /// Detects format from file contents, falling back to the extension.
    pub fn detect<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Self {
        match Self::from_bytes(bytes) {
            Format::Unknown => Self::from_extension(path),
            format => format,
        }
    }

    /// Detects format from file extension only.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("png") => Format::Png,
            Some("jpg") | Some("jpeg") | Some("jpe") => Format::Jpeg,
            _ => Format::Unknown,
        }
    }

    /// Detects format from raw bytes (magic number check).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        // PNG: 0x89 'P' 'N' 'G' CR LF SUB LF
        if bytes.len() >= 8 && bytes[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
            return Format::Png;
        }

        // JPEG: SOI followed by a marker
        if bytes.len() >= 3 && bytes[0..3] == [0xFF, 0xD8, 0xFF] {
            return Format::Jpeg;
        }

        Format::Unknown
    }

    /// Returns the canonical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Jpeg => "jpg",
            Format::Unknown => "",
        }
    }

    /// Returns true for files that look like supported images by name.
    pub fn is_supported_path<P: AsRef<Path>>(path: P) -> bool {
        Self::from_extension(path) != Format::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Format::from_extension("a.JPG"), Format::Jpeg);
        assert_eq!(Format::from_extension("a.jpeg"), Format::Jpeg);
        assert_eq!(Format::from_extension("a.png"), Format::Png);
        assert_eq!(Format::from_extension("a.tif"), Format::Unknown);
        assert_eq!(Format::from_extension("noext"), Format::Unknown);
    }

    #[test]
    fn test_magic_wins_over_extension() {
        let png_magic = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(Format::detect("misnamed.jpg", &png_magic), Format::Png);
        assert_eq!(Format::detect("photo.jpg", b"garbage"), Format::Jpeg);
        assert_eq!(Format::detect("photo.bin", &[0xFF, 0xD8, 0xFF, 0xE0]), Format::Jpeg);
        assert_eq!(Format::detect("photo.bin", b""), Format::Unknown);
    }

    #[test]
    fn test_extension_and_supported_paths() {
        assert_eq!(Format::Jpeg.extension(), "jpg");
        assert_eq!(Format::from_extension(format!("x.{}", Format::Png.extension())), Format::Png);
        assert!(Format::is_supported_path("shots/IMG_0001.JPEG"));
        assert!(!Format::is_supported_path("shots/notes.txt"));
    }
}
