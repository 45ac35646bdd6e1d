//! Source metadata relevant to processing.
//!
//! Only the EXIF orientation tag is extracted. It is read straight from the
//! JPEG APP1 segment: the TIFF header, IFD0, then tag `0x0112`.

use crate::Format;

/// EXIF orientation tag.
const TAG_ORIENTATION: u16 = 0x0112;

/// How stored pixels must be transformed to appear upright.
///
/// Values follow the EXIF orientation tag (1..=8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// 1: stored upright.
    #[default]
    Normal,
    /// 2: mirrored left to right.
    FlipHorizontal,
    /// 3: upside down.
    Rotate180,
    /// 4: mirrored top to bottom.
    FlipVertical,
    /// 5: mirrored along the main diagonal.
    Transpose,
    /// 6: needs a 90 degree clockwise turn.
    Rotate90,
    /// 7: mirrored along the anti-diagonal.
    Transverse,
    /// 8: needs a 90 degree counter-clockwise turn.
    Rotate270,
}

impl Orientation {
    /// Maps an EXIF tag value; out-of-range values yield `None`.
    pub fn from_exif(value: u16) -> Option<Self> {
        Some(match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270,
            _ => return None,
        })
    }

    /// Returns the EXIF tag value.
    pub fn to_exif(self) -> u16 {
        match self {
            Orientation::Normal => 1,
            Orientation::FlipHorizontal => 2,
            Orientation::Rotate180 => 3,
            Orientation::FlipVertical => 4,
            Orientation::Transpose => 5,
            Orientation::Rotate90 => 6,
            Orientation::Transverse => 7,
            Orientation::Rotate270 => 8,
        }
    }

    /// True if applying this orientation swaps width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90
                | Orientation::Transverse
                | Orientation::Rotate270
        )
    }
}

/// Metadata carried alongside decoded pixels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// EXIF orientation, if the source carried one.
    pub orientation: Option<Orientation>,
    /// Container the pixels were decoded from.
    pub source_format: Option<Format>,
}

/// Finds the EXIF orientation in a JPEG byte stream.
///
/// Walks the marker segments up to start-of-scan and parses the first APP1
/// segment that carries an `Exif\0\0` header.
pub fn jpeg_orientation(data: &[u8]) -> Option<Orientation> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return None;
    }

    let mut pos = 2usize;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }
        while pos < data.len() && data[pos] == 0xFF {
            pos += 1;
        }
        if pos >= data.len() {
            break;
        }

        let marker = data[pos];
        pos += 1;

        // EOI / SOS: no metadata past this point
        if marker == 0xD9 || marker == 0xDA {
            break;
        }
        // Standalone markers
        if (0xD0..=0xD7).contains(&marker) || marker == 0x01 {
            continue;
        }

        if pos + 2 > data.len() {
            break;
        }
        let seg_len = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        pos += 2;
        if seg_len < 2 || pos + seg_len - 2 > data.len() {
            break;
        }
        let segment = &data[pos..pos + seg_len - 2];

        if marker == 0xE1 && segment.starts_with(b"Exif\0\0") {
            return exif_orientation(&segment[6..]);
        }
        pos += seg_len - 2;
    }
    None
}

/// Reads the orientation tag from a TIFF-structured EXIF block.
pub fn exif_orientation(tiff: &[u8]) -> Option<Orientation> {
    if tiff.len() < 8 {
        return None;
    }
    let le = match (tiff[0], tiff[1]) {
        (b'I', b'I') => true,
        (b'M', b'M') => false,
        _ => return None,
    };

    let read_u16 = |off: usize| -> Option<u16> {
        let b = tiff.get(off..off + 2)?;
        Some(if le {
            u16::from_le_bytes([b[0], b[1]])
        } else {
            u16::from_be_bytes([b[0], b[1]])
        })
    };
    let read_u32 = |off: usize| -> Option<u32> {
        let b = tiff.get(off..off + 4)?;
        Some(if le {
            u32::from_le_bytes([b[0], b[1], b[2], b[3]])
        } else {
            u32::from_be_bytes([b[0], b[1], b[2], b[3]])
        })
    };

    if read_u16(2)? != 42 {
        return None;
    }

    let ifd = read_u32(4)? as usize;
    let count = read_u16(ifd)? as usize;
    for i in 0..count {
        let entry = ifd + 2 + i * 12;
        if read_u16(entry)? == TAG_ORIENTATION {
            // SHORT value stored inline in the first two bytes of the value field
            return Orientation::from_exif(read_u16(entry + 8)?);
        }
    }
    None
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a minimal APP1 EXIF segment holding only an orientation tag.
    pub(crate) fn exif_segment(orientation: u16, little_endian: bool) -> Vec<u8> {
        let u16b = |v: u16| if little_endian { v.to_le_bytes() } else { v.to_be_bytes() };
        let u32b = |v: u32| if little_endian { v.to_le_bytes() } else { v.to_be_bytes() };

        let mut tiff = Vec::new();
        tiff.extend_from_slice(if little_endian { b"II" } else { b"MM" });
        tiff.extend_from_slice(&u16b(42));
        tiff.extend_from_slice(&u32b(8));
        tiff.extend_from_slice(&u16b(1));
        tiff.extend_from_slice(&u16b(TAG_ORIENTATION));
        tiff.extend_from_slice(&u16b(3)); // SHORT
        tiff.extend_from_slice(&u32b(1));
        tiff.extend_from_slice(&u16b(orientation));
        tiff.extend_from_slice(&[0, 0]);
        tiff.extend_from_slice(&u32b(0));

        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(&tiff);

        let mut seg = vec![0xFF, 0xE1];
        seg.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        seg.extend_from_slice(&payload);
        seg
    }

    /// Inserts an APP1 segment right after SOI.
    pub(crate) fn with_exif(jpeg: &[u8], orientation: u16) -> Vec<u8> {
        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&exif_segment(orientation, false));
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    #[test]
    fn test_from_exif_range() {
        for v in 1..=8 {
            assert_eq!(Orientation::from_exif(v).unwrap().to_exif(), v);
        }
        assert_eq!(Orientation::from_exif(0), None);
        assert_eq!(Orientation::from_exif(9), None);
        assert!(Orientation::Rotate90.swaps_dimensions());
        assert!(!Orientation::Rotate180.swaps_dimensions());
    }

    #[test]
    fn test_both_byte_orders() {
        for le in [true, false] {
            let mut jpeg = vec![0xFF, 0xD8];
            jpeg.extend_from_slice(&exif_segment(6, le));
            jpeg.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02]);
            assert_eq!(jpeg_orientation(&jpeg), Some(Orientation::Rotate90));
        }
    }

    #[test]
    fn test_skips_other_segments() {
        let mut jpeg = vec![0xFF, 0xD8];
        // APP0 JFIF
        jpeg.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x07, b'J', b'F', b'I', b'F', 0]);
        // APP1 XMP, not EXIF
        jpeg.extend_from_slice(&[0xFF, 0xE1, 0x00, 0x05, b'h', b't', b't']);
        jpeg.extend_from_slice(&exif_segment(3, true));
        assert_eq!(jpeg_orientation(&jpeg), Some(Orientation::Rotate180));
    }

    #[test]
    fn test_missing_or_truncated() {
        assert_eq!(jpeg_orientation(&[0xFF, 0xD8, 0xFF, 0xDA, 0, 2]), None);
        assert_eq!(jpeg_orientation(b"not a jpeg"), None);

        let mut truncated = vec![0xFF, 0xD8];
        let seg = exif_segment(6, true);
        truncated.extend_from_slice(&seg[..seg.len() - 6]);
        assert_eq!(jpeg_orientation(&truncated), None);
    }
}
