//! Film filter (.flt / .fit) curve file support.
//!
//! Filter files are loosely specified text files. The common layout is
//! seven lines: four header lines followed by the red, green and blue
//! curves as 256 comma- or space-separated integers each.
//!
//! # Format
//!
//! ```text
//! # filmlab filter
//! # name: Portra
//! # channels: R G B
//! # entries: 256
//! 0,1,2,3,...,255
//! 0,1,2,3,...,255
//! 0,1,2,3,...,255
//! ```
//!
//! Files found in the wild deviate from this freely: fewer header lines,
//! curves wrapped over many lines, a single grayscale curve, signed values,
//! odd whitespace. The parser therefore does not rely on line positions.
//! A line counts as curve data when it holds more integer tokens than
//! [`ParseOptions::min_tokens`]; integer tokens of all data lines are
//! concatenated in file order and normalized with [`Lut::from_values`].
//!
//! # Example
//!
//! ```rust
//! use filmlab_lut::flt::{parse_str, ParseOptions};
//!
//! let curve: Vec<String> = (0..256).map(|i| i.to_string()).collect();
//! let text = format!("GRAY\n{}\n", curve.join(" "));
//! let lut = parse_str(&text, ParseOptions::default()).unwrap();
//! assert!(lut.is_identity());
//! ```

use crate::{Channel, Lut, LutError, LutResult};
use std::fmt::Write as _;
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::trace;

/// Recognized filter file extensions (matched case-insensitively).
pub const EXTENSIONS: &[&str] = &["flt", "fit"];

/// Data-line detection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// A line is curve data when it has more than this many integer tokens.
    pub min_tokens: usize,
}

impl ParseOptions {
    /// Accepts short wrapped lines (more than 10 integers).
    pub const fn lenient() -> Self {
        Self { min_tokens: 10 }
    }

    /// Only accepts lines that look like whole curves (more than 100 integers).
    pub const fn strict() -> Self {
        Self { min_tokens: 100 }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::lenient()
    }
}

/// Integer tokens collected from the data lines of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurveData {
    /// Values in file order.
    pub values: Vec<i32>,
    /// Number of lines that qualified as data lines.
    pub data_lines: usize,
}

impl CurveData {
    /// Normalizes the collected values into a table.
    pub fn into_lut(self) -> LutResult<Lut> {
        Lut::from_values(self.values, self.data_lines)
    }
}

/// Returns true if the path has a recognized filter extension.
pub fn is_filter_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Splits a line on commas and whitespace and keeps the integer tokens.
///
/// A leading `+` or `-` sign is accepted; anything else that does not parse
/// as an `i32` (decimals, words, overflowing numbers) is dropped.
pub fn line_integers(line: &str) -> impl Iterator<Item = i32> + '_ {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .filter_map(|tok| tok.parse::<i32>().ok())
}

/// Collects integer tokens from every qualifying data line.
pub fn scan_lines<'a, I>(lines: I, options: ParseOptions) -> CurveData
where
    I: IntoIterator<Item = &'a str>,
{
    let mut data = CurveData::default();
    for line in lines {
        let ints: Vec<i32> = line_integers(line).collect();
        if ints.len() > options.min_tokens {
            data.values.extend(ints);
            data.data_lines += 1;
        }
    }
    trace!(values = data.values.len(), lines = data.data_lines, "scanned filter data");
    data
}

/// Parses filter text into a normalized table.
///
/// Returns [`LutError::NoData`] when no line qualifies as curve data.
pub fn parse_str(text: &str, options: ParseOptions) -> LutResult<Lut> {
    scan_lines(text.lines(), options).into_lut()
}

/// Parses raw file bytes, replacing invalid UTF-8 sequences.
pub fn parse_bytes(bytes: &[u8], options: ParseOptions) -> LutResult<Lut> {
    parse_str(&String::from_utf8_lossy(bytes), options)
}

/// Parses a filter from any reader.
pub fn parse_reader<R: Read>(mut reader: R, options: ParseOptions) -> LutResult<Lut> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_bytes(&bytes, options)
}

/// Reads and parses a filter file.
///
/// # Example
///
/// ```rust,ignore
/// use filmlab_lut::flt::{read_filter, ParseOptions};
///
/// let lut = read_filter("Filters/Portra.flt", ParseOptions::default())?;
/// ```
pub fn read_filter<P: AsRef<Path>>(path: P, options: ParseOptions) -> LutResult<Lut> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|source| LutError::File {
        path: path.to_path_buf(),
        source,
    })?;
    parse_reader(BufReader::new(file), options)
}

/// Formats a table in the canonical seven-line layout.
pub fn format_filter(lut: &Lut, name: &str) -> String {
    let mut out = String::with_capacity(4 * 1024);
    out.push_str("# filmlab filter\n");
    let _ = writeln!(out, "# name: {}", name);
    out.push_str("# channels: R G B\n");
    out.push_str("# entries: 256\n");
    for channel in Channel::ALL {
        let line: Vec<String> = lut.channel(channel).iter().map(|v| v.to_string()).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

/// Writes a table to a filter file.
///
/// The file stem becomes the name recorded in the header.
pub fn write_filter<P: AsRef<Path>>(path: P, lut: &Lut) -> LutResult<()> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("filter");
    fs::write(path, format_filter(lut, name)).map_err(|source| LutError::File {
        path: path.to_path_buf(),
        source,
    })
}
