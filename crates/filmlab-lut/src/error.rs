//! LUT error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur during LUT operations.
#[derive(Debug, Error)]
pub enum LutError {
    /// Invalid LUT size.
    #[error("invalid LUT size: {0}")]
    InvalidSize(String),

    /// The filter file contained no usable integer data.
    #[error("no curve data found")]
    NoData,

    /// A requested filter is not in the catalog.
    #[error("unknown filter: {name}")]
    UnknownFilter {
        /// Name that was requested.
        name: String,
    },

    /// Failed to read or write a filter file.
    #[error("{}: {source}", path.display())]
    File {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
