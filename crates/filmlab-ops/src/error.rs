//! Error types for image operations.

use filmlab_io::IoError;
use filmlab_lut::LutError;
use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Nothing to develop: the filter selection is empty.
    #[error("no filters selected")]
    NoFilters,

    /// Two units of one run produced the same artifact name.
    #[error("duplicate output name: {0}")]
    DuplicateOutput(String),

    /// Image decode/encode failure.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Filter lookup or parse failure.
    #[error(transparent)]
    Lut(#[from] LutError),
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
