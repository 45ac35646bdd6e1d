//! # filmlab-ops
//!
//! Image operations for film emulation.
//!
//! The crate turns a decoded photo into a "base" image with a fixed-order
//! degradation stage, then remaps the base through any number of per-channel
//! curves and encodes the results.
//!
//! # Modules
//!
//! - [`transform`] - Orientation normalization and right-angle rotation
//! - [`resize`] - Separable resampling and size capping
//! - [`filter`] - Gaussian blur
//! - [`vignette`] - Radial darkening
//! - [`grain`] - Achromatic Gaussian grain
//! - [`pipeline`] - Base stage, preview/final rendering, JPEG encoding
//! - [`batch`] - Many images times many filters, with a failure report
//!
//! # Example
//!
//! ```rust
//! use filmlab_io::ImageData;
//! use filmlab_lut::Lut;
//! use filmlab_ops::{apply_lut, prepare_base, TransformParams};
//!
//! let raw = ImageData::filled(320, 200, [128, 110, 96]);
//! let params = TransformParams { seed: Some(3), ..Default::default() };
//!
//! let base = prepare_base(&raw, &params).unwrap();
//! let warm = apply_lut(&base, &Lut::gamma([0.9, 1.0, 1.1])).unwrap();
//! assert_eq!(warm.dimensions(), (320, 200));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod lut;
mod params;
pub mod batch;
pub mod filter;
pub mod grain;
pub mod pipeline;
pub mod resize;
pub mod transform;
pub mod vignette;

pub use batch::{ArtifactSink, BatchReport, Developer, DirectorySink, Failure, MemorySink};
pub use error::{OpsError, OpsResult};
pub use lut::{apply_lut, apply_lut_in_place};
pub use params::{
    DEFAULT_BLUR_SIGMA, DEFAULT_GRAIN_SIGMA, DEFAULT_MAX_DIMENSION, DEFAULT_VIGNETTE,
    TransformParams,
};
pub use pipeline::{
    DEFAULT_JPEG_QUALITY, DEFAULT_PREVIEW_WIDTH, encode_jpeg, output_name, prepare_base,
    render_final, render_preview,
};
pub use resize::Filter;
