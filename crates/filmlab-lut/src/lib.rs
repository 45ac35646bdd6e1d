//! # filmlab-lut
//!
//! Film filter lookup tables for the filmlab photo pipeline.
//!
//! A film filter is a per-channel 8-bit tone curve stored as a loosely
//! formatted text file (`.flt` or `.fit`). This crate turns such files into
//! a normalized 3x256 table and collects them into a named catalog.
//!
//! # Modules
//!
//! - [`flt`] - tolerant parsing and canonical writing of filter files
//! - [`Catalog`] - directory scanning with first-wins name resolution
//! - [`Lut`] - the normalized table itself
//!
//! # Usage
//!
//! ```rust
//! use filmlab_lut::{Catalog, Channel, IDENTITY_NAME};
//!
//! let catalog = Catalog::load::<&str>(&[]);
//! let original = catalog.get(IDENTITY_NAME).unwrap();
//! assert_eq!(original.lookup(Channel::Red, 42), 42);
//! ```
//!
//! # Used By
//!
//! - `filmlab-ops` - LUT application and the batch developer
//! - `filmlab-cli` - filter listing and creation

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod catalog;
mod error;
mod lut;
pub mod flt;

pub use catalog::{Catalog, IDENTITY_NAME};
pub use error::{LutError, LutResult};
pub use flt::{ParseOptions, parse_str, read_filter, write_filter};
pub use lut::{CHANNEL_LEN, Channel, LUT_LEN, Lut};
