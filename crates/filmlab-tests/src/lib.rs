//! Integration tests for filmlab crates.
//!
//! End-to-end scenarios across the filter catalog, image I/O and the
//! develop pipeline.
