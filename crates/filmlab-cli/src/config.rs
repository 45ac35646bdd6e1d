//! YAML configuration for the develop commands.
//!
//! Every field is optional; missing fields take their defaults and
//! command-line flags override whatever the file sets.
//!
//! ```yaml
//! filter_dirs: [Filters, /opt/filmlab/filters]
//! jpeg_quality: 92
//! include_original: true
//! params:
//!   rotation_degrees: -90
//!   grain_sigma: 6.0
//!   vignette_strength: 0.25
//! ```

use anyhow::{Context, Result, bail};
use filmlab_ops::{DEFAULT_JPEG_QUALITY, DEFAULT_PREVIEW_WIDTH, TransformParams};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory searched when neither the config nor the command line names one.
pub const DEFAULT_FILTER_DIR: &str = "Filters";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevelopConfig {
    /// Filter directories, first match wins.
    pub filter_dirs: Vec<PathBuf>,
    /// Base stage parameters.
    pub params: TransformParams,
    pub preview_width: u32,
    pub jpeg_quality: u8,
    /// Emit the unfiltered image alongside the filtered ones.
    pub include_original: bool,
}

impl Default for DevelopConfig {
    fn default() -> Self {
        Self {
            filter_dirs: vec![PathBuf::from(DEFAULT_FILTER_DIR)],
            params: TransformParams::default(),
            preview_width: DEFAULT_PREVIEW_WIDTH,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            include_original: false,
        }
    }
}

impl DevelopConfig {
    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Reads and validates a YAML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = Self::from_yaml_str(&text)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parses and validates YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        check_quality(self.jpeg_quality)?;
        if self.preview_width == 0 {
            bail!("preview_width must be > 0");
        }
        Ok(())
    }
}

/// JPEG quality must be within 1..=100.
pub fn check_quality(quality: u8) -> Result<u8> {
    if !(1..=100).contains(&quality) {
        bail!("JPEG quality must be within 1-100, got {}", quality);
    }
    Ok(quality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filmlab_ops::Filter;

    #[test]
    fn test_defaults() {
        let config = DevelopConfig::default();
        assert_eq!(config.filter_dirs, vec![PathBuf::from("Filters")]);
        assert_eq!(config.jpeg_quality, 95);
        assert_eq!(config.preview_width, 800);
        assert_eq!(config.params, TransformParams::default());
        assert_eq!(DevelopConfig::load(None).unwrap(), config);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
filter_dirs: [Filters, extra]
jpeg_quality: 90
params:
  rotation_degrees: -90
  grain_sigma: 6.0
  resample: bilinear
"#;
        let config = DevelopConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.filter_dirs.len(), 2);
        assert_eq!(config.jpeg_quality, 90);
        assert_eq!(config.params.rotation_degrees, -90);
        assert_eq!(config.params.grain_sigma, 6.0);
        assert_eq!(config.params.resample, Filter::Bilinear);
        // Untouched fields keep defaults
        assert_eq!(config.params.vignette_strength, 0.4);
        assert_eq!(config.preview_width, 800);
    }

    #[test]
    fn test_invalid_values() {
        assert!(DevelopConfig::from_yaml_str("jpeg_quality: 0").is_err());
        assert!(DevelopConfig::from_yaml_str("preview_width: 0").is_err());
        assert!(DevelopConfig::from_yaml_str("params:\n  rotation_degrees: 45").is_err());
        assert!(DevelopConfig::from_yaml_str("params:\n  vignette_strength: 2.0").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filmlab.yaml");
        fs::write(&path, "include_original: true\n").unwrap();
        assert!(DevelopConfig::from_file(&path).unwrap().include_original);
        assert!(DevelopConfig::from_file(dir.path().join("missing.yaml")).is_err());
    }
}
