//! Transform parameters for the base stage.

use crate::resize::Filter;
use crate::transform::normalize_right_angle;
use crate::{OpsError, OpsResult};
use serde::{Deserialize, Serialize};

/// Default Gaussian blur sigma in pixels.
pub const DEFAULT_BLUR_SIGMA: f32 = 0.3;
/// Default vignette strength.
pub const DEFAULT_VIGNETTE: f32 = 0.4;
/// Default grain standard deviation in 8-bit intensity units.
pub const DEFAULT_GRAIN_SIGMA: f32 = 12.0;
/// Default cap on the longer image side.
pub const DEFAULT_MAX_DIMENSION: u32 = 2000;

/// Parameters of [`prepare_base`](crate::prepare_base).
///
/// Plain data; missing fields in a serialized form take their defaults.
///
/// # Example
///
/// ```rust
/// use filmlab_ops::TransformParams;
///
/// let params = TransformParams {
///     rotation_degrees: -90,
///     target_width: Some(1200),
///     ..Default::default()
/// };
/// params.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformParams {
    /// Rotation after orientation normalization; positive is counter-clockwise.
    pub rotation_degrees: i32,
    /// Output width; height follows the aspect ratio. `None` keeps full size.
    pub target_width: Option<u32>,
    /// Gaussian blur sigma in pixels.
    pub blur_sigma: f32,
    /// Vignette strength in `[0, 1]`.
    pub vignette_strength: f32,
    /// Grain standard deviation.
    pub grain_sigma: f32,
    /// Longer side is downscaled to this before the blur stage.
    pub max_dimension: u32,
    /// Fixed grain seed for reproducible output.
    pub seed: Option<u64>,
    /// Resampling filter for both resize steps.
    pub resample: Filter,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            rotation_degrees: 0,
            target_width: None,
            blur_sigma: DEFAULT_BLUR_SIGMA,
            vignette_strength: DEFAULT_VIGNETTE,
            grain_sigma: DEFAULT_GRAIN_SIGMA,
            max_dimension: DEFAULT_MAX_DIMENSION,
            seed: None,
            resample: Filter::Lanczos3,
        }
    }
}

impl TransformParams {
    /// Parameters that leave pixels untouched apart from orientation.
    pub fn neutral() -> Self {
        Self {
            blur_sigma: 0.0,
            vignette_strength: 0.0,
            grain_sigma: 0.0,
            max_dimension: u32::MAX,
            ..Default::default()
        }
    }

    /// Checks every field for a usable value.
    pub fn validate(&self) -> OpsResult<()> {
        normalize_right_angle(self.rotation_degrees)?;
        if self.target_width == Some(0) {
            return Err(OpsError::InvalidParameter("target width must be > 0".into()));
        }
        if !self.blur_sigma.is_finite() || self.blur_sigma < 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "blur sigma must be >= 0, got {}",
                self.blur_sigma
            )));
        }
        if !(0.0..=1.0).contains(&self.vignette_strength) {
            return Err(OpsError::InvalidParameter(format!(
                "vignette strength must be within [0, 1], got {}",
                self.vignette_strength
            )));
        }
        if !self.grain_sigma.is_finite() || self.grain_sigma < 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "grain sigma must be >= 0, got {}",
                self.grain_sigma
            )));
        }
        if self.max_dimension == 0 {
            return Err(OpsError::InvalidParameter("max dimension must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let p = TransformParams::default();
        p.validate().unwrap();
        assert_eq!(p.blur_sigma, 0.3);
        assert_eq!(p.vignette_strength, 0.4);
        assert_eq!(p.grain_sigma, 12.0);
        assert_eq!(p.max_dimension, 2000);
        TransformParams::neutral().validate().unwrap();
    }

    #[test]
    fn test_validation() {
        let bad = [
            TransformParams { rotation_degrees: 30, ..Default::default() },
            TransformParams { target_width: Some(0), ..Default::default() },
            TransformParams { blur_sigma: -0.1, ..Default::default() },
            TransformParams { vignette_strength: 1.2, ..Default::default() },
            TransformParams { grain_sigma: f32::INFINITY, ..Default::default() },
            TransformParams { max_dimension: 0, ..Default::default() },
        ];
        for p in bad {
            assert!(matches!(p.validate(), Err(OpsError::InvalidParameter(_))), "{:?}", p);
        }
        TransformParams { rotation_degrees: -270, ..Default::default() }
            .validate()
            .unwrap();
    }
}
