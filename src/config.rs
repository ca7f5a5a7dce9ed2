//! Engine configuration types.

use crate::error::{Result, SurfaceDataError};
use serde::{Deserialize, Serialize};

/// Tolerances used when consolidating neighboring surface points.
///
/// Two points merge when their positions and normals are both within
/// tolerance of each other (per-component comparison). The defaults match
/// the scale at which independent providers report "the same" surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceDataConfig {
    /// Maximum per-component position delta for two points to merge.
    /// Default: 0.001 (one millimeter at meter scale).
    pub position_tolerance: f32,

    /// Maximum per-component normal delta for two points to merge.
    /// Default: 0.001
    pub normal_tolerance: f32,
}

impl Default for SurfaceDataConfig {
    fn default() -> Self {
        Self {
            position_tolerance: 1.0e-3,
            normal_tolerance: 1.0e-3,
        }
    }
}

impl SurfaceDataConfig {
    /// Validate the configuration.
    ///
    /// Tolerances must be finite and positive; a zero tolerance would turn
    /// the neighbor merge into an exact-equality comparison that float math
    /// from independent sources will never satisfy.
    pub fn validate(&self) -> Result<()> {
        if !(self.position_tolerance.is_finite() && self.position_tolerance > 0.0) {
            return Err(SurfaceDataError::Config(format!(
                "position_tolerance must be finite and positive, got {}",
                self.position_tolerance
            )));
        }
        if !(self.normal_tolerance.is_finite() && self.normal_tolerance > 0.0) {
            return Err(SurfaceDataError::Config(format!(
                "normal_tolerance must be finite and positive, got {}",
                self.normal_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SurfaceDataConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_tolerance() {
        let config = SurfaceDataConfig {
            position_tolerance: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SurfaceDataConfig {
            normal_tolerance: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_tolerance() {
        let config = SurfaceDataConfig {
            position_tolerance: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
