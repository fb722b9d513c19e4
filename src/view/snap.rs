//! Grid snapping.
//!
//! Moves snap to the start of the grid cell the pointer is in (floor), resize
//! edges snap to the nearest grid line (round), so a note can be stretched past
//! the pointer's cell.

use crate::error::{EditorError, Result};

/// A validated snap subdivision, in quarters. Always finite and > 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapUnit(f64);

impl SnapUnit {
    /// # Errors
    ///
    /// [`EditorError::Configuration`] if `quarters` is not a positive finite
    /// number.
    pub fn new(quarters: f64) -> Result<Self> {
        if quarters.is_finite() && quarters > 0.0 {
            Ok(Self(quarters))
        } else {
            Err(EditorError::Configuration(format!(
                "snap unit must be > 0 quarters, got {quarters}"
            )))
        }
    }

    pub fn quarters(self) -> f64 {
        self.0
    }

    /// Start of the grid cell containing `quarter`.
    pub fn floor(self, quarter: f64) -> f64 {
        (quarter / self.0).floor() * self.0
    }

    /// Nearest grid line to `quarter`.
    pub fn round(self, quarter: f64) -> f64 {
        (quarter / self.0).round() * self.0
    }

    /// End of the grid cell containing `quarter`.
    pub fn ceil(self, quarter: f64) -> f64 {
        (quarter / self.0).ceil() * self.0
    }
}

/// Floors `quarter` to the grid of `unit` quarters.
pub fn snap_quarter(quarter: f64, unit: f64) -> Result<f64> {
    Ok(SnapUnit::new(unit)?.floor(quarter))
}

/// Rounds `quarter` to the nearest line of the grid of `unit` quarters.
pub fn snap_quarter_round(quarter: f64, unit: f64) -> Result<f64> {
    Ok(SnapUnit::new(unit)?.round(quarter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_snaps_to_cell_start() {
        assert_eq!(snap_quarter(2.5, 0.25).unwrap(), 2.5);
        assert_eq!(snap_quarter(2.6, 0.25).unwrap(), 2.5);
        assert_eq!(snap_quarter(2.74, 0.25).unwrap(), 2.5);
        assert_eq!(snap_quarter(-0.1, 0.25).unwrap(), -0.25);
    }

    #[test]
    fn test_round_snaps_to_nearest() {
        assert_eq!(snap_quarter_round(2.6, 0.25).unwrap(), 2.5);
        assert_eq!(snap_quarter_round(2.7, 0.25).unwrap(), 2.75);
        assert_eq!(snap_quarter_round(0.9, 1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_ceil() {
        let unit = SnapUnit::new(0.5).unwrap();
        assert_eq!(unit.ceil(1.1), 1.5);
        assert_eq!(unit.ceil(1.5), 1.5);
    }

    #[test]
    fn test_zero_unit_is_configuration_error() {
        assert!(matches!(
            snap_quarter(1.0, 0.0),
            Err(EditorError::Configuration(_))
        ));
        assert!(snap_quarter_round(1.0, -0.25).is_err());
        assert!(SnapUnit::new(f64::NAN).is_err());
    }
}
