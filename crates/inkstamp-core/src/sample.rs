//! Input samples of a stroke gesture.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pressure used when a sample carries none.
pub const DEFAULT_PRESSURE: f64 = 1.0;
/// Tilt (radians) used when a sample carries none.
pub const DEFAULT_TILT: f64 = 0.0;

/// One (position, pressure, tilt) observation from an input gesture.
///
/// Pressure and tilt are optional; the defaults are applied when they are
/// read, so a sample never borrows values from its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Position in surface coordinates.
    pub position: Point,
    /// Normalized pen pressure.
    #[serde(default)]
    pub pressure: Option<f64>,
    /// Pen tilt in radians.
    #[serde(default)]
    pub tilt: Option<f64>,
}

impl Sample {
    /// Create a sample with only a position.
    pub fn new(position: Point) -> Self {
        Self {
            position,
            pressure: None,
            tilt: None,
        }
    }

    /// Create a sample from coordinates.
    pub fn at(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y))
    }

    /// Set the pressure.
    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }

    /// Set the tilt in radians.
    pub fn with_tilt(mut self, tilt: f64) -> Self {
        self.tilt = Some(tilt);
        self
    }

    /// Pressure, or [`DEFAULT_PRESSURE`] if absent.
    pub fn pressure(&self) -> f64 {
        self.pressure.unwrap_or(DEFAULT_PRESSURE)
    }

    /// Tilt, or [`DEFAULT_TILT`] if absent.
    pub fn tilt(&self) -> f64 {
        self.tilt.unwrap_or(DEFAULT_TILT)
    }

    /// Build samples from parallel arrays.
    ///
    /// `pressures` and `tilts` may be shorter than `points`; indices past
    /// their end produce samples without that field.
    pub fn from_parallel(points: &[Point], pressures: &[f64], tilts: &[f64]) -> Vec<Sample> {
        points
            .iter()
            .enumerate()
            .map(|(i, &position)| Sample {
                position,
                pressure: pressures.get(i).copied(),
                tilt: tilts.get(i).copied(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_on_read() {
        let sample = Sample::at(1.0, 2.0);
        assert_eq!(sample.pressure, None);
        assert_eq!(sample.tilt, None);
        assert!((sample.pressure() - 1.0).abs() < f64::EPSILON);
        assert!(sample.tilt().abs() < f64::EPSILON);
    }

    #[test]
    fn test_explicit_values() {
        let sample = Sample::at(0.0, 0.0).with_pressure(0.25).with_tilt(0.5);
        assert!((sample.pressure() - 0.25).abs() < f64::EPSILON);
        assert!((sample.tilt() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_parallel_short_arrays() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ];
        let samples = Sample::from_parallel(&points, &[0.5], &[0.1, 0.2]);

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].pressure, Some(0.5));
        // Missing entries are not interpolated from neighbours.
        assert_eq!(samples[1].pressure, None);
        assert!((samples[1].pressure() - 1.0).abs() < f64::EPSILON);
        assert_eq!(samples[1].tilt, Some(0.2));
        assert_eq!(samples[2].tilt, None);
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let sample: Sample = serde_json::from_str(r#"{"position":{"x":3.0,"y":4.0}}"#).unwrap();
        assert_eq!(sample.position, Point::new(3.0, 4.0));
        assert_eq!(sample.pressure, None);
    }
}
