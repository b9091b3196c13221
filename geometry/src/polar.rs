//! Polar coordinates and the cartesian/polar/chord conversions used to lay
//! out turns around a toroidal core window.

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// A point in polar coordinates, relative to a toroid's centre.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PolarPoint {
    /// Radial distance from the centre.
    pub r: f64,
    /// Angle in degrees, measured counter-clockwise from the positive x-axis.
    pub theta_degrees: f64,
}

impl PolarPoint {
    /// Creates a new [`PolarPoint`].
    pub const fn new(r: f64, theta_degrees: f64) -> Self {
        Self { r, theta_degrees }
    }

    /// Converts to cartesian coordinates: `(r·cosθ, r·sinθ)`.
    pub fn to_cartesian(&self) -> Point {
        let theta = self.theta_degrees.to_radians();
        Point::new(self.r * theta.cos(), self.r * theta.sin())
    }
}

/// Converts a wound straight-line distance `d` between two points on a
/// circle of radius `r` into the subtended angle, in degrees, using the
/// chord formula `angle = 2·asin(d / (2r))·180/π`.
///
/// Returns `360.0` when the distance spans (or exceeds) the full diameter
/// of the circle, i.e. when `asin` would otherwise be evaluated outside its
/// domain and produce `NaN`.
pub fn wound_distance_to_angle_degrees(distance: f64, radius: f64) -> f64 {
    let ratio = distance / (2.0 * radius);
    if !(-1.0..=1.0).contains(&ratio) {
        return 360.0;
    }
    2.0 * ratio.asin().to_degrees()
}

/// The inverse of [`wound_distance_to_angle_degrees`]: the chord length of
/// an arc of `angle` degrees on a circle of radius `r`,
/// `d = 2·sin(angle·π/360)·r`.
pub fn angle_degrees_to_wound_distance(angle_degrees: f64, radius: f64) -> f64 {
    2.0 * (angle_degrees.to_radians() / 2.0).sin() * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cartesian_round_trip() {
        let p = PolarPoint::new(2.0, 90.0);
        let c = p.to_cartesian();
        assert_relative_eq!(c.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(c.y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn chord_round_trips_through_angle() {
        let radius = 0.05;
        let angle = 37.0;
        let d = angle_degrees_to_wound_distance(angle, radius);
        let back = wound_distance_to_angle_degrees(d, radius);
        assert_relative_eq!(back, angle, epsilon = 1e-6);
    }

    #[test]
    fn diameter_spanning_distance_saturates_to_360() {
        let radius = 0.01;
        assert_eq!(wound_distance_to_angle_degrees(3.0 * radius, radius), 360.0);
    }
}
