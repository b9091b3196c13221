//! Circles, used for round-wire turn cross-sections.

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// A circle, used as the cross-section of a round-wire turn.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Circle {
    /// The centre of the circle.
    center: Point,
    /// The radius of the circle.
    radius: f64,
}

impl Circle {
    /// Creates a circle from its centre and radius.
    pub const fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// The centre of the circle.
    pub const fn center(&self) -> Point {
        self.center
    }

    /// The radius of the circle.
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns `true` if this circle overlaps `other`: the round-wire branch
    /// of `check_collisions`, comparing centre-to-centre distance to the
    /// sum of the two radii with a `1e-8` tolerance.
    pub fn overlaps(&self, other: &Circle) -> bool {
        const TOLERANCE: f64 = 1e-8;
        self.center.distance(&other.center) < self.radius + other.radius - TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_circles_do_not_overlap() {
        let a = Circle::new(Point::new(0.0, 0.0), 1.0);
        let b = Circle::new(Point::new(2.0, 0.0), 1.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn concentric_circles_overlap() {
        let a = Circle::new(Point::new(0.0, 0.0), 1.0);
        let b = Circle::new(Point::new(0.5, 0.0), 1.0);
        assert!(a.overlaps(&b));
    }
}
