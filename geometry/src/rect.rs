//! Axis-aligned rectangles.

use serde::{Deserialize, Serialize};

use crate::dims::Dims;
use crate::point::Point;

/// An axis-aligned rectangle, specified by its centre and its dimensions.
///
/// Rectangular sections, layers and turns are all represented with this
/// type; the centre convention (rather than lower-left/upper-right corners)
/// matches the way the bobbin winding window is laid out from its own
/// centreline outward in both directions.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    /// The centre of the rectangle.
    center: Point,
    /// The full width/height of the rectangle.
    dims: Dims,
}

impl Rect {
    /// Creates a rectangle from its centre and its dimensions.
    pub const fn from_dims(center: Point, dims: Dims) -> Self {
        Self { center, dims }
    }

    /// The centre point of the rectangle.
    pub const fn center(&self) -> Point {
        self.center
    }

    /// The full width of the rectangle.
    pub const fn width(&self) -> f64 {
        self.dims.width
    }

    /// The full height of the rectangle.
    pub const fn height(&self) -> f64 {
        self.dims.height
    }

    /// The dimensions of the rectangle.
    pub const fn dims(&self) -> Dims {
        self.dims
    }

    /// The left edge coordinate.
    pub fn left(&self) -> f64 {
        self.center.x - self.dims.width / 2.0
    }

    /// The right edge coordinate.
    pub fn right(&self) -> f64 {
        self.center.x + self.dims.width / 2.0
    }

    /// The bottom edge coordinate.
    pub fn bottom(&self) -> f64 {
        self.center.y - self.dims.height / 2.0
    }

    /// The top edge coordinate.
    pub fn top(&self) -> f64 {
        self.center.y + self.dims.height / 2.0
    }

    /// Returns `true` if this rectangle overlaps `other`, using per-axis
    /// half-extent comparison (the rectangular branch of `check_collisions`
    /// in the winding algorithm): two rectangles collide iff the distance
    /// between their centres along an axis is less than the sum of their
    /// half-extents along that axis, for *both* axes, beyond a tolerance of
    /// `1e-8` used to absorb floating-point placement error.
    pub fn overlaps(&self, other: &Rect) -> bool {
        const TOLERANCE: f64 = 1e-8;
        let dx = (self.center.x - other.center.x).abs();
        let dy = (self.center.y - other.center.y).abs();
        let half_w = (self.dims.width + other.dims.width) / 2.0;
        let half_h = (self.dims.height + other.dims.height) / 2.0;
        dx < half_w - TOLERANCE && dy < half_h - TOLERANCE
    }

    /// Returns a rectangle translated by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            center: self.center.translate(dx, dy),
            dims: self.dims,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_rects_do_not_overlap() {
        let a = Rect::from_dims(Point::new(0.0, 0.0), Dims::new(1.0, 1.0));
        let b = Rect::from_dims(Point::new(2.0, 0.0), Dims::new(1.0, 1.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::from_dims(Point::new(0.0, 0.0), Dims::new(1.0, 1.0));
        let b = Rect::from_dims(Point::new(1.0, 0.0), Dims::new(1.0, 1.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn overlapping_rects_collide() {
        let a = Rect::from_dims(Point::new(0.0, 0.0), Dims::new(1.0, 1.0));
        let b = Rect::from_dims(Point::new(0.5, 0.0), Dims::new(1.0, 1.0));
        assert!(a.overlaps(&b));
    }
}
