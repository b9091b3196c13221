//! A turn's footprint, as seen by the stray-capacitance engine.

use geometry::prelude::{Dims, Point, PolarPoint};
use om_core::geometry_model::WindingIndex;

/// The shape of the winding window a coil is wound in, needed to decide
/// whether turn coordinates are read directly or converted to polar first.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WindingWindowShape {
    /// A concentric bobbin: cartesian coordinates are used directly.
    Rectangular,
    /// A toroid: coordinates are converted to polar before comparison.
    Round,
}

/// One turn's centre and bounding dimensions, plus which winding it belongs
/// to and the mean wire length it consumes.
///
/// A caller derives one of these per turn from the wound
/// [`om_core::geometry_model::CoilGeometry`] and the wire its winding uses,
/// since the geometry tree's own [`om_core::geometry_model::Turn`] does not
/// carry a footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnFootprint {
    /// A human-readable name, matching the owning
    /// [`om_core::geometry_model::Turn::name`].
    pub name: String,
    /// The turn's centre position within the winding window.
    pub coordinates: Point,
    /// The turn's bounding width/height.
    pub dims: Dims,
    /// Which winding this turn belongs to.
    pub winding_index: WindingIndex,
    /// Which parallel strand of its winding this turn belongs to.
    pub parallel_index: u32,
    /// The length of wire consumed by this turn, in metres.
    pub length: f64,
}

impl TurnFootprint {
    /// The larger of this turn's width/height.
    pub fn max_dim(&self) -> f64 {
        self.dims.width.max(self.dims.height)
    }

    /// This turn's centre, converted to polar coordinates about the
    /// winding window's origin, for toroidal cores.
    pub fn polar_coordinates(&self) -> PolarPoint {
        cartesian_to_polar(self.coordinates)
    }
}

/// Converts a cartesian point to polar coordinates about the origin, with
/// the angle normalised to `[0, 360)` degrees.
pub fn cartesian_to_polar(point: Point) -> PolarPoint {
    let r = point.distance(&Point::zero());
    let mut theta = point.y.atan2(point.x).to_degrees();
    if theta < 0.0 {
        theta += 360.0;
    }
    PolarPoint::new(r, theta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cartesian_to_polar_normalises_negative_angles() {
        let polar = cartesian_to_polar(Point::new(0.0, -1.0));
        assert!((polar.theta_degrees - 270.0).abs() < 1e-9);
    }

    #[test]
    fn max_dim_picks_the_larger_axis() {
        let footprint = TurnFootprint {
            name: "t".into(),
            coordinates: Point::zero(),
            dims: Dims::new(0.001, 0.002),
            winding_index: WindingIndex(0),
            parallel_index: 0,
            length: 0.01,
        };
        assert_eq!(footprint.max_dim(), 0.002);
    }
}
