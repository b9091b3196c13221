//! Insulation layers interposed between two turns.

use geometry::prelude::{Orientation, Point};

use crate::turn::{cartesian_to_polar, TurnFootprint, WindingWindowShape};

/// One insulation layer between sections or windings, as positioned in the
/// winding window: `position.x` for layers stacked radially/along the
/// bobbin column (`Overlapping`), `position.y` for layers stacked angularly
/// around a toroid or along the winding-window's free axis (`Contiguous`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsulationLayer {
    /// This layer's position along the axis its orientation compares.
    pub position: Point,
    /// The layer's thickness, in metres.
    pub thickness: f64,
    /// The layer's material relative permittivity.
    pub relative_permittivity: f64,
}

/// Returns the insulation layers interposed between `first` and `second`,
/// per the winding window's section orientation and shape.
pub fn layers_between_two_turns<'a>(
    first: &TurnFootprint,
    second: &TurnFootprint,
    orientation: Orientation,
    shape: WindingWindowShape,
    layers: &'a [InsulationLayer],
) -> Vec<&'a InsulationLayer> {
    match orientation {
        Orientation::Overlapping => {
            let (x1, x2) = match shape {
                WindingWindowShape::Round => {
                    (cartesian_to_polar(first.coordinates).r, cartesian_to_polar(second.coordinates).r)
                }
                WindingWindowShape::Rectangular => (first.coordinates.x, second.coordinates.x),
            };
            layers.iter().filter(|layer| layer.position.x > x1.min(x2) && layer.position.x < x1.max(x2)).collect()
        }
        Orientation::Contiguous => match shape {
            WindingWindowShape::Round => {
                let y1 = cartesian_to_polar(first.coordinates).theta_degrees;
                let y2 = cartesian_to_polar(second.coordinates).theta_degrees;
                if y1 < 90.0 && y2 > 270.0 {
                    layers.iter().filter(|layer| layer.position.y > y2).collect()
                } else if y2 < 90.0 && y1 > 270.0 {
                    layers.iter().filter(|layer| layer.position.y > y1).collect()
                } else {
                    layers
                        .iter()
                        .filter(|layer| layer.position.y > y1.min(y2) && layer.position.y < y1.max(y2))
                        .collect()
                }
            }
            WindingWindowShape::Rectangular => {
                let (y1, y2) = (first.coordinates.y, second.coordinates.y);
                layers
                    .iter()
                    .filter(|layer| layer.position.y > y1.min(y2) && layer.position.y < y1.max(y2))
                    .collect()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use geometry::prelude::Dims;
    use om_core::geometry_model::WindingIndex;

    use super::*;

    fn turn_at(x: f64, y: f64) -> TurnFootprint {
        TurnFootprint {
            name: "t".into(),
            coordinates: Point::new(x, y),
            dims: Dims::new(0.001, 0.001),
            winding_index: WindingIndex(0),
            parallel_index: 0,
            length: 0.01,
        }
    }

    #[test]
    fn overlapping_rectangular_picks_layers_strictly_in_between() {
        let layers = vec![
            InsulationLayer { position: Point::new(0.005, 0.0), thickness: 0.0001, relative_permittivity: 3.0 },
            InsulationLayer { position: Point::new(0.02, 0.0), thickness: 0.0001, relative_permittivity: 3.0 },
        ];
        let first = turn_at(0.0, 0.0);
        let second = turn_at(0.01, 0.0);
        let between =
            layers_between_two_turns(&first, &second, Orientation::Overlapping, WindingWindowShape::Rectangular, &layers);
        assert_eq!(between.len(), 1);
    }

    #[test]
    fn contiguous_round_wraps_around_zero_degrees() {
        let layers = vec![InsulationLayer {
            position: Point::new(0.0, 350.0),
            thickness: 0.0001,
            relative_permittivity: 3.0,
        }];
        let first = cartesian_to_polar_turn(10.0, 20.0);
        let second = cartesian_to_polar_turn(10.0, 300.0);
        let between =
            layers_between_two_turns(&first, &second, Orientation::Contiguous, WindingWindowShape::Round, &layers);
        assert_eq!(between.len(), 1);
    }

    fn cartesian_to_polar_turn(r: f64, theta_degrees: f64) -> TurnFootprint {
        let polar = geometry::prelude::PolarPoint::new(r, theta_degrees);
        TurnFootprint {
            name: "t".into(),
            coordinates: polar.to_cartesian(),
            dims: Dims::new(0.001, 0.001),
            winding_index: WindingIndex(0),
            parallel_index: 0,
            length: 0.01,
        }
    }
}
