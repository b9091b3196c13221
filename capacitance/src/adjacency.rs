//! Turn-to-turn adjacency search.

use om_core::settings::defaults::OVERLAPPING_FACTOR_SURROUNDING_TURNS;

use crate::turn::TurnFootprint;

/// Returns the indices into `turns` of every turn adjacent to `turns[current]`:
/// close enough to be a capacitive neighbour, and not shadowed by a third
/// turn sitting between them.
pub fn surrounding_turns(current: usize, turns: &[TurnFootprint]) -> Vec<usize> {
    let t0 = &turns[current];
    let (x1, y1) = (t0.coordinates.x, t0.coordinates.y);

    let mut surrounding = Vec::new();
    'candidate: for (index, candidate) in turns.iter().enumerate() {
        if index == current {
            continue;
        }
        let (x2, y2) = (candidate.coordinates.x, candidate.coordinates.y);
        if x1 == x2 && y1 == y2 {
            continue;
        }

        let distance = (x2 - x1).hypot(y2 - y1) - t0.max_dim() / 2.0 - candidate.max_dim() / 2.0;
        let threshold = t0.max_dim().min(candidate.max_dim()) / 2.0;
        if distance > threshold {
            continue;
        }

        let max_dim_pair = (candidate.max_dim() + t0.max_dim()) / 2.0;
        for blocker in turns {
            let (x0, y0) = (blocker.coordinates.x, blocker.coordinates.y);
            if (x0 == x1 && y0 == y1) || (x0 == x2 && y0 == y2) {
                continue;
            }

            let (dx0, dy0) = (blocker.dims.width, blocker.dims.height);
            let factor = OVERLAPPING_FACTOR_SURROUNDING_TURNS;
            if x0 + dx0 / 2.0 * factor < x1.min(x2) {
                continue;
            }
            if x0 - dx0 / 2.0 * factor > x1.max(x2) {
                continue;
            }
            if y0 + dy0 / 2.0 * factor < y1.min(y2) {
                continue;
            }
            if y0 - dy0 / 2.0 * factor > y1.max(y2) {
                continue;
            }

            let max_dim_blocker = blocker.max_dim();
            let distance_to_line =
                ((y2 - y1) * x0 - (x2 - x1) * y0 + x2 * y1 - y2 * x1).abs() / (y2 - y1).hypot(x2 - x1);
            if max_dim_pair / 2.0 + max_dim_blocker / 2.0 * factor > distance_to_line {
                continue 'candidate;
            }
        }

        surrounding.push(index);
    }
    surrounding
}

#[cfg(test)]
mod tests {
    use geometry::prelude::{Dims, Point};
    use om_core::geometry_model::WindingIndex;

    use super::*;

    fn turn(x: f64, y: f64) -> TurnFootprint {
        TurnFootprint {
            name: format!("turn ({x}, {y})"),
            coordinates: Point::new(x, y),
            dims: Dims::new(0.001, 0.001),
            winding_index: WindingIndex(0),
            parallel_index: 0,
            length: 0.01,
        }
    }

    #[test]
    fn adjacent_turn_is_found() {
        let turns = vec![turn(0.0, 0.0), turn(0.0011, 0.0)];
        assert_eq!(surrounding_turns(0, &turns), vec![1]);
    }

    #[test]
    fn distant_turn_is_rejected() {
        let turns = vec![turn(0.0, 0.0), turn(1.0, 0.0)];
        assert!(surrounding_turns(0, &turns).is_empty());
    }

    #[test]
    fn a_turn_blocked_by_a_third_is_not_surrounding() {
        let turns = vec![turn(0.0, 0.0), turn(0.0, 0.003), turn(0.0, 0.0015)];
        assert_eq!(surrounding_turns(0, &turns), vec![2]);
    }
}
