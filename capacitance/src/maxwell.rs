//! The Maxwell capacitance matrix across all windings.
//!
//! Keying this matrix by string winding names (`"1"`, `"2"`, `"3"`) is a
//! serialisation artefact, so here it is a dense matrix indexed by
//! [`WindingIndex`].

use om_core::error::{Error, Result};
use om_core::geometry_model::WindingIndex;

use crate::energy::InterWindingCapacitance;

/// A symmetric capacitance matrix evaluated at a single frequency (`0` Hz
/// for the static Maxwell matrix this crate produces).
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarMatrixAtFrequency {
    /// The analysis frequency, in Hz (`0` for the static result).
    pub frequency: f64,
    /// `magnitude[a][b]`, a `number_of_windings × number_of_windings` dense
    /// matrix.
    pub magnitude: Vec<Vec<f64>>,
}

impl ScalarMatrixAtFrequency {
    /// The matrix entry for winding pair `(a, b)`.
    pub fn get(&self, a: WindingIndex, b: WindingIndex) -> f64 {
        self.magnitude[a.0 as usize][b.0 as usize]
    }
}

/// Builds the Maxwell capacitance matrix from every winding pair's
/// converged inter-winding capacitance: off-diagonal `(a, b)` is `−C_ab`;
/// diagonal `(a, a)` is `Σ_b C_ab` over every other winding.
pub fn maxwell_capacitance_matrix(
    number_of_windings: usize,
    pairs: &[InterWindingCapacitance],
) -> Result<ScalarMatrixAtFrequency> {
    let mut magnitude = vec![vec![0.0; number_of_windings]; number_of_windings];

    for pair in pairs {
        let a = pair.winding_a.0 as usize;
        let b = pair.winding_b.0 as usize;
        if a >= number_of_windings || b >= number_of_windings {
            return Err(Error::InvalidInput(format!(
                "winding pair ({a}, {b}) is out of bounds for {number_of_windings} windings"
            )));
        }
        if a == b {
            continue;
        }
        magnitude[a][b] -= pair.capacitance;
        magnitude[b][a] -= pair.capacitance;
    }

    for a in 0..number_of_windings {
        let off_diagonal_sum: f64 = (0..number_of_windings).filter(|&b| b != a).map(|b| -magnitude[a][b]).sum();
        magnitude[a][a] = off_diagonal_sum;
    }

    Ok(ScalarMatrixAtFrequency { frequency: 0.0, magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::{SixCapacitorNetwork, TripoleCapacitance};

    fn pair(a: u16, b: u16, capacitance: f64) -> InterWindingCapacitance {
        InterWindingCapacitance {
            winding_a: WindingIndex(a),
            winding_b: WindingIndex(b),
            capacitance,
            six_capacitor: SixCapacitorNetwork { c1: 0.0, c2: 0.0, c3: 0.0, c4: 0.0, c5: 0.0, c6: 0.0 },
            tripole: TripoleCapacitance { c1: 0.0, c2: 0.0, c3: 0.0 },
            converged: true,
        }
    }

    #[test]
    fn matrix_is_symmetric_with_zero_row_sums() {
        let pairs = vec![pair(0, 0, 0.0), pair(0, 1, 2e-12), pair(0, 2, 1e-12), pair(1, 1, 0.0), pair(1, 2, 3e-12), pair(2, 2, 0.0)];
        let matrix = maxwell_capacitance_matrix(3, &pairs).unwrap();

        for a in 0..3 {
            for b in 0..3 {
                assert_eq!(matrix.magnitude[a][b], matrix.magnitude[b][a]);
            }
        }
        for a in 0..3 {
            let row_sum: f64 = matrix.magnitude[a].iter().sum();
            assert!(row_sum.abs() < 1e-12 * matrix.magnitude.iter().flatten().cloned().fold(0.0_f64, |m, v| m.max(v.abs())).max(1.0));
        }
    }

    #[test]
    fn out_of_range_pair_is_an_error() {
        let pairs = vec![pair(0, 5, 1e-12)];
        assert!(maxwell_capacitance_matrix(2, &pairs).is_err());
    }
}
