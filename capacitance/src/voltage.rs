//! Per-turn voltage divider.

use om_core::error::{Error, Result};
use om_core::geometry_model::WindingIndex;

use crate::turn::TurnFootprint;

/// One turn's position in its winding/parallel's voltage divider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnVoltageDivider {
    /// The divider value at this turn's start terminal, `(T_w − k)/T_w`.
    pub start: f64,
    /// The divider value at this turn's end terminal, `(T_w − k − 1)/T_w`.
    pub end: f64,
    /// This turn's RMS voltage, `voltage_rms_per_winding[w] · center`.
    pub voltage: f64,
}

/// Computes each turn's voltage-divider position and resulting RMS voltage,
/// given the RMS voltage applied to each winding (indexed by
/// [`WindingIndex`]) and each turn's 0-indexed position from its winding's
/// start terminal within its own parallel strand.
///
/// `turns` must be in the order each turn appears along its `(winding,
/// parallel)` strand; a turn's index within that strand is derived by
/// counting earlier turns sharing the same `winding_index`/`parallel_index`.
pub fn per_turn_voltages(turns: &[TurnFootprint], voltage_rms_per_winding: &[f64]) -> Result<Vec<TurnVoltageDivider>> {
    let mut next_index: std::collections::HashMap<(u16, u32), u32> = std::collections::HashMap::new();
    let mut number_turns: std::collections::HashMap<u16, u32> = std::collections::HashMap::new();
    for turn in turns {
        *number_turns.entry(turn.winding_index.0).or_insert(0) += 1;
    }

    let mut result = Vec::with_capacity(turns.len());
    for turn in turns {
        let WindingIndex(winding) = turn.winding_index;
        let total_turns = *number_turns.get(&winding).unwrap_or(&1) as f64;
        let k = *next_index.entry((winding, turn.parallel_index)).or_insert(0) as f64;
        *next_index.get_mut(&(winding, turn.parallel_index)).unwrap() += 1;

        let (start, end, center) = if total_turns > 1.0 {
            (
                (total_turns - k) / total_turns,
                (total_turns - k - 1.0) / total_turns,
                (total_turns - 1.0 - k) / (total_turns - 1.0),
            )
        } else {
            (1.0, 0.0, 0.5)
        };

        let voltage_rms = *voltage_rms_per_winding
            .get(winding as usize)
            .ok_or_else(|| Error::MissingData(format!("no voltage_rms entry for winding index {winding}")))?;
        let voltage = voltage_rms * center;
        if voltage.is_nan() || voltage.is_infinite() {
            return Err(Error::InvalidInput(format!("turn voltage is not finite: {voltage}")));
        }

        result.push(TurnVoltageDivider { start, end, voltage });
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use geometry::prelude::{Dims, Point};

    use super::*;

    fn turn(winding: u16, parallel: u32) -> TurnFootprint {
        TurnFootprint {
            name: "t".into(),
            coordinates: Point::zero(),
            dims: Dims::new(0.001, 0.001),
            winding_index: WindingIndex(winding),
            parallel_index: parallel,
            length: 0.01,
        }
    }

    #[test]
    fn single_turn_winding_centers_at_one_half() {
        let turns = vec![turn(0, 0)];
        let dividers = per_turn_voltages(&turns, &[10.0]).unwrap();
        assert_eq!(dividers[0].voltage, 5.0);
        assert_eq!(dividers[0].start, 1.0);
        assert_eq!(dividers[0].end, 0.0);
    }

    #[test]
    fn three_turn_winding_decreases_monotonically() {
        let turns = vec![turn(0, 0), turn(0, 0), turn(0, 0)];
        let dividers = per_turn_voltages(&turns, &[9.0]).unwrap();
        assert!(dividers[0].voltage > dividers[1].voltage);
        assert!(dividers[1].voltage > dividers[2].voltage);
        assert_eq!(dividers[0].voltage, 9.0);
        assert_eq!(dividers[2].voltage, 0.0);
    }

    #[test]
    fn missing_winding_voltage_is_reported() {
        let turns = vec![turn(3, 0)];
        assert!(per_turn_voltages(&turns, &[1.0]).is_err());
    }
}
