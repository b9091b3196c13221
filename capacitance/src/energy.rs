//! Static capacitance among all adjacent turn pairs, and the inter-winding
//! energy fixed point that derives a scalar capacitance, a six-capacitor
//! decomposition and a tripole reduction for every winding pair.

use std::collections::HashMap;

use geometry::prelude::Orientation;
use om_core::error::Result;
use om_core::geometry_model::WindingIndex;
use om_core::wire::Wire;

use crate::adjacency::surrounding_turns;
use crate::insulation::InsulationLayer;
use crate::model::{calculate_static_capacitance_between_two_turns, RoundWireModel};
use crate::turn::{TurnFootprint, WindingWindowShape};
use crate::voltage::per_turn_voltages;

/// The hard iteration cap on the inter-winding energy fixed point, replacing the source's NaN-terminated `while` loop.
const MAX_ITERATIONS: u32 = 50;
/// Relative convergence threshold on `|V₃ − V₃'|`.
const CONVERGENCE_THRESHOLD: f64 = 1e-3;

/// Returns every adjacent turn pair's static capacitance, keyed by
/// `(min_index, max_index)` into `turns` so lookups are direction-agnostic.
pub fn capacitance_among_turns(
    turns: &[TurnFootprint],
    wire_per_winding: &[Wire],
    model: RoundWireModel,
    orientation: Orientation,
    shape: WindingWindowShape,
    insulation_layers: &[InsulationLayer],
    pcb_relative_permittivity: f64,
) -> Result<HashMap<(usize, usize), f64>> {
    let mut capacitances = HashMap::new();
    for (index, turn) in turns.iter().enumerate() {
        let wire = &wire_per_winding[turn.winding_index.0 as usize];
        for surrounding in surrounding_turns(index, turns) {
            let key = (index.min(surrounding), index.max(surrounding));
            if capacitances.contains_key(&key) {
                continue;
            }
            let other = &turns[surrounding];
            let other_wire = &wire_per_winding[other.winding_index.0 as usize];
            let capacitance = calculate_static_capacitance_between_two_turns(
                turn,
                wire,
                other,
                other_wire,
                model,
                orientation,
                shape,
                insulation_layers,
                pcb_relative_permittivity,
            )?;
            capacitances.insert(key, capacitance);
        }
    }
    Ok(capacitances)
}

/// Each winding's RMS voltage used to derive per-turn voltages for the
/// inter-winding energy pass: `10 / (N_primary / N_w)`, an
/// arbitrary-but-consistent 10 V reference.
pub fn reference_voltage_rms_per_winding(number_turns_per_winding: &[u32]) -> Vec<f64> {
    let primary = *number_turns_per_winding.first().unwrap_or(&1) as f64;
    number_turns_per_winding
        .iter()
        .map(|&turns| {
            let turns_ratio = primary / (turns.max(1) as f64);
            10.0 / turns_ratio
        })
        .collect()
}

/// The six-capacitor model between two windings: γ1…γ6 as
/// derived from the inter-winding energy and voltage drop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SixCapacitorNetwork {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub c4: f64,
    pub c5: f64,
    pub c6: f64,
}

/// The three-capacitor ("tripole") reduction of a [`SixCapacitorNetwork`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripoleCapacitance {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
}

fn gamma_decomposition(
    energy: f64,
    voltage_drop: f64,
    relative_turns_ratio: f64,
) -> ([[f64; 3]; 3], SixCapacitorNetwork, TripoleCapacitance) {
    let c0 = energy * 2.0 / (voltage_drop * voltage_drop);
    let gamma1 = -c0 / 6.0;
    let gamma2 = -c0 / 6.0;
    let gamma3 = c0 / 3.0;
    let gamma4 = c0 / 3.0;
    let gamma5 = c0 / 6.0;
    let gamma6 = c0 / 6.0;

    let mut matrix = [[0.0; 3]; 3];
    matrix[0][0] = gamma1 + relative_turns_ratio * (gamma4 + gamma5);
    matrix[0][1] = -2.0 * gamma4;
    matrix[1][0] = matrix[0][1];
    matrix[0][2] = 2.0 * relative_turns_ratio * gamma5;
    matrix[2][0] = matrix[0][2];
    matrix[1][1] = gamma2 + gamma4 + gamma6;
    matrix[1][2] = 2.0 * gamma6;
    matrix[2][1] = matrix[1][2];
    matrix[2][2] = gamma3 + gamma5 + gamma6;

    let six_capacitor = SixCapacitorNetwork { c1: gamma1, c2: gamma2, c3: gamma3, c4: gamma4, c5: gamma5, c6: gamma6 };
    let tripole =
        TripoleCapacitance { c1: gamma1 + relative_turns_ratio * gamma2, c2: gamma5 + gamma6, c3: gamma3 };
    (matrix, six_capacitor, tripole)
}

/// The converged capacitance between one winding pair, plus its six-
/// capacitor and tripole decompositions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterWindingCapacitance {
    pub winding_a: WindingIndex,
    pub winding_b: WindingIndex,
    pub capacitance: f64,
    pub six_capacitor: SixCapacitorNetwork,
    pub tripole: TripoleCapacitance,
    /// `false` when the fixed point hit [`MAX_ITERATIONS`] without
    /// converging; `capacitance`
    /// still holds the last iterate's value.
    pub converged: bool,
}

/// Runs the inter-winding energy fixed point for every unordered winding
/// pair `(a, b)` with `a ≤ b`, including self-pairs (`a == b`), using a
/// shared reference voltage per winding (see
/// [`reference_voltage_rms_per_winding`]).
pub fn capacitance_among_windings(
    turns: &[TurnFootprint],
    capacitance_among_turns: &HashMap<(usize, usize), f64>,
    number_of_windings: usize,
    number_turns_per_winding: &[u32],
) -> Result<Vec<InterWindingCapacitance>> {
    let voltage_rms_per_winding = reference_voltage_rms_per_winding(number_turns_per_winding);
    let turn_voltages = per_turn_voltages(turns, &voltage_rms_per_winding)?;

    let turns_by_winding: Vec<Vec<usize>> = (0..number_of_windings)
        .map(|winding| {
            turns
                .iter()
                .enumerate()
                .filter(|(_, turn)| turn.winding_index.0 as usize == winding)
                .map(|(index, _)| index)
                .collect()
        })
        .collect();

    let mut results = Vec::new();
    for a in 0..number_of_windings {
        for b in a..number_of_windings {
            let indices_a = &turns_by_winding[a];
            let indices_b = &turns_by_winding[b];
            let relative_turns_ratio =
                number_turns_per_winding[a] as f64 / (number_turns_per_winding[b].max(1) as f64);

            let voltages_a: Vec<f64> = indices_a.iter().map(|&i| turn_voltages[i].voltage).collect();
            let voltages_b: Vec<f64> = indices_b
                .iter()
                .map(|&j| if a == b { turn_voltages[j].voltage } else { -turn_voltages[j].voltage })
                .collect();
            let max_voltage_a = voltages_a.iter().cloned().fold(f64::MIN, f64::max);
            let min_voltage_b = voltages_b.iter().cloned().fold(f64::MAX, f64::min);

            let mut v3 = 0.0_f64;
            let mut converged = true;
            let mut capacitance = 0.0;
            let mut six_capacitor = SixCapacitorNetwork { c1: 0.0, c2: 0.0, c3: 0.0, c4: 0.0, c5: 0.0, c6: 0.0 };
            let mut tripole = TripoleCapacitance { c1: 0.0, c2: 0.0, c3: 0.0 };
            let mut not_adjacent = true;

            for iteration in 0..MAX_ITERATIONS {
                let mut energy = 0.0;
                not_adjacent = true;
                for (&i, &voltage_i) in indices_a.iter().zip(&voltages_a) {
                    for (&j, &voltage_j) in indices_b.iter().zip(&voltages_b) {
                        let key = (i.min(j), i.max(j));
                        if let Some(&c_ij) = capacitance_among_turns.get(&key) {
                            not_adjacent = false;
                            let voltage_drop_among_turns = v3 + voltage_i - voltage_j;
                            energy += 0.5 * c_ij * voltage_drop_among_turns * voltage_drop_among_turns;
                        }
                    }
                }
                if not_adjacent {
                    break;
                }

                let voltage_drop = max_voltage_a - min_voltage_b + v3;
                let (matrix, six, tri) = gamma_decomposition(energy, voltage_drop, relative_turns_ratio);
                let v3_calculated = if a == b {
                    0.0
                } else {
                    (-(matrix[0][2] * max_voltage_a + matrix[1][2] * min_voltage_b.abs()) / matrix[2][2]).abs()
                };
                capacitance = energy * 2.0 / (voltage_drop * voltage_drop);
                six_capacitor = six;
                tripole = tri;

                if (v3 - v3_calculated).abs() / v3.abs().max(1e-9) < CONVERGENCE_THRESHOLD {
                    v3 = v3_calculated;
                    break;
                }
                v3 = v3_calculated;
                if iteration == MAX_ITERATIONS - 1 {
                    converged = false;
                }
            }
            if not_adjacent {
                capacitance = 0.0;
                converged = true;
            }

            results.push(InterWindingCapacitance {
                winding_a: WindingIndex(a as u16),
                winding_b: WindingIndex(b as u16),
                capacitance,
                six_capacitor,
                tripole,
                converged,
            });
        }
    }
    Ok(results)
}
