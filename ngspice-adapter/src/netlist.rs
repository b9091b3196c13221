//! SPICE netlist generation: one PWM pulse source, an ideal
//! voltage-controlled switch, an ideal diode, either an ideal coupled-
//! inductor pair or a subcircuit exported from a wound [`Magnetic`], output
//! capacitors with per-output initial conditions, resistive loads, and a
//! `.tran` analysis sized from the requested steady/extract period counts.

use std::fmt::Write as _;

use om_core::geometry_model::WindingIndex;
use om_core::magnetic::Magnetic;
use om_core::topology::Topology;
use rust_decimal::prelude::*;

use crate::error::{Error, Result};

/// Renders a seconds value as a `.tran`-literal-safe decimal, avoiding the
/// binary-float rounding artefacts that scientific-notation `f64`
/// formatting can introduce into a textual netlist.
fn tran_literal(seconds: f64) -> String {
    Decimal::from_f64(seconds).map(|d| d.normalize().to_string()).unwrap_or_else(|| format!("{seconds:.9e}"))
}

/// One secondary (or, for non-isolated topologies, the sole output) the
/// netlist must reproduce.
#[derive(Debug, Clone, Copy)]
pub struct OutputSpec {
    /// Regulated output voltage, in volts.
    pub voltage: f64,
    /// Output load current, in amperes (sizes the load resistor).
    pub current: f64,
    /// This output's turns ratio `N_i` relative to the primary.
    pub turns_ratio: f64,
}

/// Everything needed to synthesise one netlist for one operating point:
/// the input-voltage corner, operating-point index, turns ratios,
/// magnetising inductance and an optional wound magnetic to export.
#[derive(Debug, Clone)]
pub struct NetlistRequest<'a> {
    /// The converter topology.
    pub topology: Topology,
    /// Which input-voltage corner this netlist represents (used only in
    /// the generated title comment).
    pub input_voltage_index: usize,
    /// Which topology-specific operating point this netlist represents.
    pub operating_point_index: usize,
    /// The input voltage for this corner, in volts.
    pub input_voltage: f64,
    /// The rectifier/switch diode forward drop, in volts.
    pub diode_voltage_drop: f64,
    /// The switch's duty cycle, `0 < D < 1`.
    pub duty_cycle: f64,
    /// Switching frequency, in Hz.
    pub frequency: f64,
    /// The outputs this netlist must regulate; empty for a single-winding
    /// (buck/boost) inductor.
    pub outputs: &'a [OutputSpec],
    /// Magnetising inductance, in henries.
    pub magnetizing_inductance: f64,
    /// A wound [`Magnetic`] to export as a subcircuit, when available;
    /// `None` falls back to an ideal coupled-inductor pair.
    pub magnetic: Option<&'a Magnetic>,
    /// Number of steady-state periods to run before the analysis window
    /// starts (`.tran` start time).
    pub number_steady_periods: u32,
    /// Number of periods to extract once steady state is reached.
    pub number_extract_periods: u32,
    /// Signals to save for readback, as raw ngspice save expressions
    /// (e.g. `"v(sw)"`, `"i(vprimary)"`); the netlist emits a `.save` for
    /// each plus a `wrdata` command writing them to `output.data`.
    pub save_signals: &'a [String],
}

/// Builds a complete SPICE deck for `request`, ready to hand to an
/// [`crate::runner::NgspiceRunner`].
pub fn build_netlist(request: &NetlistRequest<'_>) -> Result<String> {
    let mut deck = String::new();
    writeln!(
        deck,
        "* OpenMagnetics generated netlist ({:?}, input corner {}, op point {})",
        request.topology, request.input_voltage_index, request.operating_point_index
    )
    .ok();
    writeln!(deck, "* This is a generated file. Do not edit by hand.").ok();
    writeln!(deck, ".options filetype=ascii").ok();
    writeln!(deck).ok();

    let period = 1.0 / request.frequency;

    writeln!(deck, "Vin in 0 DC {:.9}", request.input_voltage).ok();
    writeln!(
        deck,
        "Vpwm ctrl 0 PULSE(0 5 0 1n 1n {} {})",
        tran_literal(request.duty_cycle * period),
        tran_literal(period)
    )
    .ok();
    writeln!(deck, ".model swmod SW(Ron=1m Roff=1Meg Vt=2.5 Vh=0.1)").ok();
    writeln!(deck, ".model dmod D(Is=1e-14 Rs=10m N=1.05 Vj={:.4})", request.diode_voltage_drop).ok();

    match request.topology {
        Topology::Buck | Topology::Boost => {
            write_non_isolated(&mut deck, request)?;
        }
        Topology::Flyback | Topology::IsolatedBuckBoost => {
            write_isolated(&mut deck, request)?;
        }
    }

    writeln!(deck).ok();
    writeln!(deck, ".control").ok();
    writeln!(deck, "run").ok();
    let saves = request.save_signals.join(" ");
    writeln!(deck, "wrdata output.data {saves}").ok();
    writeln!(deck, ".endc").ok();

    let step = period / 200.0;
    let stop = (request.number_steady_periods + request.number_extract_periods) as f64 * period;
    let start = request.number_steady_periods as f64 * period;
    writeln!(deck, ".tran {} {} {}", tran_literal(step), tran_literal(stop), tran_literal(start)).ok();
    writeln!(deck, ".end").ok();
    Ok(deck)
}

fn write_non_isolated(deck: &mut String, request: &NetlistRequest<'_>) -> Result<()> {
    let output = request
        .outputs
        .first()
        .ok_or_else(|| Error::RunFailed("buck/boost netlist needs exactly one output".into()))?;

    match request.topology {
        Topology::Buck => {
            writeln!(deck, "Sswitch in sw ctrl 0 swmod").ok();
            writeln!(deck, "Dfreewheel 0 sw dmod").ok();
            writeln!(deck, "Lind sw out {:.9e}", request.magnetizing_inductance).ok();
        }
        Topology::Boost => {
            writeln!(deck, "Lind in sw {:.9e}", request.magnetizing_inductance).ok();
            writeln!(deck, "Sswitch sw 0 ctrl 0 swmod").ok();
            writeln!(deck, "Dboost sw out dmod").ok();
        }
        _ => unreachable!(),
    }
    writeln!(deck, "Cout out 0 1u IC={:.6}", output.voltage).ok();
    let load = if output.current > 0.0 { output.voltage / output.current } else { 1e6 };
    writeln!(deck, "Rload out 0 {:.6}", load).ok();
    writeln!(deck, "Vmonprimary out sw 0").ok();
    Ok(())
}

fn write_isolated(deck: &mut String, request: &NetlistRequest<'_>) -> Result<()> {
    writeln!(deck, "Sswitch in pri ctrl 0 swmod").ok();
    writeln!(deck, "Vmonprimary in pri 0").ok();

    if let Some(magnetic) = request.magnetic {
        write_magnetic_subckt(deck, magnetic)?;
        writeln!(deck, "Xcoil pri 0 {} magnetic_coil", secondary_node_list(request.outputs.len())).ok();
    } else {
        writeln!(deck, "Lpri pri 0 {:.9e}", request.magnetizing_inductance).ok();
        for (index, output) in request.outputs.iter().enumerate() {
            let l_sec = request.magnetizing_inductance / (output.turns_ratio * output.turns_ratio).max(1e-12);
            writeln!(deck, "Lsec{index} sec{index} 0 {l_sec:.9e}").ok();
            writeln!(deck, "Kcouple{index} Lpri Lsec{index} 1").ok();
        }
    }

    for (index, output) in request.outputs.iter().enumerate() {
        writeln!(deck, "Dsec{index} sec{index} rect{index} dmod").ok();
        writeln!(deck, "Cout{index} rect{index} 0 1u IC={:.6}", output.voltage).ok();
        let load = if output.current > 0.0 { output.voltage / output.current } else { 1e6 };
        writeln!(deck, "Rload{index} rect{index} 0 {:.6}", load).ok();
        writeln!(deck, "Vmonsec{index} sec{index} rect{index} 0").ok();
    }
    Ok(())
}

fn secondary_node_list(number_outputs: usize) -> String {
    (0..number_outputs).map(|index| format!("sec{index}")).collect::<Vec<_>>().join(" ")
}

/// Exports a wound [`Magnetic`]'s windings as a `.subckt` with one ideal
/// per-winding coupled inductor and a series DC resistance derived from
/// each winding's wire and mean turn length.
fn write_magnetic_subckt(deck: &mut String, magnetic: &Magnetic) -> Result<()> {
    let ports = (0..magnetic.coil.number_of_windings())
        .map(|index| format!("p{index}a p{index}b"))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(deck, ".subckt magnetic_coil {ports}").ok();

    for (index, winding) in magnetic.coil.windings.iter().enumerate() {
        let inductance_scale = {
            let reference_turns = magnetic.coil.windings[0].number_turns.max(1) as f64;
            let ratio = winding.number_turns as f64 / reference_turns;
            ratio * ratio
        };
        let dc_resistance = winding_dc_resistance(magnetic, WindingIndex(index as u16));
        writeln!(deck, "Lw{index} p{index}a n{index} {:.9e}", inductance_scale * 1e-3).ok();
        writeln!(deck, "Rw{index} n{index} p{index}b {:.9e}", dc_resistance.max(1e-6)).ok();
    }
    for index in 1..magnetic.coil.number_of_windings() {
        writeln!(deck, "Kw0w{index} Lw0 Lw{index} 0.98").ok();
    }
    writeln!(deck, ".ends magnetic_coil").ok();
    Ok(())
}

fn winding_dc_resistance(magnetic: &Magnetic, index: WindingIndex) -> f64 {
    const COPPER_RESISTIVITY: f64 = 1.68e-8;
    let Some(winding) = magnetic.coil.winding(index) else { return 1e-3 };
    let Some(mean_length) = magnetic.coil.mean_turn_length(index) else { return 1e-3 };
    let area = winding.wire.conducting_area();
    if area <= 0.0 {
        return 1e-3;
    }
    let total_length = mean_length * winding.number_turns as f64;
    COPPER_RESISTIVITY * total_length / (area * winding.number_parallels.max(1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buck_netlist_contains_switch_and_tran() {
        let outputs = [OutputSpec { voltage: 12.0, current: 3.0, turns_ratio: 1.0 }];
        let request = NetlistRequest {
            topology: Topology::Buck,
            input_voltage_index: 0,
            operating_point_index: 0,
            input_voltage: 20.0,
            diode_voltage_drop: 0.7,
            duty_cycle: 0.65,
            frequency: 100_000.0,
            outputs: &outputs,
            magnetizing_inductance: 50e-6,
            magnetic: None,
            number_steady_periods: 50,
            number_extract_periods: 2,
            save_signals: &["v(out)".to_string(), "i(vmonprimary)".to_string()],
        };
        let deck = build_netlist(&request).unwrap();
        assert!(deck.contains("Sswitch"));
        assert!(deck.contains(".tran"));
        assert!(deck.contains("wrdata output.data v(out) i(vmonprimary)"));
    }

    #[test]
    fn isolated_netlist_without_magnetic_uses_coupled_inductors() {
        let outputs = [
            OutputSpec { voltage: 12.0, current: 3.0, turns_ratio: 0.5 },
            OutputSpec { voltage: 5.0, current: 1.0, turns_ratio: 0.2 },
        ];
        let request = NetlistRequest {
            topology: Topology::Flyback,
            input_voltage_index: 0,
            operating_point_index: 0,
            input_voltage: 110.0,
            diode_voltage_drop: 0.7,
            duty_cycle: 0.4,
            frequency: 100_000.0,
            outputs: &outputs,
            magnetizing_inductance: 300e-6,
            magnetic: None,
            number_steady_periods: 50,
            number_extract_periods: 2,
            save_signals: &["v(rect0)".to_string(), "v(rect1)".to_string()],
        };
        let deck = build_netlist(&request).unwrap();
        assert!(deck.contains("Kcouple0"));
        assert!(deck.contains("Kcouple1"));
        assert!(deck.contains("Lsec1"));
    }
}
