//! Isolated flyback converter: CCM, DCM, boundary (BMO) and
//! quasi-resonant (QRM) mode operating-point synthesis.

use om_core::dim::DimWithTol;
use om_core::error::{Error, Result};
use om_core::insulation::InsulationType;
use om_core::requirements::{DesignRequirements, InsulationRequirement};
use om_core::topology::{IsolationSide, Topology};
use waveform::{AnalyticalParams, Conditions, OperatingPoint, OperatingPointExcitation, Waveform};

use crate::checks::TopologyChecks;
use crate::common::{active_corners, operating_point_name};
use crate::Converter;

/// The flyback operating mode a point is synthesised in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FlybackMode {
    /// Continuous conduction.
    Ccm,
    /// Discontinuous conduction.
    Dcm,
    /// Boundary conduction: switching frequency derived so the primary
    /// current always just reaches zero.
    Bmo,
    /// Quasi-resonant: switching frequency derived from the drain-source
    /// ringing period (Biela-Kolar closed form).
    Qrm,
}

/// One requested flyback operating point: one entry per secondary.
#[derive(Debug, Clone, PartialEq)]
pub struct FlybackOperatingPointSpec {
    /// Each secondary's regulated output voltage, in volts.
    pub output_voltages: Vec<f64>,
    /// Each secondary's output load current, in amperes.
    pub output_currents: Vec<f64>,
    /// Switching frequency, in Hz. Required unless `mode` is `Bmo` or
    /// `Qrm`, in which case it is derived.
    pub frequency: Option<f64>,
    /// The conduction mode, if forced. `None` resolves from `ripple_ratio`.
    pub mode: Option<FlybackMode>,
    /// Inductor current ripple ratio, used for CCM/DCM mode resolution and
    /// inductance sizing.
    pub ripple_ratio: f64,
    /// Ambient temperature, in degrees Celsius.
    pub ambient_temperature: f64,
}

/// A flyback converter's design request.
#[derive(Debug, Clone, PartialEq)]
pub struct FlybackRequest {
    /// The input-voltage range.
    pub input_voltage: DimWithTol,
    /// Rectifier diode forward drop, in volts.
    pub diode_voltage_drop: f64,
    /// Power-stage efficiency, `0 < η ≤ 1`.
    pub efficiency: f64,
    /// Maximum primary duty cycle used to derive turns ratios, if bounded.
    pub max_duty_cycle: Option<f64>,
    /// Maximum drain-source voltage used to derive turns ratios, if
    /// bounded.
    pub max_drain_source_voltage: Option<f64>,
    /// Equivalent drain-source capacitance, used by the QRM frequency
    /// closed form. Defaults to 100 pF when unset.
    pub drain_source_capacitance: f64,
    /// The requested operating points.
    pub operating_points: Vec<FlybackOperatingPointSpec>,
}

impl TopologyChecks for FlybackRequest {
    fn number_of_operating_points(&self) -> usize {
        self.operating_points.len()
    }
    fn input_voltage(&self) -> &DimWithTol {
        &self.input_voltage
    }
    fn outputs_per_operating_point(&self) -> Vec<usize> {
        self.operating_points.iter().map(|point| point.output_voltages.len()).collect()
    }
}

/// Resolves the conduction mode for one point.
fn resolve_mode(point: &FlybackOperatingPointSpec) -> FlybackMode {
    point.mode.unwrap_or(if point.ripple_ratio < 1.0 { FlybackMode::Ccm } else { FlybackMode::Dcm })
}

/// Duty cycle at minimum input for secondary `i`: `D = N·V_out / (V_in + N·V_out)`.
fn duty_cycle_for(v_in: f64, n: f64, v_out: f64) -> f64 {
    n * v_out / (v_in + n * v_out)
}

/// The boundary-mode switching frequency: the maximum across secondaries
/// of `1 / (t_on + t_off)` for a primary current that just reaches zero
/// each cycle.
fn bmo_frequency(v_in: f64, l: f64, efficiency: f64, secondaries: &[(f64, f64, f64)]) -> f64 {
    secondaries
        .iter()
        .map(|&(n, v_out, i_out)| {
            let d = duty_cycle_for(v_in, n, v_out);
            let i_pk = 2.0 * i_out / (efficiency * (1.0 - d) * n);
            let t_on = i_pk * l / v_in;
            let t_off = i_pk * l / (n * v_out);
            1.0 / (t_on + t_off)
        })
        .fold(f64::MIN, f64::max)
}

/// The quasi-resonant switching frequency, from the Biela-Kolar closed
/// form: the primary switches on one drain-source ringing half-period
/// after the transformer fully demagnetises.
#[allow(clippy::too_many_arguments)]
fn qrm_frequency(
    l: f64,
    total_output_power: f64,
    reflected_voltage: f64,
    v_in: f64,
    n: f64,
    diode_voltage_drop: f64,
    efficiency: f64,
    drain_source_capacitance: f64,
) -> f64 {
    let dt = std::f64::consts::PI * (l * drain_source_capacitance).sqrt();
    let a = (reflected_voltage + diode_voltage_drop + v_in / n).powi(2);
    let b = efficiency * v_in.powi(2) * (reflected_voltage + diode_voltage_drop).powi(2);
    let c = reflected_voltage + diode_voltage_drop + v_in / n;
    let d = (total_output_power / (efficiency * l)).sqrt();
    let e = v_in * (reflected_voltage + diode_voltage_drop);
    let f = (4.0 * dt + 2.0 * l * total_output_power * a / b).sqrt();
    let g = (2f64.sqrt() * l * c * d) / e;
    4.0 / (f + g).powi(2)
}

/// Basso's maximum-inductance bound for DCM operation, and the
/// swap-and-inflate fallback recorded in `DESIGN.md`.
fn dcm_maximum_inductance(
    v_in_min: f64,
    efficiency: f64,
    total_output_power: f64,
    frequency: f64,
    a: f64,
) -> f64 {
    efficiency * v_in_min.powi(2) * a.powi(2)
        / (2.0 * total_output_power * frequency * (v_in_min + a) * (a + efficiency * v_in_min))
}

impl Converter for FlybackRequest {
    fn process_design_requirements(&self) -> Result<DesignRequirements> {
        self.run_checks(true)?;

        let v_in_min = self
            .input_voltage
            .minimum
            .or(self.input_voltage.nominal)
            .ok_or_else(|| Error::MissingData("flyback request needs a minimum or nominal input voltage".into()))?;
        let v_in_max = self
            .input_voltage
            .maximum
            .or(self.input_voltage.nominal)
            .ok_or_else(|| Error::MissingData("flyback request needs a maximum or nominal input voltage".into()))?;

        let number_of_secondaries = self.operating_points[0].output_voltages.len();
        let turns_ratios = self.derive_turns_ratios(v_in_max, number_of_secondaries)?;

        let mut l_needed: f64 = f64::MIN;
        let mut any_dcm = false;
        let mut l_max_candidate: Option<f64> = None;

        for point in &self.operating_points {
            let mode = resolve_mode(point);
            if matches!(mode, FlybackMode::Dcm) {
                any_dcm = true;
            }

            let n1 = turns_ratios.first().copied().unwrap_or(1.0);
            let v_out_1 = point.output_voltages[0];
            let total_output_power: f64 =
                point.output_voltages.iter().zip(&point.output_currents).map(|(v, i)| v * i).sum();
            let d = duty_cycle_for(v_in_min, n1, v_out_1);
            let i_primary_center = (total_output_power / v_out_1) / ((1.0 - d) * n1);
            l_needed = l_needed.max(v_in_min * d / (point.ripple_ratio * self.frequency_for(point, v_in_min, n1, v_out_1)? * i_primary_center));

            if any_dcm {
                let a = (v_out_1 + self.diode_voltage_drop) * n1;
                let f = self.frequency_for(point, v_in_min, n1, v_out_1)?;
                let candidate = dcm_maximum_inductance(v_in_min, self.efficiency, total_output_power, f, a);
                l_max_candidate = Some(l_max_candidate.map_or(candidate, |current: f64| current.min(candidate)));
            }
        }

        let magnetizing_inductance = if let Some(l_max) = l_max_candidate {
            if l_max < l_needed {
                DimWithTol::new(Some(l_needed), None, Some(1.2 * l_needed))?
            } else {
                DimWithTol::new(Some(l_needed), None, Some(l_max))?
            }
        } else {
            DimWithTol::from_nominal(l_needed)
        };

        let isolation_sides = std::iter::once(IsolationSide::PRIMARY)
            .chain((0..number_of_secondaries).map(|_| IsolationSide::SECONDARY))
            .collect();

        Ok(DesignRequirements {
            magnetizing_inductance,
            turns_ratios: turns_ratios.iter().map(|n| DimWithTol::from_nominal(*n)).collect(),
            isolation_sides,
            insulation: Some(InsulationRequirement {
                insulation_type: InsulationType::Reinforced,
                withstand_voltage: Some(v_in_max),
            }),
            topology: Topology::Flyback,
            leakage_inductance: None,
        })
    }

    fn process_operating_points(
        &self,
        turns_ratios: &[DimWithTol],
        magnetizing_inductance: &DimWithTol,
    ) -> Result<Vec<OperatingPoint>> {
        self.run_checks(true)?;
        let l = magnetizing_inductance.get_nominal();
        let ratios: Vec<f64> = turns_ratios.iter().map(DimWithTol::get_nominal).collect();
        let corners = active_corners(&self.input_voltage);

        let mut points = Vec::with_capacity(corners.len() * self.operating_points.len());
        for (corner, v_in) in corners {
            for (index, point) in self.operating_points.iter().enumerate() {
                let name = operating_point_name(corner, index, self.operating_points.len());
                let n1 = ratios.first().copied().unwrap_or(1.0);
                let v_out_1 = point.output_voltages[0];
                let mode = resolve_mode(point);
                let d = duty_cycle_for(v_in, n1, v_out_1);
                let total_output_power: f64 =
                    point.output_voltages.iter().zip(&point.output_currents).map(|(v, i)| v * i).sum();
                let frequency = self.frequency_for(point, v_in, n1, v_out_1)?;

                let i_center = (total_output_power / v_out_1) / ((1.0 - d) * n1);
                let ipp = v_in * d / (frequency * l);

                let secondary_reflected_drop: f64 = (0..point.output_voltages.len())
                    .map(|i| ratios[i] * (point.output_voltages[i] + self.diode_voltage_drop))
                    .fold(f64::MIN, f64::max);

                let excitations = match mode {
                    FlybackMode::Ccm => {
                        let i_off = (i_center - ipp / 2.0).max(0.0);
                        self.build_excitations(
                            point, v_in, &ratios, d, frequency, ipp, i_off, secondary_reflected_drop, false,
                        )
                    }
                    FlybackMode::Dcm | FlybackMode::Bmo | FlybackMode::Qrm => {
                        self.build_excitations(point, v_in, &ratios, d, frequency, ipp, 0.0, secondary_reflected_drop, true)
                    }
                };

                points.push(OperatingPoint::new(
                    name,
                    Conditions { ambient_temperature: point.ambient_temperature, cooling: None },
                    excitations,
                ));
            }
        }
        Ok(points)
    }
}

impl FlybackRequest {
    /// Resolves a point's switching frequency, deriving it from BMO/QRM
    /// formulas when the mode requires it.
    fn frequency_for(&self, point: &FlybackOperatingPointSpec, v_in: f64, n1: f64, v_out_1: f64) -> Result<f64> {
        match resolve_mode(point) {
            FlybackMode::Bmo => {
                let secondaries: Vec<_> = point
                    .output_voltages
                    .iter()
                    .zip(&point.output_currents)
                    .enumerate()
                    .map(|(i, (&v, &cur))| (self.turns_ratio_for_index(point, i), v, cur))
                    .collect();
                Ok(bmo_frequency(v_in, self.max_duty_cycle.unwrap_or(0.5), self.efficiency, &secondaries))
            }
            FlybackMode::Qrm => {
                let l = self.estimate_inductance_for_qrm(point, v_in, n1, v_out_1);
                let total_output_power: f64 =
                    point.output_voltages.iter().zip(&point.output_currents).map(|(v, i)| v * i).sum();
                Ok(qrm_frequency(
                    l,
                    total_output_power,
                    v_out_1,
                    v_in,
                    n1,
                    self.diode_voltage_drop,
                    self.efficiency,
                    self.drain_source_capacitance,
                ))
            }
            FlybackMode::Ccm | FlybackMode::Dcm => point
                .frequency
                .ok_or_else(|| Error::MissingData("flyback CCM/DCM operating point needs a frequency".into())),
        }
    }

    /// A rough turns ratio used only to seed [`bmo_frequency`]'s per-point
    /// loop before the final design-requirements turns ratio is known;
    /// uses the pure voltage ratio against the first secondary.
    fn turns_ratio_for_index(&self, point: &FlybackOperatingPointSpec, index: usize) -> f64 {
        if index == 0 {
            1.0
        } else {
            point.output_voltages[0] / point.output_voltages[index]
        }
    }

    /// A self-consistent inductance estimate used only to evaluate the QRM
    /// frequency formula before the final design-requirements inductance
    /// is known (the QRM frequency is itself an input to the final
    /// inductance derivation, so a one-pass estimate is used here, matching
    /// the ripple-ratio-driven sizing used elsewhere).
    fn estimate_inductance_for_qrm(&self, point: &FlybackOperatingPointSpec, v_in: f64, n1: f64, v_out_1: f64) -> f64 {
        let d = duty_cycle_for(v_in, n1, v_out_1);
        let total_output_power: f64 =
            point.output_voltages.iter().zip(&point.output_currents).map(|(v, i)| v * i).sum();
        let i_primary_center = (total_output_power / v_out_1) / ((1.0 - d) * n1);
        let assumed_frequency = point.frequency.unwrap_or(100_000.0);
        v_in * d / (point.ripple_ratio * assumed_frequency * i_primary_center)
    }

    /// Derives per-secondary turns ratios from `max_duty_cycle` and/or
    /// `max_drain_source_voltage`, combining the two when both are given.
    fn derive_turns_ratios(&self, v_in_max: f64, number_of_secondaries: usize) -> Result<Vec<f64>> {
        let point = self
            .operating_points
            .first()
            .ok_or_else(|| Error::InvalidDesignRequirements("no operating points defined".into()))?;
        let v_in_min = self
            .input_voltage
            .minimum
            .or(self.input_voltage.nominal)
            .ok_or_else(|| Error::MissingData("flyback request needs a minimum or nominal input voltage".into()))?;

        let from_duty_cycle = self.max_duty_cycle.map(|max_duty_cycle| -> Result<Vec<f64>> {
            if !(0.0..1.0).contains(&max_duty_cycle) {
                return Err(Error::InvalidDesignRequirements(format!(
                    "flyback max_duty_cycle {max_duty_cycle} not in (0,1)"
                )));
            }
            let total_output_power: f64 =
                point.output_voltages.iter().zip(&point.output_currents).map(|(v, i)| v * i).sum();
            let i_in_avg = total_output_power / (self.efficiency * v_in_min);
            let i_refl = i_in_avg * (1.0 - max_duty_cycle) / max_duty_cycle;
            let n1 = point.output_currents[0] / i_refl;
            let mut ratios = vec![n1];
            for i in 1..number_of_secondaries {
                ratios.push(n1 * point.output_voltages[0] / point.output_voltages[i]);
            }
            Ok(ratios)
        });

        let from_drain_source = self.max_drain_source_voltage.map(|v_ds_max| -> Vec<f64> {
            let v_or_min = 0.85 * v_ds_max - v_in_max;
            (0..number_of_secondaries)
                .map(|i| v_or_min / (point.output_voltages[i] + self.diode_voltage_drop))
                .collect()
        });

        match (from_duty_cycle, from_drain_source) {
            (Some(a), Some(b)) => {
                let a = a?;
                Ok((0..number_of_secondaries)
                    .map(|i| if a[i] > 1.0 || b[i] > 1.0 { a[i].min(b[i]) } else { a[i].max(b[i]) })
                    .collect())
            }
            (Some(a), None) => a,
            (None, Some(b)) => Ok(b),
            (None, None) => Ok(vec![1.0; number_of_secondaries]),
        }
    }

    /// Assembles the primary and per-secondary excitations for one
    /// operating point, in either the instantaneous (CCM) or dead-time-
    /// bearing (DCM/BMO/QRM) waveform family.
    #[allow(clippy::too_many_arguments)]
    fn build_excitations(
        &self,
        point: &FlybackOperatingPointSpec,
        v_in: f64,
        ratios: &[f64],
        duty_cycle: f64,
        frequency: f64,
        ipp: f64,
        primary_offset: f64,
        secondary_reflected_drop: f64,
        with_deadtime: bool,
    ) -> Vec<OperatingPointExcitation> {
        let period = 1.0 / frequency;
        let t_on = duty_cycle * period;
        let deadtime = if with_deadtime { (period - t_on - t_on).max(0.0) } else { 0.0 };

        let mut primary = OperatingPointExcitation::new("primary", frequency);
        let primary_current = if with_deadtime {
            AnalyticalParams::FlybackPrimaryWithDeadtime {
                ipp,
                duty_cycle,
                offset: primary_offset,
                deadtime,
            }
        } else {
            AnalyticalParams::FlybackPrimary { ipp, duty_cycle, offset: primary_offset, deadtime: 0.0 }
        };
        let primary_voltage = AnalyticalParams::Rectangular {
            vpp: v_in + secondary_reflected_drop,
            duty_cycle,
            offset: 0.0,
        };
        primary.current = Some(waveform::SignalDescriptor::from_waveform(Waveform::build_analytical(
            primary_current,
            frequency,
        )));
        primary.voltage = Some(waveform::SignalDescriptor::from_waveform(Waveform::build_analytical(
            primary_voltage,
            frequency,
        )));

        let mut excitations = vec![primary];
        for (i, (&v_out, &i_out)) in point.output_voltages.iter().zip(&point.output_currents).enumerate() {
            let n = ratios.get(i).copied().unwrap_or(1.0);
            let ipp_sec = ipp * n;
            let i_sec_off = if with_deadtime { 0.0 } else { (i_out - ipp_sec / 2.0).max(0.0) };

            let current_params = if with_deadtime {
                AnalyticalParams::FlybackSecondaryWithDeadtime {
                    ipp: ipp_sec,
                    duty_cycle,
                    offset: i_sec_off,
                    deadtime,
                }
            } else {
                AnalyticalParams::FlybackSecondary { ipp: ipp_sec, duty_cycle, offset: i_sec_off, deadtime: 0.0 }
            };
            let voltage_params = if with_deadtime {
                AnalyticalParams::SecondaryRectangularWithDeadtime {
                    vpp: v_in / n + v_out + self.diode_voltage_drop,
                    duty_cycle,
                    offset: 0.0,
                    deadtime,
                }
            } else {
                AnalyticalParams::SecondaryRectangular {
                    vpp: v_in / n + v_out + self.diode_voltage_drop,
                    duty_cycle,
                    offset: 0.0,
                    deadtime: 0.0,
                }
            };

            let mut excitation = OperatingPointExcitation::new(format!("secondary {}", i + 1), frequency);
            excitation.current = Some(waveform::SignalDescriptor::from_waveform(Waveform::build_analytical(
                current_params,
                frequency,
            )));
            excitation.voltage = Some(waveform::SignalDescriptor::from_waveform(Waveform::build_analytical(
                voltage_params,
                frequency,
            )));
            excitations.push(excitation);
        }
        excitations
    }
}

#[cfg(test)]
mod tests {
    use waveform::WaveformLabel;

    use super::*;

    fn sample_request(ripple_ratio: f64) -> FlybackRequest {
        FlybackRequest {
            input_voltage: DimWithTol::from_range(110.0, 240.0).unwrap(),
            diode_voltage_drop: 0.7,
            efficiency: 1.0,
            max_duty_cycle: None,
            max_drain_source_voltage: Some(350.0),
            drain_source_capacitance: 100e-12,
            operating_points: vec![FlybackOperatingPointSpec {
                output_voltages: vec![12.0, 12.0],
                output_currents: vec![3.0, 5.0],
                frequency: Some(100_000.0),
                mode: None,
                ripple_ratio,
                ambient_temperature: 42.0,
            }],
        }
    }

    #[test]
    fn ccm_primary_current_is_flyback_primary() {
        let request = sample_request(0.3);
        let requirements = request.process_design_requirements().unwrap();
        assert_eq!(requirements.number_of_windings(), 3);

        let points = request
            .process_operating_points(&requirements.turns_ratios, &requirements.magnetizing_inductance)
            .unwrap();
        let primary = &points[0].excitations_per_winding[0];
        assert_eq!(primary.current.as_ref().unwrap().waveform.as_ref().unwrap().label(), Some(WaveformLabel::FlybackPrimary));
        if let AnalyticalParams::FlybackPrimary { offset, .. } =
            primary.current.as_ref().unwrap().waveform.as_ref().unwrap()
        {
            assert!(*offset > 0.0);
        } else {
            panic!("expected FlybackPrimary");
        }
    }

    #[test]
    fn dcm_secondary_labels_carry_deadtime() {
        let request = sample_request(1.0);
        let requirements = request.process_design_requirements().unwrap();
        let points = request
            .process_operating_points(&requirements.turns_ratios, &requirements.magnetizing_inductance)
            .unwrap();
        let secondary = &points[0].excitations_per_winding[1];
        assert_eq!(
            secondary.voltage.as_ref().unwrap().waveform.as_ref().unwrap().label(),
            Some(WaveformLabel::SecondaryRectangularWithDeadtime)
        );
        assert_eq!(
            secondary.current.as_ref().unwrap().waveform.as_ref().unwrap().label(),
            Some(WaveformLabel::FlybackSecondaryWithDeadtime)
        );
    }

    #[test]
    fn secondary_average_current_matches_request_within_ten_percent() {
        let request = sample_request(0.3);
        let requirements = request.process_design_requirements().unwrap();
        let points = request
            .process_operating_points(&requirements.turns_ratios, &requirements.magnetizing_inductance)
            .unwrap();
        let secondary = &points[0].excitations_per_winding[1];
        let waveform = secondary.current.as_ref().unwrap().waveform.as_ref().unwrap();
        assert_eq!(waveform.label(), Some(WaveformLabel::FlybackSecondary));
        let average = waveform.processed(1024).average;
        assert!((average - 3.0).abs() / 3.0 < 0.1, "average {average} not within 10% of 3.0");
    }
}
