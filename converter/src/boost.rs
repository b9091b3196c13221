//! Non-isolated step-up converter.

use om_core::dim::DimWithTol;
use om_core::error::{Error, Result};
use om_core::requirements::DesignRequirements;
use om_core::topology::{IsolationSide, Topology};
use serde::{Deserialize, Serialize};
use waveform::{AnalyticalParams, Conditions, OperatingPoint, OperatingPointExcitation, Waveform};

use crate::buck::InductanceLimit;
use crate::checks::TopologyChecks;
use crate::common::{active_corners, operating_point_name};
use crate::Converter;

/// One requested boost operating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostOperatingPointSpec {
    /// Regulated output voltage, in volts.
    pub output_voltage: f64,
    /// Output load current, in amperes.
    pub output_current: f64,
    /// Switching frequency, in Hz.
    pub frequency: f64,
    /// Ambient temperature, in degrees Celsius.
    pub ambient_temperature: f64,
}

/// A boost converter's design request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostRequest {
    /// The input-voltage range.
    pub input_voltage: DimWithTol,
    /// Rectifier diode forward drop, in volts.
    pub diode_voltage_drop: f64,
    /// Power-stage efficiency, `0 < η ≤ 1`.
    pub efficiency: f64,
    /// The quantity used to bound the required inductance.
    pub inductance_limit: InductanceLimit,
    /// The requested operating points.
    pub operating_points: Vec<BoostOperatingPointSpec>,
}

impl TopologyChecks for BoostRequest {
    fn number_of_operating_points(&self) -> usize {
        self.operating_points.len()
    }
    fn input_voltage(&self) -> &DimWithTol {
        &self.input_voltage
    }
    fn outputs_per_operating_point(&self) -> Vec<usize> {
        vec![1; self.operating_points.len()]
    }
}

impl Converter for BoostRequest {
    fn process_design_requirements(&self) -> Result<DesignRequirements> {
        self.run_checks(true)?;

        let v_in_max = self
            .input_voltage
            .maximum
            .or(self.input_voltage.nominal)
            .ok_or_else(|| Error::MissingData("boost request needs a maximum or nominal input voltage".into()))?;

        let max_i_out =
            self.operating_points.iter().map(|point| point.output_current).fold(f64::MIN, f64::max);
        let delta_i_max = match self.inductance_limit {
            InductanceLimit::RippleRatio(ratio) => ratio * max_i_out,
            InductanceLimit::MaximumSwitchCurrent(max_switch) => 2.0 * (max_switch - max_i_out),
        };
        if delta_i_max <= 0.0 {
            return Err(Error::InvalidDesignRequirements(
                "boost inductance limit produces a non-positive ripple current".into(),
            ));
        }

        let l_min = self
            .operating_points
            .iter()
            .map(|point| {
                v_in_max * (point.output_voltage - v_in_max) / (delta_i_max * point.frequency * point.output_voltage)
            })
            .fold(f64::MIN, f64::max);

        Ok(DesignRequirements {
            magnetizing_inductance: DimWithTol::new(Some(l_min), None, None)?,
            turns_ratios: Vec::new(),
            isolation_sides: vec![IsolationSide::PRIMARY],
            insulation: None,
            topology: Topology::Boost,
            leakage_inductance: None,
        })
    }

    fn process_operating_points(
        &self,
        _turns_ratios: &[DimWithTol],
        magnetizing_inductance: &DimWithTol,
    ) -> Result<Vec<OperatingPoint>> {
        self.run_checks(true)?;
        let l = magnetizing_inductance.get_nominal();
        let corners = active_corners(&self.input_voltage);

        let mut points = Vec::with_capacity(corners.len() * self.operating_points.len());
        for (corner, v_in) in corners {
            for (index, point) in self.operating_points.iter().enumerate() {
                let name = operating_point_name(corner, index, self.operating_points.len());
                let duty_cycle = 1.0 - v_in * self.efficiency / (point.output_voltage + self.diode_voltage_drop);
                if !(0.0..1.0).contains(&duty_cycle) {
                    return Err(Error::InvalidDesignRequirements(format!(
                        "{name}: boost duty cycle {duty_cycle} out of (0, 1)"
                    )));
                }

                let delta_i_l = v_in * duty_cycle / (point.frequency * l);
                let i_avg = point.output_current * (point.output_voltage + self.diode_voltage_drop) / v_in;
                let i_min = i_avg - delta_i_l / 2.0;

                let (current_params, voltage_params) = if i_min >= 0.0 {
                    let v_min = v_in - point.output_voltage - self.diode_voltage_drop;
                    (
                        AnalyticalParams::Triangular { ipp: delta_i_l, duty_cycle, offset: i_avg },
                        AnalyticalParams::Rectangular {
                            vpp: v_in - v_min,
                            duty_cycle,
                            offset: (v_in + v_min) / 2.0,
                        },
                    )
                } else {
                    let t_on = (2.0 * point.output_current * l * (point.output_voltage + self.diode_voltage_drop - v_in)
                        / (point.frequency * v_in * v_in))
                        .sqrt();
                    let t_off = v_in * t_on / (point.output_voltage + self.diode_voltage_drop - v_in);
                    let period = 1.0 / point.frequency;
                    let deadtime = (period - t_on - t_off).max(0.0);
                    let duty_cycle = t_on * point.frequency;
                    let ipp = v_in * t_on / l;
                    let high = v_in;
                    let low = v_in - point.output_voltage - self.diode_voltage_drop;

                    (
                        AnalyticalParams::TriangularWithDeadtime { ipp, duty_cycle, offset: ipp / 2.0, deadtime },
                        AnalyticalParams::RectangularWithDeadtime {
                            vpp: high - low,
                            duty_cycle,
                            offset: (high + low) / 2.0,
                            deadtime,
                        },
                    )
                };

                let mut excitation = OperatingPointExcitation::new("primary", point.frequency);
                excitation.voltage = Some(waveform::SignalDescriptor::from_waveform(Waveform::build_analytical(
                    voltage_params,
                    point.frequency,
                )));
                excitation.current = Some(waveform::SignalDescriptor::from_waveform(Waveform::build_analytical(
                    current_params,
                    point.frequency,
                )));

                points.push(OperatingPoint::new(
                    name,
                    Conditions { ambient_temperature: point.ambient_temperature, cooling: None },
                    vec![excitation],
                ));
            }
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use waveform::WaveformLabel;

    use super::*;

    fn sample_request() -> BoostRequest {
        BoostRequest {
            input_voltage: DimWithTol::from_range(12.0, 24.0).unwrap(),
            diode_voltage_drop: 0.7,
            efficiency: 1.0,
            inductance_limit: InductanceLimit::MaximumSwitchCurrent(8.0),
            operating_points: vec![BoostOperatingPointSpec {
                output_voltage: 50.0,
                output_current: 1.0,
                frequency: 100_000.0,
                ambient_temperature: 25.0,
            }],
        }
    }

    #[test]
    fn minimum_input_operating_point_has_expected_peak_to_peak() {
        let request = sample_request();
        let requirements = request.process_design_requirements().unwrap();
        let points = request
            .process_operating_points(&requirements.turns_ratios, &requirements.magnetizing_inductance)
            .unwrap();
        let minimum = &points[0];
        let excitation = &minimum.excitations_per_winding[0];
        let voltage_waveform = excitation.voltage.as_ref().unwrap().waveform.as_ref().unwrap();
        assert_eq!(voltage_waveform.label(), Some(WaveformLabel::Rectangular));
        if let AnalyticalParams::Rectangular { vpp, .. } = voltage_waveform {
            assert!((vpp - 50.0).abs() / 50.0 < 0.2);
        } else {
            panic!("expected Rectangular");
        }
    }

    #[test]
    fn maximum_input_operating_point_uses_deadtime_labels() {
        let request = sample_request();
        let requirements = request.process_design_requirements().unwrap();
        let points = request
            .process_operating_points(&requirements.turns_ratios, &requirements.magnetizing_inductance)
            .unwrap();
        let maximum = points.last().unwrap();
        let excitation = &maximum.excitations_per_winding[0];
        assert_eq!(
            excitation.current.as_ref().unwrap().waveform.as_ref().unwrap().label(),
            Some(WaveformLabel::TriangularWithDeadtime)
        );
    }
}
