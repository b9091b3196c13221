//! Non-isolated step-down converter.

use om_core::dim::DimWithTol;
use om_core::error::{Error, Result};
use om_core::requirements::DesignRequirements;
use om_core::topology::{IsolationSide, Topology};
use serde::{Deserialize, Serialize};
use waveform::{AnalyticalParams, Conditions, OperatingPoint, OperatingPointExcitation, Waveform};

use crate::checks::TopologyChecks;
use crate::common::{active_corners, operating_point_name};
use crate::Converter;

/// Which quantity bounds the inductor's peak-to-peak ripple current.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum InductanceLimit {
    /// `ΔI_max = ripple_ratio · max(I_out)`.
    RippleRatio(f64),
    /// `ΔI_max = 2 · (maximum_switch_current − max(I_out))`.
    MaximumSwitchCurrent(f64),
}

/// One requested buck operating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuckOperatingPointSpec {
    /// Regulated output voltage, in volts.
    pub output_voltage: f64,
    /// Output load current, in amperes.
    pub output_current: f64,
    /// Switching frequency, in Hz.
    pub frequency: f64,
    /// Ambient temperature, in degrees Celsius.
    pub ambient_temperature: f64,
}

/// A buck converter's design request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuckRequest {
    /// The input-voltage range.
    pub input_voltage: DimWithTol,
    /// Rectifier/switch diode forward drop, in volts.
    pub diode_voltage_drop: f64,
    /// Power-stage efficiency, `0 < η ≤ 1`.
    pub efficiency: f64,
    /// The quantity used to bound the required inductance.
    pub inductance_limit: InductanceLimit,
    /// The requested operating points.
    pub operating_points: Vec<BuckOperatingPointSpec>,
}

impl TopologyChecks for BuckRequest {
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

impl Converter for BuckRequest {
    fn process_design_requirements(&self) -> Result<DesignRequirements> {
        self.run_checks(true)?;

        let v_in_max = self
            .input_voltage
            .maximum
            .or(self.input_voltage.nominal)
            .ok_or_else(|| Error::MissingData("buck request needs a maximum or nominal input voltage".into()))?;

        let max_i_out =
            self.operating_points.iter().map(|point| point.output_current).fold(f64::MIN, f64::max);
        let delta_i_max = match self.inductance_limit {
            InductanceLimit::RippleRatio(ratio) => ratio * max_i_out,
            InductanceLimit::MaximumSwitchCurrent(max_switch) => 2.0 * (max_switch - max_i_out),
        };
        if delta_i_max <= 0.0 {
            return Err(Error::InvalidDesignRequirements(
                "buck inductance limit produces a non-positive ripple current".into(),
            ));
        }

        let l_min = self
            .operating_points
            .iter()
            .map(|point| {
                point.output_voltage * (v_in_max - point.output_voltage)
                    / (delta_i_max * point.frequency * v_in_max)
            })
            .fold(f64::MIN, f64::max);

        Ok(DesignRequirements {
            magnetizing_inductance: DimWithTol::new(Some(l_min), None, None)?,
            turns_ratios: Vec::new(),
            isolation_sides: vec![IsolationSide::PRIMARY],
            insulation: None,
            topology: Topology::Buck,
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
                let duty_cycle =
                    (point.output_voltage + self.diode_voltage_drop) / ((v_in + self.diode_voltage_drop) * self.efficiency);
                if duty_cycle >= 1.0 {
                    return Err(Error::InvalidDesignRequirements(format!(
                        "{name}: buck duty cycle {duty_cycle} >= 1"
                    )));
                }

                let delta_i_l = (v_in - point.output_voltage) * duty_cycle / (point.frequency * l);
                let i_min = point.output_current - delta_i_l / 2.0;

                let high = v_in - point.output_voltage;
                let low = -point.output_voltage - self.diode_voltage_drop;

                let (current_params, voltage_params) = if i_min >= 0.0 {
                    (
                        AnalyticalParams::Triangular { ipp: delta_i_l, duty_cycle, offset: point.output_current },
                        AnalyticalParams::Rectangular { vpp: high - low, duty_cycle, offset: (high + low) / 2.0 },
                    )
                } else {
                    let t_on = (2.0 * point.output_current * l * (point.output_voltage + self.diode_voltage_drop)
                        / (point.frequency * (v_in - point.output_voltage) * (v_in + self.diode_voltage_drop)))
                        .sqrt();
                    let t_off = t_on * ((v_in + self.diode_voltage_drop) / (point.output_voltage + self.diode_voltage_drop) - 1.0);
                    let period = 1.0 / point.frequency;
                    let deadtime = (period - t_on - t_off).max(0.0);
                    let duty_cycle = t_on * point.frequency;
                    let ipp = (v_in - point.output_voltage) * t_on / l;

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
    use approx::assert_relative_eq;
    use waveform::WaveformLabel;

    use super::*;

    fn sample_request() -> BuckRequest {
        BuckRequest {
            input_voltage: DimWithTol::from_range(20.0, 240.0).unwrap(),
            diode_voltage_drop: 0.7,
            efficiency: 0.9,
            inductance_limit: InductanceLimit::MaximumSwitchCurrent(8.0),
            operating_points: vec![BuckOperatingPointSpec {
                output_voltage: 12.0,
                output_current: 3.0,
                frequency: 100_000.0,
                ambient_temperature: 42.0,
            }],
        }
    }

    #[test]
    fn design_requirements_derive_a_positive_inductance() {
        let request = sample_request();
        let requirements = request.process_design_requirements().unwrap();
        assert!(requirements.magnetizing_inductance.minimum.unwrap() > 0.0);
        assert_eq!(requirements.isolation_sides, vec![IsolationSide::PRIMARY]);
    }

    #[test]
    fn minimum_input_is_ccm_and_maximum_input_is_dcm() {
        let request = sample_request();
        let requirements = request.process_design_requirements().unwrap();
        let points = request
            .process_operating_points(&requirements.turns_ratios, &requirements.magnetizing_inductance)
            .unwrap();
        assert_eq!(points.len(), 2);

        let minimum = &points[0];
        let excitation = &minimum.excitations_per_winding[0];
        assert_eq!(excitation.voltage.as_ref().unwrap().waveform.as_ref().unwrap().label(), Some(WaveformLabel::Rectangular));
        assert_eq!(excitation.current.as_ref().unwrap().waveform.as_ref().unwrap().label(), Some(WaveformLabel::Triangular));

        let maximum = &points[1];
        let excitation = &maximum.excitations_per_winding[0];
        assert_eq!(
            excitation.voltage.as_ref().unwrap().waveform.as_ref().unwrap().label(),
            Some(WaveformLabel::RectangularWithDeadtime)
        );
        assert_eq!(
            excitation.current.as_ref().unwrap().waveform.as_ref().unwrap().label(),
            Some(WaveformLabel::TriangularWithDeadtime)
        );
        if let AnalyticalParams::TriangularWithDeadtime { offset, ipp, .. } =
            excitation.current.as_ref().unwrap().waveform.as_ref().unwrap()
        {
            // The DCM triangle swings `offset ± ipp/2`; setting `offset =
            // ipp/2` pins its trough at exactly 0, matching the requested
            // maximum switch current.
            assert_relative_eq!(*offset, *ipp / 2.0, epsilon = 1e-9);
            assert_relative_eq!(*offset - *ipp / 2.0, 0.0, epsilon = 1e-6);
        } else {
            panic!("expected TriangularWithDeadtime");
        }
    }

    #[test]
    fn duty_cycle_at_or_above_one_is_rejected() {
        let mut request = sample_request();
        request.operating_points[0].output_voltage = 1000.0;
        let requirements = request.process_design_requirements();
        // the inductance derivation itself does not check duty cycle; the
        // rejection happens when operating points are synthesised.
        if let Ok(requirements) = requirements {
            assert!(request
                .process_operating_points(&requirements.turns_ratios, &requirements.magnetizing_inductance)
                .is_err());
        }
    }
}
