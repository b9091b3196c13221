//! Isolated buck-boost converter.

use om_core::dim::DimWithTol;
use om_core::error::{Error, Result};
use om_core::requirements::DesignRequirements;
use om_core::topology::{IsolationSide, Topology};
use waveform::{AnalyticalParams, Conditions, OperatingPoint, OperatingPointExcitation, Waveform};

use crate::buck::InductanceLimit;
use crate::checks::TopologyChecks;
use crate::common::{active_corners, operating_point_name};
use crate::Converter;

/// One requested isolated buck-boost operating point: one entry per
/// secondary.
#[derive(Debug, Clone, PartialEq)]
pub struct IsolatedBuckBoostOperatingPointSpec {
    /// Each secondary's regulated output voltage, in volts.
    pub output_voltages: Vec<f64>,
    /// Each secondary's output load current, in amperes.
    pub output_currents: Vec<f64>,
    /// Switching frequency, in Hz.
    pub frequency: f64,
    /// Ambient temperature, in degrees Celsius.
    pub ambient_temperature: f64,
}

/// An isolated buck-boost converter's design request.
#[derive(Debug, Clone, PartialEq)]
pub struct IsolatedBuckBoostRequest {
    /// The input-voltage range.
    pub input_voltage: DimWithTol,
    /// Rectifier diode forward drop, in volts.
    pub diode_voltage_drop: f64,
    /// Power-stage efficiency, `0 < η ≤ 1`.
    pub efficiency: f64,
    /// The quantity used to bound the required primary-side inductance.
    pub inductance_limit: InductanceLimit,
    /// The requested operating points.
    pub operating_points: Vec<IsolatedBuckBoostOperatingPointSpec>,
}

impl TopologyChecks for IsolatedBuckBoostRequest {
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

impl Converter for IsolatedBuckBoostRequest {
    fn process_design_requirements(&self) -> Result<DesignRequirements> {
        self.run_checks(true)?;

        let v_in_max = self
            .input_voltage
            .maximum
            .or(self.input_voltage.nominal)
            .ok_or_else(|| {
                Error::MissingData("isolated buck-boost request needs a maximum or nominal input voltage".into())
            })?;

        let max_i_out = self
            .operating_points
            .iter()
            .map(|point| point.output_currents[0])
            .fold(f64::MIN, f64::max);
        let delta_i_max = match self.inductance_limit {
            InductanceLimit::RippleRatio(ratio) => ratio * max_i_out,
            InductanceLimit::MaximumSwitchCurrent(max_switch) => 2.0 * (max_switch - max_i_out),
        };
        if delta_i_max <= 0.0 {
            return Err(Error::InvalidDesignRequirements(
                "isolated buck-boost inductance limit produces a non-positive ripple current".into(),
            ));
        }

        let l_min = self
            .operating_points
            .iter()
            .map(|point| {
                let v_out_1 = point.output_voltages[0];
                let d = v_out_1 * self.efficiency / (v_in_max + v_out_1);
                v_in_max * d / (delta_i_max * point.frequency)
            })
            .fold(f64::MIN, f64::max);

        let number_of_secondaries = self.operating_points[0].output_voltages.len();
        let v_out_1 = self.operating_points[0].output_voltages[0];
        let turns_ratios = (1..number_of_secondaries)
            .map(|i| DimWithTol::from_nominal(v_out_1 / self.operating_points[0].output_voltages[i]))
            .collect();

        let isolation_sides = std::iter::once(IsolationSide::PRIMARY)
            .chain((0..number_of_secondaries).map(|_| IsolationSide::SECONDARY))
            .collect();

        Ok(DesignRequirements {
            magnetizing_inductance: DimWithTol::new(Some(l_min), None, None)?,
            turns_ratios,
            isolation_sides,
            insulation: None,
            topology: Topology::IsolatedBuckBoost,
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
        let ratios: Vec<f64> = std::iter::once(1.0)
            .chain(turns_ratios.iter().map(DimWithTol::get_nominal))
            .collect();
        let corners = active_corners(&self.input_voltage);

        let mut points = Vec::with_capacity(corners.len() * self.operating_points.len());
        for (corner, v_in) in corners {
            for (index, point) in self.operating_points.iter().enumerate() {
                let name = operating_point_name(corner, index, self.operating_points.len());
                let v_out_1 = point.output_voltages[0];
                let duty_cycle = v_out_1 * self.efficiency / (v_in + v_out_1);
                if !(0.0..1.0).contains(&duty_cycle) {
                    return Err(Error::InvalidDesignRequirements(format!(
                        "{name}: isolated buck-boost duty cycle {duty_cycle} out of (0, 1)"
                    )));
                }

                let ipp = v_in * duty_cycle / (point.frequency * l);

                let mut primary = OperatingPointExcitation::new("primary", point.frequency);
                primary.current = Some(waveform::SignalDescriptor::from_waveform(Waveform::build_analytical(
                    AnalyticalParams::Triangular { ipp, duty_cycle, offset: point.output_currents[0] },
                    point.frequency,
                )));
                primary.voltage = Some(waveform::SignalDescriptor::from_waveform(Waveform::build_analytical(
                    AnalyticalParams::Rectangular {
                        vpp: v_in + v_out_1 + self.diode_voltage_drop,
                        duty_cycle,
                        offset: 0.0,
                    },
                    point.frequency,
                )));

                let mut excitations = vec![primary];
                for (i, (&v_out, &i_out)) in
                    point.output_voltages.iter().zip(&point.output_currents).enumerate()
                {
                    let n = ratios[i];
                    let secondary_duty_cycle = 1.0 - duty_cycle;
                    let ipp_sec = 2.0 * i_out / secondary_duty_cycle;

                    let mut excitation = OperatingPointExcitation::new(format!("secondary {}", i + 1), point.frequency);
                    excitation.current = Some(waveform::SignalDescriptor::from_waveform(Waveform::build_analytical(
                        AnalyticalParams::FlybackPrimary {
                            ipp: ipp_sec,
                            duty_cycle: secondary_duty_cycle,
                            offset: 0.0,
                            deadtime: 0.0,
                        },
                        point.frequency,
                    )));
                    excitation.voltage = Some(waveform::SignalDescriptor::from_waveform(Waveform::build_analytical(
                        AnalyticalParams::SecondaryRectangular {
                            vpp: v_in / n + v_out + self.diode_voltage_drop,
                            duty_cycle: secondary_duty_cycle,
                            offset: 0.0,
                            deadtime: 0.0,
                        },
                        point.frequency,
                    )));
                    excitations.push(excitation);
                }

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

#[cfg(test)]
mod tests {
    use waveform::WaveformLabel;

    use super::*;

    fn sample_request() -> IsolatedBuckBoostRequest {
        IsolatedBuckBoostRequest {
            input_voltage: DimWithTol::from_range(20.0, 60.0).unwrap(),
            diode_voltage_drop: 0.7,
            efficiency: 0.95,
            inductance_limit: InductanceLimit::MaximumSwitchCurrent(10.0),
            operating_points: vec![IsolatedBuckBoostOperatingPointSpec {
                output_voltages: vec![12.0, 5.0],
                output_currents: vec![2.0, 1.0],
                frequency: 100_000.0,
                ambient_temperature: 30.0,
            }],
        }
    }

    #[test]
    fn primary_current_is_triangular_with_output_offset() {
        let request = sample_request();
        let requirements = request.process_design_requirements().unwrap();
        assert_eq!(requirements.number_of_windings(), 3);

        let points = request
            .process_operating_points(&requirements.turns_ratios, &requirements.magnetizing_inductance)
            .unwrap();
        let primary = &points[0].excitations_per_winding[0];
        assert_eq!(primary.current.as_ref().unwrap().waveform.as_ref().unwrap().label(), Some(WaveformLabel::Triangular));
        if let AnalyticalParams::Triangular { offset, .. } =
            primary.current.as_ref().unwrap().waveform.as_ref().unwrap()
        {
            assert_eq!(*offset, 2.0);
        } else {
            panic!("expected Triangular");
        }
    }

    #[test]
    fn turns_ratios_match_output_voltage_ratio() {
        let request = sample_request();
        let requirements = request.process_design_requirements().unwrap();
        assert_eq!(requirements.turns_ratios.len(), 1);
        assert_eq!(requirements.turns_ratios[0].get_nominal(), 12.0 / 5.0);
    }
}
