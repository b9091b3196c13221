//! Per-winding waveform-name mapping: turns a solver's named
//! series back into [`waveform::OperatingPointExcitation`]s.

use om_core::error::{Error, Result};
use waveform::{Conditions, OperatingPoint, OperatingPointExcitation, SignalDescriptor, Waveform};

use crate::runner::SimulationResult;

/// Maps one winding's voltage/current signals to the solver's named
/// output: a voltage node to a winding name, the current through a 0V
/// sense source to a winding name, and an optional sign-flip flag.
#[derive(Debug, Clone)]
pub struct WaveformNameMapping {
    /// The winding this mapping produces an excitation for.
    pub winding_name: String,
    /// The solver signal carrying this winding's voltage (e.g.
    /// `"v(pri)-v(0)"`), if tracked.
    pub voltage_signal: Option<String>,
    /// The solver signal carrying this winding's current, read through a
    /// zero-volt sense source (e.g. `"i(vmonprimary)"`), if tracked.
    pub current_signal: Option<String>,
    /// Flips the sign of the current signal (sense sources often read the
    /// opposite polarity from the winding's reference direction).
    pub invert_current: bool,
}

impl WaveformNameMapping {
    /// A mapping tracking only a winding's voltage.
    pub fn voltage_only(winding_name: impl Into<String>, voltage_signal: impl Into<String>) -> Self {
        Self {
            winding_name: winding_name.into(),
            voltage_signal: Some(voltage_signal.into()),
            current_signal: None,
            invert_current: false,
        }
    }

    /// A mapping tracking both voltage and current.
    pub fn voltage_and_current(
        winding_name: impl Into<String>,
        voltage_signal: impl Into<String>,
        current_signal: impl Into<String>,
        invert_current: bool,
    ) -> Self {
        Self {
            winding_name: winding_name.into(),
            voltage_signal: Some(voltage_signal.into()),
            current_signal: Some(current_signal.into()),
            invert_current,
        }
    }
}

/// Converts a completed [`SimulationResult`] into one [`OperatingPoint`]
/// named `name`, with one excitation per mapping, each signal's
/// `processed`/`harmonics` computed eagerly via C1 (waveform crate).
pub fn to_operating_point(
    result: &SimulationResult,
    mappings: &[WaveformNameMapping],
    frequency: f64,
    ambient_temperature: f64,
    name: impl Into<String>,
    n_samples: usize,
) -> Result<OperatingPoint> {
    if !result.success {
        return Err(Error::SimulatorFailure(
            result.error.clone().unwrap_or_else(|| "ngspice run did not succeed".into()),
        ));
    }

    let mut excitations = Vec::with_capacity(mappings.len());
    for mapping in mappings {
        let mut excitation = OperatingPointExcitation::new(mapping.winding_name.clone(), frequency);

        if let Some(voltage_signal) = &mapping.voltage_signal {
            let samples = result
                .signal(voltage_signal)
                .ok_or_else(|| Error::MissingData(format!("signal {voltage_signal:?} not present in simulation output")))?;
            excitation.voltage = Some(descriptor_from_samples(samples, frequency, n_samples)?);
        }
        if let Some(current_signal) = &mapping.current_signal {
            let samples = result
                .signal(current_signal)
                .ok_or_else(|| Error::MissingData(format!("signal {current_signal:?} not present in simulation output")))?;
            let samples: Vec<f64> = if mapping.invert_current {
                samples.iter().map(|v| -v).collect()
            } else {
                samples.to_vec()
            };
            excitation.current = Some(descriptor_from_samples(&samples, frequency, n_samples)?);
        }
        excitation.check_frequency_consistency()?;
        excitations.push(excitation);
    }

    Ok(OperatingPoint::new(
        name,
        Conditions { ambient_temperature, cooling: None },
        excitations,
    ))
}

fn descriptor_from_samples(samples: &[f64], frequency: f64, n_samples: usize) -> Result<SignalDescriptor> {
    let waveform = Waveform::Sampled { samples: samples.to_vec(), frequency };
    let mut descriptor = SignalDescriptor::from_waveform(waveform);
    descriptor.ensure_processed(n_samples)?;
    descriptor.ensure_harmonics(n_samples)?;
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sample_result() -> SimulationResult {
        let n = 256;
        let samples: Vec<f64> = (0..n).map(|i| (i as f64 / n as f64 * std::f64::consts::TAU).sin() * 10.0).collect();
        SimulationResult {
            success: true,
            error: None,
            waveforms: vec![("v(pri)".to_string(), samples.clone()), ("i(vmonprimary)".to_string(), samples)],
            simulation_time: Duration::from_millis(1),
        }
    }

    #[test]
    fn builds_one_excitation_per_mapping() {
        let result = sample_result();
        let mappings = vec![WaveformNameMapping::voltage_and_current("primary", "v(pri)", "i(vmonprimary)", false)];
        let op = to_operating_point(&result, &mappings, 100_000.0, 42.0, "minimum input volt.", 256).unwrap();
        assert_eq!(op.excitations_per_winding.len(), 1);
        assert!(op.excitations_per_winding[0].voltage.is_some());
        assert!(op.excitations_per_winding[0].current.is_some());
    }

    #[test]
    fn missing_signal_is_reported() {
        let result = sample_result();
        let mappings = vec![WaveformNameMapping::voltage_only("primary", "v(missing)")];
        assert!(to_operating_point(&result, &mappings, 100_000.0, 42.0, "op", 256).is_err());
    }

    #[test]
    fn solver_failure_propagates() {
        let mut result = sample_result();
        result.success = false;
        result.error = Some("convergence failure".to_string());
        let mappings = vec![WaveformNameMapping::voltage_only("primary", "v(pri)")];
        let err = to_operating_point(&result, &mappings, 100_000.0, 42.0, "op", 256).unwrap_err();
        assert!(matches!(err, Error::SimulatorFailure(_)));
    }
}
