//! Excitation packaging (C2): per-winding voltage/current/magnetising-current
//! signals, bundled with frequency and harmonics, into an operating point.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::waveform::SignalDescriptor;

/// Voltage, current and (induced) magnetising-current signals for one
/// winding at one operating point.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatingPointExcitation {
    /// The winding's name.
    pub name: String,
    /// The fundamental frequency shared by every present signal.
    pub frequency: f64,
    /// The voltage across the winding.
    pub voltage: Option<SignalDescriptor>,
    /// The current through the winding.
    pub current: Option<SignalDescriptor>,
    /// The magnetising current, when separately tracked (primary windings
    /// in coupled-inductor topologies).
    pub magnetizing_current: Option<SignalDescriptor>,
}

impl OperatingPointExcitation {
    /// Creates a new, empty excitation for `name` at `frequency`.
    pub fn new(name: impl Into<String>, frequency: f64) -> Self {
        Self { name: name.into(), frequency, voltage: None, current: None, magnetizing_current: None }
    }

    /// Validates the invariant that every present signal's waveform
    /// frequency equals `self.frequency`.
    pub fn check_frequency_consistency(&self) -> Result<()> {
        for descriptor in [&self.voltage, &self.current, &self.magnetizing_current]
            .into_iter()
            .flatten()
        {
            if let Some(waveform) = &descriptor.waveform {
                if (waveform.frequency() - self.frequency).abs() > 1e-9 * self.frequency.max(1.0) {
                    return Err(Error::InvalidInput(format!(
                        "excitation {} carries a signal at {} Hz, expected {} Hz",
                        self.name,
                        waveform.frequency(),
                        self.frequency
                    )));
                }
            }
        }
        Ok(())
    }

    /// Prunes the harmonics of every present signal using
    /// [`crate::Harmonics::prune`], computing them first if absent.
    pub fn prune_harmonics(&mut self, threshold: f64, min_index: usize, n_samples: usize) -> Result<()> {
        for descriptor in [&mut self.voltage, &mut self.current, &mut self.magnetizing_current]
            .into_iter()
            .flatten()
        {
            let harmonics = descriptor.ensure_harmonics(n_samples)?;
            descriptor.harmonics = Some(harmonics.prune(threshold, min_index));
        }
        Ok(())
    }
}

/// Ambient operating conditions shared by every winding in an
/// [`OperatingPoint`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conditions {
    /// Ambient temperature, in degrees Celsius.
    pub ambient_temperature: f64,
    /// Optional cooling description (forced air, heatsink, …); opaque to
    /// this library.
    pub cooling: Option<String>,
}

/// A named operating point: ambient conditions plus one excitation per
/// winding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatingPoint {
    /// A human-readable name, e.g. `"nominal input volt."`.
    pub name: String,
    /// Ambient conditions.
    pub conditions: Conditions,
    /// One excitation per winding; must be non-empty.
    pub excitations_per_winding: Vec<OperatingPointExcitation>,
}

impl OperatingPoint {
    /// Creates a new operating point. Panics if `excitations_per_winding`
    /// is empty: every operating point needs at least one winding.
    pub fn new(
        name: impl Into<String>,
        conditions: Conditions,
        excitations_per_winding: Vec<OperatingPointExcitation>,
    ) -> Self {
        assert!(!excitations_per_winding.is_empty(), "an operating point needs at least one winding");
        Self { name: name.into(), conditions, excitations_per_winding }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::AnalyticalParams;
    use crate::waveform::Waveform;

    #[test]
    fn frequency_mismatch_is_rejected() {
        let mut excitation = OperatingPointExcitation::new("primary", 100_000.0);
        excitation.voltage = Some(SignalDescriptor::from_waveform(Waveform::build_analytical(
            AnalyticalParams::Sinusoidal { amplitude: 1.0, offset: 0.0 },
            50_000.0,
        )));
        assert!(excitation.check_frequency_consistency().is_err());
    }

    #[test]
    fn prune_harmonics_shrinks_small_components() {
        let mut excitation = OperatingPointExcitation::new("primary", 100_000.0);
        excitation.current = Some(SignalDescriptor::from_waveform(Waveform::build_analytical(
            AnalyticalParams::Triangular { ipp: 1.0, duty_cycle: 0.5, offset: 0.5 },
            100_000.0,
        )));
        excitation.prune_harmonics(0.05, 1, 256).unwrap();
        let harmonics = excitation.current.unwrap().harmonics.unwrap();
        assert!(harmonics.amplitudes.len() <= 129);
    }
}
