//! Periodic waveforms: analytical prototypes and uniformly-sampled series.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::harmonics::Harmonics;
use crate::label::{AnalyticalParams, WaveformLabel};
use crate::processed::Processed;

/// The smallest sample count [`sample`] will ever return.
pub const MIN_SAMPLES: usize = 128;

/// A finite periodic waveform: either an analytical prototype or a
/// uniformly-sampled series returned by an external transient solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Waveform {
    /// A closed-form waveform shape, evaluated on demand.
    Analytical {
        /// The shape and its parameters.
        params: AnalyticalParams,
        /// The fundamental frequency, in Hz.
        frequency: f64,
    },
    /// A uniformly-sampled waveform over exactly one period.
    Sampled {
        /// Samples over one period, starting at phase 0.
        samples: Vec<f64>,
        /// The fundamental frequency, in Hz.
        frequency: f64,
    },
}

impl Waveform {
    /// Constructs an analytical waveform.
    pub fn build_analytical(params: AnalyticalParams, frequency: f64) -> Self {
        Waveform::Analytical { params, frequency }
    }

    /// The fundamental frequency of this waveform, in Hz.
    pub fn frequency(&self) -> f64 {
        match self {
            Waveform::Analytical { frequency, .. } => *frequency,
            Waveform::Sampled { frequency, .. } => *frequency,
        }
    }

    /// The analytical label of this waveform, if it has one.
    pub fn label(&self) -> Option<WaveformLabel> {
        match self {
            Waveform::Analytical { params, .. } => Some(params.label()),
            Waveform::Sampled { .. } => None,
        }
    }

    /// Samples this waveform at `n` equally-spaced points over one period,
    /// where `n` is rounded up to the next power of two, with a floor of
    /// [`MIN_SAMPLES`].
    pub fn sample(&self, n: usize) -> Vec<f64> {
        let n = next_pow2_at_least(n, MIN_SAMPLES);
        match self {
            Waveform::Analytical { params, frequency } => {
                let period = 1.0 / frequency;
                (0..n)
                    .map(|k| evaluate(params, k as f64 * period / n as f64, period))
                    .collect()
            }
            Waveform::Sampled { samples, .. } => resample_one_period(samples, n),
        }
    }

    /// Computes [`Processed`] attributes from `n` samples of this waveform.
    pub fn processed(&self, n: usize) -> Processed {
        let samples = self.sample(n);
        Processed::from_samples(&samples, self.label())
    }

    /// Runs a DFT on `n` samples of this waveform to produce [`Harmonics`].
    pub fn harmonics(&self, n: usize) -> Harmonics {
        let samples = self.sample(n);
        Harmonics::from_samples(&samples, self.frequency())
    }
}

fn next_pow2_at_least(requested: usize, floor: usize) -> usize {
    requested.max(floor).next_power_of_two()
}

fn resample_one_period(samples: &[f64], n: usize) -> Vec<f64> {
    if samples.len() == n {
        return samples.to_vec();
    }
    let len = samples.len() as f64;
    (0..n)
        .map(|k| {
            let pos = k as f64 * len / n as f64;
            let i0 = pos.floor() as usize % samples.len();
            let i1 = (i0 + 1) % samples.len();
            let frac = pos.fract();
            samples[i0] * (1.0 - frac) + samples[i1] * frac
        })
        .collect()
}

fn evaluate(params: &AnalyticalParams, t: f64, period: f64) -> f64 {
    match *params {
        AnalyticalParams::Rectangular { vpp, duty_cycle, offset } => {
            if t < duty_cycle * period {
                offset + vpp / 2.0
            } else {
                offset - vpp / 2.0
            }
        }
        AnalyticalParams::RectangularWithDeadtime { vpp, duty_cycle, offset, deadtime } => {
            let t_on = duty_cycle * period;
            if t < t_on {
                offset + vpp / 2.0
            } else if t < period - deadtime {
                offset - vpp / 2.0
            } else {
                0.0
            }
        }
        AnalyticalParams::SecondaryRectangular { vpp, duty_cycle, offset, .. } => {
            if t < duty_cycle * period {
                offset - vpp / 2.0
            } else {
                offset + vpp / 2.0
            }
        }
        AnalyticalParams::SecondaryRectangularWithDeadtime { vpp, duty_cycle, offset, deadtime } => {
            let t_on = duty_cycle * period;
            if t < t_on {
                offset - vpp / 2.0
            } else if t < period - deadtime {
                offset + vpp / 2.0
            } else {
                0.0
            }
        }
        AnalyticalParams::Triangular { ipp, duty_cycle, offset } => {
            let t_on = duty_cycle * period;
            let t_off = period - t_on;
            let lower = offset - ipp / 2.0;
            let upper = offset + ipp / 2.0;
            if t < t_on {
                lower + ipp * (t / t_on)
            } else {
                upper - ipp * ((t - t_on) / t_off)
            }
        }
        AnalyticalParams::TriangularWithDeadtime { ipp, duty_cycle, offset, deadtime } => {
            let t_on = duty_cycle * period;
            let t_off = period - t_on - deadtime;
            let lower = offset - ipp / 2.0;
            let upper = offset + ipp / 2.0;
            if t < t_on {
                lower + ipp * (t / t_on)
            } else if t < t_on + t_off {
                upper - ipp * ((t - t_on) / t_off)
            } else {
                0.0
            }
        }
        AnalyticalParams::FlybackPrimary { ipp, duty_cycle, offset, .. }
        | AnalyticalParams::FlybackPrimaryWithDeadtime { ipp, duty_cycle, offset, .. } => {
            let t_on = duty_cycle * period;
            if t < t_on {
                offset + ipp * (t / t_on)
            } else {
                0.0
            }
        }
        AnalyticalParams::FlybackSecondary { ipp, duty_cycle, offset, .. } => {
            let t_on = duty_cycle * period;
            let t_off = period - t_on;
            if t < t_on {
                0.0
            } else {
                (offset + ipp) - ipp * ((t - t_on) / t_off)
            }
        }
        AnalyticalParams::FlybackSecondaryWithDeadtime { ipp, duty_cycle, offset, deadtime } => {
            let t_on = duty_cycle * period;
            let t_off = period - t_on - deadtime;
            if t < t_on {
                0.0
            } else if t < t_on + t_off {
                (offset + ipp) - ipp * ((t - t_on) / t_off)
            } else {
                0.0
            }
        }
        AnalyticalParams::Sinusoidal { amplitude, offset } => {
            offset + amplitude * (2.0 * std::f64::consts::PI * t / period).sin()
        }
    }
}

/// `{ waveform, processed, harmonics }`, any subset of which may be absent.
///
/// Consumers that need a field which is absent must compute it from
/// `waveform` (if present); if `waveform` is also absent, they must fail
/// with [`Error::MissingData`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalDescriptor {
    /// The underlying waveform, if known.
    pub waveform: Option<Waveform>,
    /// Derived scalar attributes, computed lazily.
    pub processed: Option<Processed>,
    /// DFT harmonics, computed lazily.
    pub harmonics: Option<Harmonics>,
}

impl SignalDescriptor {
    /// Creates a descriptor wrapping a known waveform, with nothing yet
    /// computed.
    pub fn from_waveform(waveform: Waveform) -> Self {
        Self { waveform: Some(waveform), processed: None, harmonics: None }
    }

    /// Returns the cached [`Processed`], computing and caching it from
    /// `waveform` with `n` samples if absent.
    pub fn ensure_processed(&mut self, n: usize) -> Result<&Processed> {
        if self.processed.is_none() {
            let waveform = self
                .waveform
                .as_ref()
                .ok_or_else(|| Error::MissingData("current is not processed".into()))?;
            self.processed = Some(waveform.processed(n));
        }
        Ok(self.processed.as_ref().unwrap())
    }

    /// Returns the cached [`Harmonics`], computing and caching them from
    /// `waveform` with `n` samples if absent.
    pub fn ensure_harmonics(&mut self, n: usize) -> Result<&Harmonics> {
        if self.harmonics.is_none() {
            let waveform = self
                .waveform
                .as_ref()
                .ok_or_else(|| Error::MissingData("harmonics require a waveform".into()))?;
            self.harmonics = Some(waveform.harmonics(n));
        }
        Ok(self.harmonics.as_ref().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rectangular_round_trips_peak_to_peak_offset_and_duty() {
        let params = AnalyticalParams::Rectangular {
            vpp: 10.0,
            duty_cycle: 0.3,
            offset: 2.0,
        };
        let waveform = Waveform::build_analytical(params, 100_000.0);
        let processed = waveform.processed(1024);
        assert_relative_eq!(processed.peak_to_peak, 10.0, epsilon = 1e-6);
        assert_relative_eq!(processed.offset, 2.0, epsilon = 1e-2);
        assert_relative_eq!(processed.duty_cycle.unwrap(), 0.3, epsilon = 1.0 / 1024.0);
    }

    #[test]
    fn triangular_reproduces_requested_peak_to_peak() {
        let params = AnalyticalParams::Triangular {
            ipp: 4.0,
            duty_cycle: 0.5,
            offset: 1.0,
        };
        let waveform = Waveform::build_analytical(params, 50_000.0);
        let processed = waveform.processed(512);
        assert_relative_eq!(processed.peak_to_peak, 4.0, epsilon = 1e-2);
    }

    #[test]
    fn sample_rounds_up_to_power_of_two_with_floor() {
        let params = AnalyticalParams::Sinusoidal { amplitude: 1.0, offset: 0.0 };
        let waveform = Waveform::build_analytical(params, 1000.0);
        assert_eq!(waveform.sample(10).len(), 128);
        assert_eq!(waveform.sample(200).len(), 256);
    }

    #[test]
    fn missing_waveform_reports_missing_data() {
        let mut descriptor = SignalDescriptor::default();
        assert!(matches!(
            descriptor.ensure_processed(128),
            Err(Error::MissingData(_))
        ));
    }
}
