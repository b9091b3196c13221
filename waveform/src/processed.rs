//! Derived scalar attributes of a waveform.

use serde::{Deserialize, Serialize};

use crate::label::WaveformLabel;

/// Scalar attributes derived from a waveform's samples.
///
/// `duty_cycle` and `effective_frequency` are only meaningful for certain
/// waveform shapes/contexts and so are `Option`; everything else is always
/// derivable from a non-empty sample buffer.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Processed {
    /// The signed sample of greatest magnitude.
    pub peak: f64,
    /// `max(y) - min(y)`.
    pub peak_to_peak: f64,
    /// The mean value of the waveform.
    pub offset: f64,
    /// The root-mean-square value.
    pub rms: f64,
    /// The mean absolute value.
    pub average: f64,
    /// The fraction of the period for which `y > offset`, for pulse-like
    /// labels. `None` for labels where a duty cycle is not meaningful
    /// (e.g. [`WaveformLabel::Sinusoidal`]).
    pub duty_cycle: Option<f64>,
    /// The RMS-weighted effective frequency, when harmonics are available.
    pub effective_frequency: Option<f64>,
    /// The analytical label this waveform was constructed with, if any.
    pub label: Option<WaveformLabel>,
}

impl Processed {
    /// Derives peak/peak-to-peak/offset/rms/average/duty-cycle from a
    /// sample buffer.
    pub fn from_samples(samples: &[f64], label: Option<WaveformLabel>) -> Self {
        assert!(!samples.is_empty());
        let offset = samples.iter().sum::<f64>() / samples.len() as f64;
        let peak = samples
            .iter()
            .copied()
            .max_by(|a, b| a.abs().partial_cmp(&b.abs()).unwrap())
            .unwrap();
        let max = samples.iter().cloned().fold(f64::MIN, f64::max);
        let min = samples.iter().cloned().fold(f64::MAX, f64::min);
        let peak_to_peak = max - min;
        let rms = (samples.iter().map(|y| y * y).sum::<f64>() / samples.len() as f64).sqrt();
        let average = samples.iter().map(|y| y.abs()).sum::<f64>() / samples.len() as f64;
        let duty_cycle = duty_cycle_for_label(label).then(|| {
            samples.iter().filter(|y| **y > offset).count() as f64 / samples.len() as f64
        });
        Processed {
            peak,
            peak_to_peak,
            offset,
            rms,
            average,
            duty_cycle,
            effective_frequency: None,
            label,
        }
    }

    /// Returns a copy of this [`Processed`] with `effective_frequency` set.
    pub fn with_effective_frequency(mut self, effective_frequency: Option<f64>) -> Self {
        self.effective_frequency = effective_frequency;
        self
    }
}

fn duty_cycle_for_label(label: Option<WaveformLabel>) -> bool {
    !matches!(label, Some(WaveformLabel::Sinusoidal) | None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn constant_waveform_has_zero_peak_to_peak() {
        let samples = vec![2.0; 16];
        let processed = Processed::from_samples(&samples, None);
        assert_relative_eq!(processed.peak_to_peak, 0.0);
        assert_relative_eq!(processed.offset, 2.0);
        assert_relative_eq!(processed.rms, 2.0);
    }

    #[test]
    fn duty_cycle_absent_for_sinusoidal() {
        let samples = vec![0.0, 1.0, 0.0, -1.0];
        let processed = Processed::from_samples(&samples, Some(WaveformLabel::Sinusoidal));
        assert!(processed.duty_cycle.is_none());
    }

    #[test]
    fn duty_cycle_present_for_pulse_labels() {
        let samples = vec![1.0, 1.0, -1.0, -1.0];
        let processed = Processed::from_samples(&samples, Some(WaveformLabel::Rectangular));
        assert_eq!(processed.duty_cycle, Some(0.5));
    }
}
