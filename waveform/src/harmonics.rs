//! DFT harmonics and amplitude-threshold pruning.

use serde::{Deserialize, Serialize};

use crate::fft::real_fft;

/// A pair of equal-length sequences `(frequencies, amplitudes)`, with
/// `frequencies[0] == 0` (the DC term).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Harmonics {
    /// The frequency of each harmonic, in Hz. `frequencies[k] == k * f0`.
    pub frequencies: Vec<f64>,
    /// The amplitude of each harmonic.
    pub amplitudes: Vec<f64>,
}

impl Harmonics {
    /// Runs a DFT on `samples` (whose length must be a power of two, the
    /// postcondition of [`crate::waveform::sample`]) to produce one
    /// amplitude per harmonic index `0..=n/2`, at frequency spacing `f0`
    /// (the fundamental frequency of the sampled waveform).
    pub fn from_samples(samples: &[f64], fundamental_frequency: f64) -> Self {
        let n = samples.len();
        let spectrum = real_fft(samples);
        let half = n / 2;
        let mut frequencies = Vec::with_capacity(half + 1);
        let mut amplitudes = Vec::with_capacity(half + 1);
        for k in 0..=half {
            let (re, im) = spectrum[k];
            let magnitude = re.hypot(im) / n as f64;
            let amplitude = if k == 0 || k == half { magnitude } else { 2.0 * magnitude };
            frequencies.push(k as f64 * fundamental_frequency);
            amplitudes.push(amplitude);
        }
        Self { frequencies, amplitudes }
    }

    /// The RMS-weighted effective frequency
    /// `sqrt(Σ_{k≥1} (a_k² · f_k²) / Σ_{k≥1} a_k²)`, used to evaluate
    /// skin/proximity losses on non-sinusoidal waveforms. Returns `None`
    /// when there is no AC content (all `a_k == 0` for `k ≥ 1`).
    pub fn effective_frequency(&self) -> Option<f64> {
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for (f, a) in self.frequencies.iter().zip(self.amplitudes.iter()).skip(1) {
            numerator += a * a * f * f;
            denominator += a * a;
        }
        if denominator <= 0.0 {
            None
        } else {
            Some((numerator / denominator).sqrt())
        }
    }

    /// Removes any harmonic `k >= min_index` whose amplitude is below
    /// `threshold * max(amplitudes)`. Harmonics with `k < min_index` (by
    /// default just the DC term) are always kept regardless of amplitude.
    pub fn prune(&self, threshold: f64, min_index: usize) -> Harmonics {
        let max_amplitude = self.amplitudes.iter().cloned().fold(0.0_f64, f64::max);
        let cutoff = threshold * max_amplitude;
        let mut frequencies = Vec::new();
        let mut amplitudes = Vec::new();
        for (k, (f, a)) in self.frequencies.iter().zip(self.amplitudes.iter()).enumerate() {
            if k < min_index || *a >= cutoff {
                frequencies.push(*f);
                amplitudes.push(*a);
            }
        }
        Harmonics { frequencies, amplitudes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pure_sine_has_energy_concentrated_at_fundamental() {
        let n = 256;
        let f0 = 1000.0;
        let samples: Vec<f64> = (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * i as f64 / n as f64).sin())
            .collect();
        let harmonics = Harmonics::from_samples(&samples, f0);
        assert_relative_eq!(harmonics.amplitudes[1], 1.0, epsilon = 1e-6);
        assert_relative_eq!(harmonics.frequencies[1], f0);
        assert!(harmonics.amplitudes[2] < 1e-6);
    }

    #[test]
    fn prune_keeps_dc_and_drops_small_harmonics() {
        let harmonics = Harmonics {
            frequencies: vec![0.0, 100.0, 200.0, 300.0],
            amplitudes: vec![0.0, 10.0, 0.1, 5.0],
        };
        let pruned = harmonics.prune(0.05, 1);
        assert_eq!(pruned.frequencies, vec![0.0, 100.0, 300.0]);
    }

    #[test]
    fn effective_frequency_weights_by_amplitude_squared() {
        let harmonics = Harmonics {
            frequencies: vec![0.0, 100.0, 200.0],
            amplitudes: vec![5.0, 1.0, 1.0],
        };
        let eff = harmonics.effective_frequency().unwrap();
        let expected = ((100f64.powi(2) + 200f64.powi(2)) / 2.0).sqrt();
        assert_relative_eq!(eff, expected);
    }
}
