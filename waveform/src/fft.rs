//! A small iterative radix-2 FFT used to produce harmonic amplitudes from a
//! power-of-two-length sample buffer. No external FFT crate is pulled in:
//! the transform is only ever run on the modest buffer sizes this library
//! uses (at most a few thousand samples), so a direct Cooley-Tukey
//! implementation is both sufficient and dependency-free.

/// Computes the discrete Fourier transform of a real-valued signal whose
/// length is a power of two, returning `(re, im)` pairs.
///
/// # Panics
///
/// Panics if `samples.len()` is not a power of two.
pub fn real_fft(samples: &[f64]) -> Vec<(f64, f64)> {
    let n = samples.len();
    assert!(n.is_power_of_two(), "FFT length must be a power of two");

    let mut re: Vec<f64> = samples.to_vec();
    let mut im: Vec<f64> = vec![0.0; n];

    bit_reverse_permute(&mut re, &mut im);

    let mut size = 2;
    while size <= n {
        let half = size / 2;
        let angle_step = -2.0 * std::f64::consts::PI / size as f64;
        let mut start = 0;
        while start < n {
            for k in 0..half {
                let angle = angle_step * k as f64;
                let (sin, cos) = angle.sin_cos();
                let i_even = start + k;
                let i_odd = start + k + half;
                let t_re = re[i_odd] * cos - im[i_odd] * sin;
                let t_im = re[i_odd] * sin + im[i_odd] * cos;
                re[i_odd] = re[i_even] - t_re;
                im[i_odd] = im[i_even] - t_im;
                re[i_even] += t_re;
                im[i_even] += t_im;
            }
            start += size;
        }
        size *= 2;
    }

    re.into_iter().zip(im).collect()
}

fn bit_reverse_permute(re: &mut [f64], im: &mut [f64]) {
    let n = re.len();
    let bits = n.trailing_zeros();
    for i in 0..n {
        let j = i.reverse_bits() >> (usize::BITS - bits);
        if j > i {
            re.swap(i, j);
            im.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dc_signal_has_only_a_dc_component() {
        let samples = vec![3.0; 128];
        let spectrum = real_fft(&samples);
        assert_relative_eq!(spectrum[0].0 / 128.0, 3.0, epsilon = 1e-9);
        for (re, im) in spectrum.iter().skip(1) {
            assert_relative_eq!(*re, 0.0, epsilon = 1e-6);
            assert_relative_eq!(*im, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn single_tone_concentrates_energy_at_its_bin() {
        let n = 128;
        let k = 5;
        let samples: Vec<f64> = (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * k as f64 * i as f64 / n as f64).sin())
            .collect();
        let spectrum = real_fft(&samples);
        let mag_at_k = spectrum[k].0.hypot(spectrum[k].1);
        let mag_at_other = spectrum[k + 1].0.hypot(spectrum[k + 1].1);
        assert!(mag_at_k > mag_at_other * 10.0);
    }
}
