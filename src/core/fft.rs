//! Real-input transform wrapper: half-spectrum of complex bins.

use rustfft::{num_complex::Complex64, FftPlanner};

/// Forward transform of a real sequence, returning the `n/2 + 1` unique bins
/// (conjugate symmetry makes the upper half redundant). Any length is
/// accepted; rustfft plans mixed-radix transforms for non-powers of two.
pub fn half_spectrum(samples: &[f64]) -> Vec<Complex64> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }

    let mut buf: Vec<Complex64> = samples.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buf);

    buf.truncate(n / 2 + 1);
    buf
}

/// Bin center frequencies for a length-`n` real transform: `k * fs / n`.
pub fn bin_freqs(fs: f64, n: usize) -> Vec<f64> {
    (0..=n / 2).map(|k| k as f64 * fs / n as f64).collect()
}
