//! Symmetric Hann window for one-shot spectral analysis.

/// Symmetric Hann window
/// w[i] = 0.5 * (1 - cos(2πi/(N-1)))
///
/// `n == 1` yields `[0.0]` by convention: the tapered endpoints of the
/// symmetric window are zero and a single sample carries no periodicity.
#[inline]
pub fn hann_window(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let two_pi = std::f64::consts::PI * 2.0;
            let denom = (n - 1) as f64;
            let mut w = Vec::with_capacity(n);
            for i in 0..n {
                let phi = two_pi * i as f64 / denom;
                w.push(0.5 * (1.0 - phi.cos()));
            }
            w
        }
    }
}

/// Apply the symmetric Hann window elementwise.
pub fn apply_hann_window(buf: &mut [f64]) {
    let win = hann_window(buf.len());
    for (x, &w) in buf.iter_mut().zip(&win) {
        *x *= w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_zero() {
        let w = hann_window(256);
        assert!(w.first().unwrap().abs() < 1e-12);
        assert!(w.last().unwrap().abs() < 1e-12);
        assert!(w.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn symmetric_about_center() {
        let n = 255;
        let w = hann_window(n);
        let max_err = (0..n / 2)
            .map(|i| (w[i] - w[n - 1 - i]).abs())
            .fold(0.0f64, f64::max);
        assert!(max_err < 1e-12, "symmetry max_err={max_err}");
    }

    #[test]
    fn center_reaches_one_for_odd_n() {
        let w = hann_window(129);
        assert!((w[64] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_lengths() {
        assert!(hann_window(0).is_empty());
        assert_eq!(hann_window(1), vec![0.0]);
        let w2 = hann_window(2);
        assert!(w2[0].abs() < 1e-12 && w2[1].abs() < 1e-12);
    }

    #[test]
    fn apply_scales_elementwise() {
        let mut buf = vec![1.0; 64];
        apply_hann_window(&mut buf);
        let w = hann_window(64);
        for (a, b) in buf.iter().zip(w.iter()) {
            assert_eq!(a, b);
        }
    }
}
