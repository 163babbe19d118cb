//! Aggregate spectral descriptors over the non-DC half spectrum.

/// Fraction of total power below the rolloff frequency.
const ROLLOFF_FRACTION: f64 = 0.85;

/// Sum of power over all non-DC bins.
pub fn total_power(power: &[f64]) -> f64 {
    power.iter().skip(1).sum()
}

/// Power-weighted mean frequency (brightness), 0 when the spectrum is empty.
pub fn spectral_centroid(freqs: &[f64], power: &[f64]) -> f64 {
    let total = total_power(power);
    if total <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = freqs
        .iter()
        .zip(power.iter())
        .skip(1)
        .map(|(&f, &p)| f * p)
        .sum();
    weighted / total
}

/// Normalized Shannon entropy of the non-DC power distribution, in [0, 1].
///
/// Defined as 0 when at most one bin carries power: log2(1) = 0 would
/// otherwise divide by zero, and a single-bin spectrum has no disorder.
pub fn spectral_entropy(power: &[f64]) -> f64 {
    let total = total_power(power);
    if total <= 0.0 {
        return 0.0;
    }

    let nonzero: Vec<f64> = power
        .iter()
        .skip(1)
        .filter(|&&p| p > 0.0)
        .map(|&p| p / total)
        .collect();
    if nonzero.len() <= 1 {
        return 0.0;
    }

    let entropy: f64 = -nonzero.iter().map(|&p| p * p.log2()).sum::<f64>();
    entropy / (nonzero.len() as f64).log2()
}

/// Smallest bin frequency at which cumulative non-DC power reaches 85% of
/// the total; Nyquist when never reached, 0 for an all-zero spectrum.
pub fn spectral_rolloff(freqs: &[f64], power: &[f64]) -> f64 {
    let total = total_power(power);
    if total <= 0.0 {
        return 0.0;
    }

    let threshold = ROLLOFF_FRACTION * total;
    let mut cumulative = 0.0;
    for (&f, &p) in freqs.iter().zip(power.iter()).skip(1) {
        cumulative += p;
        if cumulative >= threshold {
            return f;
        }
    }
    freqs.last().copied().unwrap_or(0.0)
}
