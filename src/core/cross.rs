//! Cross-spectral analysis of two equal-length series: shared periodicities
//! and the phase lag between them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::detrend::detrend;
use crate::core::fft::{bin_freqs, half_spectrum};
use crate::core::peaks::extract_peaks;
use crate::core::spectrum::{DEFAULT_N_PEAKS, MIN_SAMPLES};
use crate::core::window::apply_hann_window;
use crate::error::AnalysisError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossAnalysisRequest {
    pub series1: Vec<f64>,
    pub series2: Vec<f64>,
    #[serde(default = "CrossAnalysisRequest::default_sample_rate")]
    pub sample_rate: f64,
    #[serde(default = "CrossAnalysisRequest::default_n_peaks")]
    pub n_peaks: usize,
}

impl CrossAnalysisRequest {
    fn default_sample_rate() -> f64 {
        1.0
    }

    fn default_n_peaks() -> usize {
        DEFAULT_N_PEAKS
    }

    pub fn new(series1: Vec<f64>, series2: Vec<f64>, sample_rate: f64) -> Self {
        Self {
            series1,
            series2,
            sample_rate,
            n_peaks: Self::default_n_peaks(),
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (name, series) in [("series1", &self.series1), ("series2", &self.series2)] {
            if series.len() < MIN_SAMPLES {
                return Err(AnalysisError::InsufficientData {
                    provided: series.len(),
                    minimum: MIN_SAMPLES,
                });
            }
            if series.iter().any(|v| !v.is_finite()) {
                return Err(AnalysisError::InvalidParameter(format!(
                    "{name} contains non-finite values"
                )));
            }
        }
        if self.series1.len() != self.series2.len() {
            return Err(AnalysisError::InvalidParameter(format!(
                "series length mismatch: {} vs {}",
                self.series1.len(),
                self.series2.len()
            )));
        }
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "sample_rate must be a positive finite number, got {}",
                self.sample_rate
            )));
        }
        if self.n_peaks < 1 {
            return Err(AnalysisError::InvalidParameter(
                "n_peaks must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// One frequency the two series share. Positive `lag_seconds` means
/// series1 leads series2 at this frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossComponent {
    pub frequency: f64,
    pub cross_power: f64,
    pub cross_power_normalized: f64,
    /// arg(X·conj(Y)) in (-π, π].
    pub phase_lag: f64,
    pub lag_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossMetadata {
    pub n_samples: usize,
    pub sample_rate: f64,
    pub total_cross_power: f64,
    /// Cross-power-weighted mean of the per-component lags.
    pub mean_lag_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossSpectrumResult {
    pub components: Vec<CrossComponent>,
    pub metadata: CrossMetadata,
}

/// Detrend and window both series, transform each, and rank the bins of the
/// cross-power magnitude `|X[k]·conj(Y[k])|/n`.
pub fn analyze_cross(
    request: &CrossAnalysisRequest,
) -> Result<CrossSpectrumResult, AnalysisError> {
    request.validate()?;

    let n = request.series1.len();
    let fs = request.sample_rate;

    let mut a = detrend(&request.series1);
    let mut b = detrend(&request.series2);
    apply_hann_window(&mut a);
    apply_hann_window(&mut b);

    let spec_a = half_spectrum(&a);
    let spec_b = half_spectrum(&b);

    let cross: Vec<rustfft::num_complex::Complex64> = spec_a
        .iter()
        .zip(spec_b.iter())
        .map(|(x, y)| x * y.conj() / n as f64)
        .collect();
    let cross_power: Vec<f64> = cross.iter().map(|z| z.norm()).collect();
    let frequencies = bin_freqs(fs, n);

    let max_non_dc = cross_power.iter().skip(1).copied().fold(0.0f64, f64::max);
    let components: Vec<CrossComponent> = extract_peaks(&cross_power, request.n_peaks)
        .into_iter()
        .map(|peak| {
            let frequency = frequencies[peak.bin];
            let phase_lag = cross[peak.bin].im.atan2(cross[peak.bin].re);
            CrossComponent {
                frequency,
                cross_power: peak.power,
                cross_power_normalized: if max_non_dc > 0.0 {
                    peak.power / max_non_dc
                } else {
                    0.0
                },
                phase_lag,
                lag_seconds: if frequency > 0.0 {
                    phase_lag / (2.0 * std::f64::consts::PI * frequency)
                } else {
                    0.0
                },
            }
        })
        .collect();

    let total_cross_power: f64 = cross_power.iter().skip(1).sum();
    let weighted_lag: f64 = components
        .iter()
        .map(|c| c.lag_seconds * c.cross_power)
        .sum();
    let weight: f64 = components.iter().map(|c| c.cross_power).sum();

    let metadata = CrossMetadata {
        n_samples: n,
        sample_rate: fs,
        total_cross_power,
        mean_lag_seconds: if weight > 0.0 { weighted_lag / weight } else { 0.0 },
    };

    debug!(
        n_samples = n,
        components = components.len(),
        mean_lag = metadata.mean_lag_seconds,
        "cross-spectral analysis complete"
    );

    Ok(CrossSpectrumResult {
        components,
        metadata,
    })
}
