//! Single-series spectral analysis: the pure, deterministic half of the
//! engine. `analyze` turns a validated time series into ranked dominant
//! components plus aggregate descriptors; nothing here touches shared state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::detrend::detrend;
use crate::core::fft::{bin_freqs, half_spectrum};
use crate::core::peaks::extract_peaks;
use crate::core::stats;
use crate::core::window::apply_hann_window;
use crate::error::AnalysisError;

/// Fewest samples a transform of any use can be built from.
pub const MIN_SAMPLES: usize = 4;

pub const DEFAULT_N_PEAKS: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub series: Vec<f64>,
    #[serde(default = "AnalysisRequest::default_sample_rate")]
    pub sample_rate: f64,
    #[serde(default = "AnalysisRequest::default_n_peaks")]
    pub n_peaks: usize,
}

impl AnalysisRequest {
    fn default_sample_rate() -> f64 {
        1.0
    }

    fn default_n_peaks() -> usize {
        DEFAULT_N_PEAKS
    }

    pub fn new(series: Vec<f64>, sample_rate: f64) -> Self {
        Self {
            series,
            sample_rate,
            n_peaks: Self::default_n_peaks(),
        }
    }

    pub fn with_n_peaks(mut self, n_peaks: usize) -> Self {
        self.n_peaks = n_peaks;
        self
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.series.len() < MIN_SAMPLES {
            return Err(AnalysisError::InsufficientData {
                provided: self.series.len(),
                minimum: MIN_SAMPLES,
            });
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
        if self.series.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::InvalidParameter(
                "series must contain only finite values".into(),
            ));
        }
        Ok(())
    }
}

/// One dominant periodicity of the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectralComponent {
    /// Hz, always in [0, sample_rate/2].
    pub frequency: f64,
    /// Raw single-sided power |X[k]|²/n.
    pub power: f64,
    /// Power relative to the strongest non-DC bin, in [0, 1].
    pub power_normalized: f64,
    /// Radians in (-π, π].
    pub phase: f64,
    /// 1/frequency; infinite at zero frequency.
    pub period: f64,
}

/// The full single-sided spectrum, `n/2 + 1` bins per array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullSpectrum {
    pub frequencies: Vec<f64>,
    pub power: Vec<f64>,
    pub phase: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub n_samples: usize,
    pub sample_rate: f64,
    pub spectral_centroid: f64,
    /// Normalized disorder of the power distribution, in [0, 1].
    pub spectral_entropy: f64,
    pub spectral_rolloff: f64,
    pub total_power: f64,
}

/// Immutable result of one `analyze` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectralAnalysisResult {
    /// Sorted by descending power, ties by ascending bin index.
    pub components: Vec<SpectralComponent>,
    pub full_spectrum: FullSpectrum,
    pub metadata: AnalysisMetadata,
}

/// Detrend, window, transform, then extract peaks and descriptors.
///
/// Pure and synchronous; identical input yields identical output. Constant
/// or zero-variance input degrades cleanly to an all-zero result, never to
/// NaN or infinity.
pub fn analyze(request: &AnalysisRequest) -> Result<SpectralAnalysisResult, AnalysisError> {
    request.validate()?;

    let n = request.series.len();
    let fs = request.sample_rate;

    let mut work = detrend(&request.series);
    apply_hann_window(&mut work);
    let spec = half_spectrum(&work);

    let frequencies = bin_freqs(fs, n);
    let power: Vec<f64> = spec.iter().map(|z| z.norm_sqr() / n as f64).collect();
    let phase: Vec<f64> = spec.iter().map(|z| z.im.atan2(z.re)).collect();

    let max_non_dc = power.iter().skip(1).copied().fold(0.0f64, f64::max);
    let components: Vec<SpectralComponent> = extract_peaks(&power, request.n_peaks)
        .into_iter()
        .map(|peak| {
            let frequency = frequencies[peak.bin];
            SpectralComponent {
                frequency,
                power: peak.power,
                power_normalized: if max_non_dc > 0.0 {
                    peak.power / max_non_dc
                } else {
                    0.0
                },
                phase: phase[peak.bin],
                period: if frequency > 0.0 {
                    1.0 / frequency
                } else {
                    f64::INFINITY
                },
            }
        })
        .collect();

    let metadata = AnalysisMetadata {
        n_samples: n,
        sample_rate: fs,
        spectral_centroid: stats::spectral_centroid(&frequencies, &power),
        spectral_entropy: stats::spectral_entropy(&power),
        spectral_rolloff: stats::spectral_rolloff(&frequencies, &power),
        total_power: stats::total_power(&power),
    };

    debug!(
        n_samples = n,
        components = components.len(),
        centroid = metadata.spectral_centroid,
        entropy = metadata.spectral_entropy,
        "spectral analysis complete"
    );

    Ok(SpectralAnalysisResult {
        components,
        full_spectrum: FullSpectrum {
            frequencies,
            power,
            phase,
        },
        metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / fs).sin())
            .collect()
    }

    #[test]
    fn rejects_short_series() {
        let req = AnalysisRequest::new(vec![1.0, 2.0, 3.0], 1.0);
        assert_eq!(
            analyze(&req).unwrap_err(),
            AnalysisError::InsufficientData {
                provided: 3,
                minimum: 4
            }
        );
    }

    #[test]
    fn rejects_bad_sample_rate() {
        for fs in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let req = AnalysisRequest::new(vec![1.0; 8], fs);
            assert!(matches!(
                analyze(&req),
                Err(AnalysisError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn rejects_zero_peaks() {
        let req = AnalysisRequest::new(vec![1.0; 8], 1.0).with_n_peaks(0);
        assert!(matches!(
            analyze(&req),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn sine_dominant_within_one_bin() {
        let req = AnalysisRequest::new(sine(0.1, 1.0, 100), 1.0);
        let result = analyze(&req).unwrap();

        let top = &result.components[0];
        assert!(
            (top.frequency - 0.1).abs() <= 0.01,
            "dominant at {}",
            top.frequency
        );
        assert!((top.power_normalized - 1.0).abs() < 1e-9);
        assert!(
            result.metadata.spectral_entropy < 0.35,
            "entropy {}",
            result.metadata.spectral_entropy
        );
    }

    #[test]
    fn centroid_tracks_sine_frequency() {
        let req = AnalysisRequest::new(sine(0.2, 1.0, 200), 1.0);
        let result = analyze(&req).unwrap();
        let bin_width = 1.0 / 200.0;
        assert!(
            (result.metadata.spectral_centroid - 0.2).abs() <= 2.0 * bin_width,
            "centroid {}",
            result.metadata.spectral_centroid
        );
    }

    #[test]
    fn constant_input_degrades_cleanly() {
        let req = AnalysisRequest::new(vec![5.0; 8], 1.0);
        let result = analyze(&req).unwrap();

        assert_eq!(result.metadata.total_power, 0.0);
        assert_eq!(result.metadata.spectral_centroid, 0.0);
        assert_eq!(result.metadata.spectral_entropy, 0.0);
        assert_eq!(result.metadata.spectral_rolloff, 0.0);

        for c in &result.components {
            assert_eq!(c.power, 0.0);
            assert_eq!(c.power_normalized, 0.0);
        }
        let all = result
            .full_spectrum
            .power
            .iter()
            .chain(result.full_spectrum.phase.iter())
            .chain(result.full_spectrum.frequencies.iter());
        assert!(all.clone().all(|v| v.is_finite()));
    }

    #[test]
    fn component_count_and_frequency_bounds() {
        let req = AnalysisRequest::new(
            vec![1.2, 3.4, 2.1, 4.5, 3.2, 1.8, 4.0, 2.6],
            1.0,
        )
        .with_n_peaks(4);
        let result = analyze(&req).unwrap();

        assert!(result.components.len() <= 4);
        assert!(result
            .components
            .iter()
            .all(|c| (0.0..=0.5).contains(&c.frequency)));
        assert!(result.metadata.total_power > 0.0);
    }

    #[test]
    fn components_sorted_by_descending_power() {
        let series: Vec<f64> = (0..256)
            .map(|i| {
                let t = i as f64;
                (2.0 * PI * 0.05 * t).sin() + 0.4 * (2.0 * PI * 0.17 * t).sin()
            })
            .collect();
        let result = analyze(&AnalysisRequest::new(series, 1.0)).unwrap();
        for pair in result.components.windows(2) {
            assert!(pair[0].power >= pair[1].power);
        }
    }

    #[test]
    fn analyze_is_idempotent() {
        let req = AnalysisRequest::new(sine(0.07, 1.0, 128), 1.0);
        let a = analyze(&req).unwrap();
        let b = analyze(&req).unwrap();
        assert_eq!(a.full_spectrum.power, b.full_spectrum.power);
        assert_eq!(a.metadata.spectral_entropy, b.metadata.spectral_entropy);
        assert_eq!(a.components.len(), b.components.len());
        for (x, y) in a.components.iter().zip(b.components.iter()) {
            assert_eq!(x.frequency, y.frequency);
            assert_eq!(x.power, y.power);
        }
    }

    #[test]
    fn full_spectrum_has_half_plus_one_bins() {
        for n in [4usize, 9, 100, 255] {
            let req = AnalysisRequest::new(sine(0.1, 1.0, n), 1.0);
            let result = analyze(&req).unwrap();
            assert_eq!(result.full_spectrum.frequencies.len(), n / 2 + 1);
            assert_eq!(result.full_spectrum.power.len(), n / 2 + 1);
            assert_eq!(result.full_spectrum.phase.len(), n / 2 + 1);
        }
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let req: AnalysisRequest =
            serde_json::from_str(r#"{"series": [1.0, 2.0, 3.0, 4.0]}"#).unwrap();
        assert_eq!(req.sample_rate, 1.0);
        assert_eq!(req.n_peaks, DEFAULT_N_PEAKS);
    }
}
