//! Frequency-to-audio mapping: fold data frequencies spanning many orders
//! of magnitude into one fixed 3-octave band, and turn power/phase into
//! bounded synthesis parameters.

use serde::{Deserialize, Serialize};

use crate::core::spectrum::{SpectralAnalysisResult, SpectralComponent};

/// Fixed low-frequency anchor so typical data periodicities (hours, days,
/// seasons) land in a musically useful band.
pub const REFERENCE_FREQ_HZ: f64 = 0.001;

/// Semitone span of the fold: exactly 3 octaves.
const FOLD_SEMITONES: f64 = 36.0;

pub const DEFAULT_BASE_FREQUENCY_HZ: f32 = 55.0;

/// Bounded synthesis parameters for one voice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralMapping {
    /// Hz, always in [base, base * 8).
    pub audio_frequency: f32,
    /// 0..1, square-root compressed with floor and ceiling.
    pub velocity: f32,
    /// -1..1.
    pub pan: f32,
    /// 0..100 ms attack offset.
    pub delay_ms: f32,
}

/// Fold a data frequency into `[base, base * 8)` on a logarithmic scale.
///
/// Linear mapping would be either inaudible or degenerate across
/// magnitude-spanning inputs; folding the semitone count modulo 36
/// preserves relative pitch ordering inside each span.
pub fn data_freq_to_audio_freq(data_freq: f64, base_frequency: f32) -> f32 {
    if data_freq <= 0.0 || !data_freq.is_finite() {
        return base_frequency;
    }
    let octaves = (data_freq / REFERENCE_FREQ_HZ).log2();
    let semitones = octaves * 12.0;
    let mut folded = semitones.rem_euclid(FOLD_SEMITONES);
    // rem_euclid can round up to the modulus for tiny negative inputs;
    // keep the result strictly below 36 semitones.
    if folded >= FOLD_SEMITONES {
        folded = 0.0;
    }
    base_frequency * (folded / 12.0).exp2() as f32
}

/// Square-root perceptual compression; the floor avoids silent voices, the
/// ceiling keeps a full bank of voices from clipping.
pub fn power_to_velocity(power_normalized: f64) -> f32 {
    (power_normalized.clamp(0.0, 1.0).sqrt() * 0.7 + 0.1) as f32
}

pub fn phase_to_pan(phase: f64) -> f32 {
    phase.sin() as f32
}

pub fn phase_to_delay_ms(phase: f64) -> f32 {
    (((phase + std::f64::consts::PI) / std::f64::consts::TAU) * 100.0) as f32
}

pub fn map_component(component: &SpectralComponent, base_frequency: f32) -> SpectralMapping {
    SpectralMapping {
        audio_frequency: data_freq_to_audio_freq(component.frequency, base_frequency),
        velocity: power_to_velocity(component.power_normalized),
        pan: phase_to_pan(component.phase),
        delay_ms: phase_to_delay_ms(component.phase),
    }
}

/// One mapping per ranked component, preserving component order.
pub fn map_result(result: &SpectralAnalysisResult, base_frequency: f32) -> Vec<SpectralMapping> {
    result
        .components
        .iter()
        .map(|c| map_component(c, base_frequency))
        .collect()
}
