//! Global timbre: one set of parameters per playback session, derived from
//! the aggregate spectral descriptors and never mutated by voices.

use serde::{Deserialize, Serialize};

use crate::core::spectrum::AnalysisMetadata;

const CUTOFF_FLOOR_HZ: f32 = 200.0;
const CUTOFF_CEIL_HZ: f32 = 4200.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimbreParams {
    /// Lowpass cutoff in Hz, brighter input -> higher cutoff.
    pub filter_cutoff_hz: f32,
    /// 0..0.6, noisier input -> wetter reverb.
    pub reverb_wet: f32,
    /// 0..0.3 drive blend.
    pub distortion: f32,
}

impl TimbreParams {
    pub fn from_metadata(metadata: &AnalysisMetadata) -> Self {
        let nyquist = metadata.sample_rate / 2.0;
        let brightness = if nyquist > 0.0 {
            (metadata.spectral_centroid / nyquist).clamp(0.0, 1.0) as f32
        } else {
            0.0
        };
        let entropy = metadata.spectral_entropy.clamp(0.0, 1.0) as f32;

        Self {
            filter_cutoff_hz: (CUTOFF_FLOOR_HZ + brightness * 4000.0)
                .clamp(CUTOFF_FLOOR_HZ, CUTOFF_CEIL_HZ),
            reverb_wet: entropy * 0.6,
            distortion: entropy * 0.3,
        }
    }
}

/// Per-session DSP state applying the timbre parameters to the stereo mix:
/// gentle drive blend, one-pole lowpass, and a single comb per channel.
pub struct TimbreStage {
    params: TimbreParams,
    lp_alpha: f32,
    lp: [f32; 2],
    comb: [Vec<f32>; 2],
    comb_pos: [usize; 2],
}

const COMB_FEEDBACK: f32 = 0.5;
// Different prime-ish delays per channel avoid a metallic mono tail.
const COMB_DELAY_SEC: [f32; 2] = [0.0731, 0.0797];

impl TimbreStage {
    pub fn new(params: TimbreParams, fs: f32) -> Self {
        let lp_alpha =
            1.0 - (-std::f32::consts::TAU * params.filter_cutoff_hz / fs.max(1.0)).exp();
        let comb = COMB_DELAY_SEC.map(|d| {
            let len = ((d * fs) as usize).max(1);
            vec![0.0f32; len]
        });
        Self {
            params,
            lp_alpha: lp_alpha.clamp(0.0, 1.0),
            lp: [0.0; 2],
            comb,
            comb_pos: [0; 2],
        }
    }

    pub fn params(&self) -> TimbreParams {
        self.params
    }

    /// Process one stereo frame in place.
    pub fn process_frame(&mut self, frame: &mut [f32; 2]) {
        for ch in 0..2 {
            let dry = frame[ch];

            // Drive blend: identity at distortion 0, bounded tanh otherwise.
            let dist = self.params.distortion;
            let driven = dry * (1.0 - dist) + dist * (3.0 * dry).tanh();

            // One-pole lowpass.
            self.lp[ch] += self.lp_alpha * (driven - self.lp[ch]);
            let filtered = self.lp[ch];

            // Feedback comb, wet/dry mixed by entropy.
            let wet = self.params.reverb_wet;
            let pos = self.comb_pos[ch];
            let delayed = self.comb[ch][pos];
            self.comb[ch][pos] = filtered + delayed * COMB_FEEDBACK;
            self.comb_pos[ch] = (pos + 1) % self.comb[ch].len();

            frame[ch] = filtered * (1.0 - wet) + delayed * wet;
        }
    }
}
