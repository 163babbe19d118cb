//! Offline-capable session renderer: owns the voice bank and the timbre
//! stage, and produces interleaved stereo hops on the tick clock. The
//! playback worker and the WAV export path both drive it the same way.

use std::f32::consts::FRAC_PI_4;

use tracing::debug;

use crate::core::spectrum::SpectralAnalysisResult;
use crate::core::timebase::{Tick, Timebase};
use crate::sonify::mapping::{self, SpectralMapping};
use crate::sonify::timbre::{TimbreParams, TimbreStage};
use crate::sonify::voice::{Voice, VoiceState, WAVEFORM_PALETTE};

#[derive(Clone, Copy, Debug)]
pub struct SessionParams {
    pub base_frequency: f32,
    pub duration_sec: f32,
    pub attack_sec: f32,
    pub release_tail_sec: f32,
    pub master_gain: f32,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            base_frequency: mapping::DEFAULT_BASE_FREQUENCY_HZ,
            duration_sec: 10.0,
            attack_sec: 0.05,
            release_tail_sec: 2.0,
            master_gain: 0.8,
        }
    }
}

/// Build one voice per ranked component: phase-derived delay offsets the
/// onset, the waveform palette cycles by rank.
pub fn build_voices(
    mappings: &[SpectralMapping],
    time: Timebase,
    params: &SessionParams,
) -> Vec<Voice> {
    let attack = time.sec_to_tick(params.attack_sec).max(1);
    let release = time.sec_to_tick(params.release_tail_sec).max(1);
    let hold_end = time.sec_to_tick(params.duration_sec);
    mappings
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let waveform = WAVEFORM_PALETTE[i % WAVEFORM_PALETTE.len()];
            let onset = time.ms_to_tick(m.delay_ms);
            Voice::new(waveform, *m, time, onset, hold_end, attack, release)
        })
        .collect()
}

pub struct SessionRenderer {
    time: Timebase,
    voices: Vec<Voice>,
    timbre: TimbreStage,
    master_gain: f32,
    mix_norm: f32,
    now: Tick,
}

impl SessionRenderer {
    pub fn new(result: &SpectralAnalysisResult, time: Timebase, params: SessionParams) -> Self {
        let mappings = mapping::map_result(result, params.base_frequency);
        let timbre_params = TimbreParams::from_metadata(&result.metadata);
        let voices = build_voices(&mappings, time, &params);
        debug!(
            voices = voices.len(),
            cutoff_hz = timbre_params.filter_cutoff_hz,
            "session renderer ready"
        );
        Self::from_voices(voices, timbre_params, time, params.master_gain)
    }

    pub fn from_voices(
        voices: Vec<Voice>,
        timbre_params: TimbreParams,
        time: Timebase,
        master_gain: f32,
    ) -> Self {
        // Equal-power headroom: a full bank at velocity ceiling stays < 1.
        let mix_norm = 1.0 / (voices.len().max(1) as f32).sqrt();
        Self {
            time,
            voices,
            timbre: TimbreStage::new(timbre_params, time.fs),
            master_gain,
            mix_norm,
            now: 0,
        }
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn timebase(&self) -> Timebase {
        self.time
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn voice_states(&self) -> Vec<VoiceState> {
        self.voices.iter().map(|v| v.state(self.now)).collect()
    }

    /// Render the next hop of interleaved stereo samples and advance the
    /// clock by one hop.
    pub fn render_hop(&mut self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.time.hop * 2);
        for _ in 0..self.time.hop {
            let mut frame = [0.0f32; 2];
            for voice in &mut self.voices {
                let sample = voice.render_tick(self.now);
                if sample != 0.0 {
                    // Equal-power pan law, pan -1..1 -> 0..pi/2.
                    let angle = (voice.mapping().pan + 1.0) * FRAC_PI_4;
                    frame[0] += sample * angle.cos();
                    frame[1] += sample * angle.sin();
                }
            }
            frame[0] *= self.master_gain * self.mix_norm;
            frame[1] *= self.master_gain * self.mix_norm;
            self.timbre.process_frame(&mut frame);
            out.push(frame[0]);
            out.push(frame[1]);
            self.now += 1;
        }
        out
    }

    /// Cut every voice to a short release starting now.
    pub fn release_all(&mut self, release_sec: f32) {
        let release_ticks = self.time.sec_to_tick(release_sec).max(1);
        for voice in &mut self.voices {
            voice.note_off(self.now, release_ticks);
        }
    }

    pub fn dispose_all(&mut self) {
        for voice in &mut self.voices {
            voice.dispose();
        }
    }

    /// True once every voice has finished its release tail.
    pub fn all_done(&self) -> bool {
        self.voices.iter().all(|v| v.is_done(self.now))
    }

    /// Last tick any voice can still sound; rendering past it yields
    /// silence (minus the comb tail, which decays on its own).
    pub fn end_tick(&self) -> Tick {
        self.voices.iter().map(|v| v.end_tick()).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::spectrum::{AnalysisRequest, analyze};

    fn timebase() -> Timebase {
        Timebase {
            fs: 8_000.0,
            hop: 256,
        }
    }

    fn two_tone_result() -> crate::core::spectrum::SpectralAnalysisResult {
        let fs = 10.0;
        let series: Vec<f64> = (0..400)
            .map(|i| {
                let t = i as f64 / fs;
                (std::f64::consts::TAU * 0.5 * t).sin()
                    + 0.5 * (std::f64::consts::TAU * 1.5 * t).sin()
            })
            .collect();
        analyze(&AnalysisRequest::new(series, fs)).unwrap()
    }

    fn short_params() -> SessionParams {
        SessionParams {
            duration_sec: 0.5,
            attack_sec: 0.01,
            release_tail_sec: 0.1,
            ..SessionParams::default()
        }
    }

    #[test]
    fn builds_one_voice_per_component() {
        let result = two_tone_result();
        let r = SessionRenderer::new(&result, timebase(), short_params());
        assert_eq!(r.voice_count(), result.components.len());
    }

    #[test]
    fn renders_nonsilent_bounded_audio() {
        let result = two_tone_result();
        let mut r = SessionRenderer::new(&result, timebase(), short_params());
        let mut peak = 0.0f32;
        // 0.7 s covers attack, sustain, and the full release tail.
        for _ in 0..22 {
            for s in r.render_hop() {
                assert!(s.is_finite());
                peak = peak.max(s.abs());
            }
        }
        assert!(peak > 0.01, "session rendered silence");
        assert!(peak <= 1.0, "clipped at {peak}");
        assert!(r.all_done());
    }

    #[test]
    fn release_all_finishes_early() {
        let result = two_tone_result();
        let params = SessionParams {
            duration_sec: 60.0,
            ..short_params()
        };
        let mut r = SessionRenderer::new(&result, timebase(), params);
        r.render_hop();
        r.release_all(0.01);
        // 0.01 s release fits in one 256-tick hop at 8 kHz.
        r.render_hop();
        assert!(r.all_done());
    }

    #[test]
    fn voices_idle_until_their_delay() {
        let result = two_tone_result();
        let r = SessionRenderer::new(&result, timebase(), short_params());
        // At tick 0 any voice with a nonzero delay reports Idle.
        let states = r.voice_states();
        assert_eq!(states.len(), r.voice_count());
        for s in states {
            assert!(matches!(s, VoiceState::Idle | VoiceState::Attacking));
        }
    }

    #[test]
    fn dispose_all_is_terminal() {
        let result = two_tone_result();
        let mut r = SessionRenderer::new(&result, timebase(), short_params());
        r.dispose_all();
        assert!(r.all_done());
        for s in r.voice_states() {
            assert_eq!(s, VoiceState::Disposed);
        }
        assert!(r.render_hop().iter().all(|s| *s == 0.0));
    }
}
