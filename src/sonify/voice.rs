//! One scheduled oscillator voice: Idle until its delayed onset, then
//! attack, sustain, release, and finally disposal. Voices own all of their
//! state; the renderer drives them tick by tick.

use crate::core::timebase::{Tick, Timebase};
use crate::sonify::mapping::SpectralMapping;

/// Small fixed palette, assigned round-robin for timbral variety.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
    Square,
}

pub const WAVEFORM_PALETTE: [Waveform; 4] = [
    Waveform::Sine,
    Waveform::Triangle,
    Waveform::Sawtooth,
    Waveform::Square,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceState {
    Idle,
    Attacking,
    Sustaining,
    Releasing,
    Disposed,
}

pub struct Voice {
    waveform: Waveform,
    mapping: SpectralMapping,
    onset: Tick,
    attack_ticks: Tick,
    hold_end: Tick,
    release_ticks: Tick,
    release_end: Tick,
    phase: f32,
    phase_inc: f32,
    disposed: bool,
}

impl Voice {
    /// Schedule a voice: attack at `onset` (t0 + mapped delay), automatic
    /// release at `hold_end`, disposal `release_ticks` later (decay tail).
    pub fn new(
        waveform: Waveform,
        mapping: SpectralMapping,
        time: Timebase,
        onset: Tick,
        hold_end: Tick,
        attack_ticks: Tick,
        release_ticks: Tick,
    ) -> Self {
        let hold_end = hold_end.max(onset.saturating_add(1));
        Self {
            waveform,
            mapping,
            onset,
            attack_ticks: attack_ticks.max(1),
            hold_end,
            release_ticks: release_ticks.max(1),
            release_end: hold_end.saturating_add(release_ticks.max(1)),
            phase: 0.0,
            phase_inc: mapping.audio_frequency / time.fs,
            disposed: false,
        }
    }

    pub fn mapping(&self) -> &SpectralMapping {
        &self.mapping
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn state(&self, now: Tick) -> VoiceState {
        if self.disposed {
            return VoiceState::Disposed;
        }
        if now < self.onset {
            VoiceState::Idle
        } else if now < self.onset.saturating_add(self.attack_ticks.min(self.hold_end - self.onset))
        {
            VoiceState::Attacking
        } else if now < self.hold_end {
            VoiceState::Sustaining
        } else if now < self.release_end {
            VoiceState::Releasing
        } else {
            VoiceState::Disposed
        }
    }

    /// Begin releasing at `tick` with a (usually shorter) tail. Used by
    /// `stop()`; a no-op when the voice is already past its hold phase.
    pub fn note_off(&mut self, tick: Tick, release_ticks: Tick) {
        if tick < self.hold_end {
            self.hold_end = tick.max(self.onset);
            self.release_ticks = release_ticks.max(1);
            self.release_end = self.hold_end.saturating_add(self.release_ticks);
        }
    }

    /// Mark the voice fully retired. Idempotent.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    pub fn is_done(&self, now: Tick) -> bool {
        self.disposed || now >= self.release_end
    }

    pub fn end_tick(&self) -> Tick {
        self.release_end
    }

    /// Render one mono sample at `tick`, advancing the oscillator phase
    /// only while audible.
    pub fn render_tick(&mut self, tick: Tick) -> f32 {
        let gain = self.gain_at(tick);
        if gain <= 0.0 {
            return 0.0;
        }

        self.phase = (self.phase + self.phase_inc).fract();
        let sample = match self.waveform {
            Waveform::Sine => (self.phase * std::f32::consts::TAU).sin(),
            Waveform::Triangle => 4.0 * (self.phase - 0.5).abs() - 1.0,
            Waveform::Sawtooth => 2.0 * self.phase - 1.0,
            Waveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        };
        sample * self.mapping.velocity * gain
    }

    fn gain_at(&self, tick: Tick) -> f32 {
        if self.disposed || tick < self.onset || tick >= self.release_end {
            return 0.0;
        }

        let duration = self.hold_end.saturating_sub(self.onset).max(1);
        let pos = tick.saturating_sub(self.onset);
        let attack_len = self.attack_ticks.min(duration);
        let attack = if pos < attack_len {
            (pos.saturating_add(1) as f32 / attack_len as f32).clamp(0.0, 1.0)
        } else {
            1.0
        };

        let release = if tick >= self.hold_end {
            let remain = self.release_end.saturating_sub(tick);
            (remain as f32 / self.release_ticks as f32).clamp(0.0, 1.0)
        } else {
            1.0
        };

        (attack * release).clamp(0.0, 1.0)
    }
}
