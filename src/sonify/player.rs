//! Live playback: a worker thread paces the session renderer against the
//! wall clock and feeds the audio ring buffer. At most one session exists
//! at a time; starting a new one retires the previous one first.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use ringbuf::HeapProd;
use tracing::{debug, info, warn};

use crate::audio::output::AudioOutput;
use crate::core::spectrum::SpectralAnalysisResult;
use crate::core::timebase::Timebase;
use crate::error::PlaybackError;
use crate::sonify::render::{SessionParams, SessionRenderer};

const WORKER_HOP: usize = 512;

#[derive(Clone, Copy, Debug)]
pub struct PlayerSettings {
    pub latency_ms: f32,
    /// Release applied when a session is cut short by `stop()`.
    pub stop_release_sec: f32,
    pub session: SessionParams,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            latency_ms: 150.0,
            stop_release_sec: 0.1,
            session: SessionParams::default(),
        }
    }
}

struct ActiveSession {
    stop: Arc<AtomicBool>,
    done: Arc<AtomicBool>,
    handle: JoinHandle<()>,
    // The CPAL stream must stay on this thread; dropping it closes it.
    _audio: AudioOutput,
}

pub struct Player {
    settings: PlayerSettings,
    active: Option<ActiveSession>,
}

impl Player {
    pub fn new(settings: PlayerSettings) -> Self {
        Self {
            settings,
            active: None,
        }
    }

    /// Start sonifying `result` for `duration_sec`. Any session still
    /// running is stopped first.
    pub fn play(
        &mut self,
        result: &SpectralAnalysisResult,
        duration_sec: f32,
    ) -> Result<(), PlaybackError> {
        self.stop();

        if result.components.is_empty() {
            warn!("nothing to sonify: analysis produced no components");
            return Ok(());
        }

        let (audio, mut prod) = AudioOutput::new(self.settings.latency_ms)?;
        let time = Timebase {
            fs: audio.sample_rate() as f32,
            hop: WORKER_HOP,
        };
        let params = SessionParams {
            duration_sec,
            ..self.settings.session
        };
        let mut renderer = SessionRenderer::new(result, time, params);

        let stop = Arc::new(AtomicBool::new(false));
        let done = Arc::new(AtomicBool::new(false));
        let stop_release_sec = self.settings.stop_release_sec;

        let handle = {
            let stop = Arc::clone(&stop);
            let done = Arc::clone(&done);
            std::thread::Builder::new()
                .name("sonify-worker".into())
                .spawn(move || {
                    worker_loop(&mut renderer, &mut prod, &stop, stop_release_sec);
                    done.store(true, Ordering::Release);
                })
                .map_err(|e| PlaybackError::AudioUnavailable(e.to_string()))?
        };

        info!(
            voices = result.components.len(),
            duration_sec, "playback session started"
        );
        self.active = Some(ActiveSession {
            stop,
            done,
            handle,
            _audio: audio,
        });
        Ok(())
    }

    /// Stop the current session, waiting out its short release tail.
    /// Safe to call with nothing playing.
    pub fn stop(&mut self) {
        if let Some(session) = self.active.take() {
            session.stop.store(true, Ordering::Release);
            if session.handle.join().is_err() {
                warn!("playback worker panicked");
            }
            debug!("playback session stopped");
        }
    }

    pub fn is_playing(&self) -> bool {
        self.active
            .as_ref()
            .map(|s| !s.done.load(Ordering::Acquire))
            .unwrap_or(false)
    }

    /// Block until the current session finishes on its own or `stop` is
    /// requested externally.
    pub fn wait(&mut self) {
        if let Some(session) = self.active.take() {
            if session.handle.join().is_err() {
                warn!("playback worker panicked");
            }
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Paces rendering against the wall clock: one hop per deadline, sleeping
/// off the slack. On a stop request the voices get a short release and the
/// tail is rendered out before the thread exits.
fn worker_loop(
    renderer: &mut SessionRenderer,
    prod: &mut HeapProd<f32>,
    stop: &AtomicBool,
    stop_release_sec: f32,
) {
    let hop_duration = renderer.timebase().hop_duration();
    let mut next_deadline = Instant::now();
    let mut releasing = false;

    loop {
        if stop.load(Ordering::Acquire) && !releasing {
            renderer.release_all(stop_release_sec);
            releasing = true;
        }

        let samples = renderer.render_hop();
        AudioOutput::push_samples(prod, &samples);

        if renderer.all_done() {
            renderer.dispose_all();
            break;
        }

        next_deadline += hop_duration;
        let now = Instant::now();
        if next_deadline > now {
            std::thread::sleep(next_deadline - now);
        }
    }
    debug!("playback worker finished");
}
