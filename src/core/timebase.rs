pub type Tick = u64;

/// Sample-accurate clock for the playback worker: ticks are output samples.
#[derive(Clone, Copy, Debug)]
pub struct Timebase {
    pub fs: f32,
    pub hop: usize,
}

impl Timebase {
    pub fn tick_to_sec(&self, t: Tick) -> f32 {
        t as f32 / self.fs
    }

    pub fn sec_to_tick(&self, s: f32) -> Tick {
        if s <= 0.0 || !s.is_finite() {
            return 0;
        }
        (s as f64 * self.fs as f64).round() as Tick
    }

    pub fn ms_to_tick(&self, ms: f32) -> Tick {
        self.sec_to_tick(ms / 1000.0)
    }

    pub fn hop_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.hop as f64 / self.fs as f64)
    }
}
