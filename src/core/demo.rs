//! Built-in synthetic signal so the pipeline can be exercised without data:
//! two sines plus a little noise.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::core::spectrum::AnalysisRequest;

const DEMO_N: usize = 1024;
const DEMO_FS: f64 = 100.0;
const DEMO_SEED: u64 = 0x5eed_cafe;

/// Deterministic demo request: 5 Hz and 12.5 Hz sines with weak noise,
/// sampled at 100 Hz.
pub fn demo_request() -> AnalysisRequest {
    let mut rng = SmallRng::seed_from_u64(DEMO_SEED);
    let series: Vec<f64> = (0..DEMO_N)
        .map(|i| {
            let t = i as f64 / DEMO_FS;
            let signal = (2.0 * std::f64::consts::PI * 5.0 * t).sin()
                + 0.6 * (2.0 * std::f64::consts::PI * 12.5 * t).sin();
            signal + 0.1 * (rng.gen::<f64>() * 2.0 - 1.0)
        })
        .collect();
    AnalysisRequest::new(series, DEMO_FS)
}
