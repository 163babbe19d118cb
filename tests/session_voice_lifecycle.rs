use spectone::core::spectrum::{analyze, AnalysisRequest};
use spectone::core::timebase::Timebase;
use spectone::sonify::render::{SessionParams, SessionRenderer};
use spectone::sonify::voice::VoiceState;

fn result() -> spectone::core::spectrum::SpectralAnalysisResult {
    let fs = 10.0;
    let series: Vec<f64> = (0..500)
        .map(|i| {
            let t = i as f64 / fs;
            (std::f64::consts::TAU * 0.5 * t).sin() + 0.5 * (std::f64::consts::TAU * 1.2 * t).sin()
        })
        .collect();
    analyze(&AnalysisRequest::new(series, fs)).unwrap()
}

fn renderer(duration_sec: f32) -> SessionRenderer {
    let time = Timebase {
        fs: 4_000.0,
        hop: 200,
    };
    let params = SessionParams {
        duration_sec,
        attack_sec: 0.02,
        release_tail_sec: 0.2,
        ..SessionParams::default()
    };
    SessionRenderer::new(&result(), time, params)
}

#[test]
fn voices_progress_to_disposed_and_session_ends() {
    let mut r = renderer(0.5);
    // duration 0.5 s + tail 0.2 s = 2_800 ticks; render 1 s worth.
    for _ in 0..20 {
        r.render_hop();
    }
    assert!(r.all_done());
    for state in r.voice_states() {
        assert_eq!(state, VoiceState::Disposed);
    }
}

#[test]
fn mid_session_voices_are_sounding() {
    let mut r = renderer(2.0);
    // 0.5 s in: past every delay (max 100 ms) and attack.
    for _ in 0..10 {
        r.render_hop();
    }
    for state in r.voice_states() {
        assert!(matches!(
            state,
            VoiceState::Attacking | VoiceState::Sustaining
        ));
    }
    assert!(!r.all_done());
}

#[test]
fn released_session_finishes_quickly() {
    let mut r = renderer(60.0);
    for _ in 0..10 {
        r.render_hop();
    }
    r.release_all(0.05);
    r.render_hop();
    assert!(r.all_done());
}

#[test]
fn sessions_are_independent() {
    let mut first = renderer(0.5);
    for _ in 0..20 {
        first.render_hop();
    }
    assert!(first.all_done());

    // A fresh session starts from tick zero regardless of the first.
    let second = renderer(0.5);
    assert_eq!(second.now(), 0);
    assert!(!second.all_done());
    for state in second.voice_states() {
        assert!(matches!(state, VoiceState::Idle | VoiceState::Attacking));
    }
}
