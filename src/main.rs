use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use spectone::audio::writer::WavOutput;
use spectone::cli::Args;
use spectone::config::AppConfig;
use spectone::core::cross::{analyze_cross, CrossAnalysisRequest};
use spectone::core::demo::demo_request;
use spectone::core::spectrum::{analyze, AnalysisRequest, SpectralAnalysisResult};
use spectone::core::timebase::Timebase;
use spectone::sonify::player::{Player, PlayerSettings};
use spectone::sonify::render::{SessionParams, SessionRenderer};

const DEFAULT_SESSION_SEC: f32 = 10.0;
const RENDER_HOP: usize = 512;

/// On-disk request shape: either `series` or the `series1`/`series2` pair.
#[derive(Debug, Deserialize)]
struct RequestFile {
    series: Option<Vec<f64>>,
    series1: Option<Vec<f64>>,
    series2: Option<Vec<f64>>,
    sample_rate: Option<f64>,
    n_peaks: Option<usize>,
}

fn read_input(path: Option<&str>) -> Result<String, std::io::Error> {
    match path {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(p) => std::fs::read_to_string(p),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = AppConfig::load_or_default(&args.config);

    // Cross-spectral input short-circuits: comparison output only.
    if !args.demo {
        let raw = read_input(args.input.as_deref())?;
        let file: RequestFile = serde_json::from_str(&raw)?;

        if let (Some(series1), Some(series2)) = (file.series1, file.series2) {
            let mut request = CrossAnalysisRequest::new(
                series1,
                series2,
                args.sample_rate.or(file.sample_rate).unwrap_or(1.0),
            );
            request.n_peaks = args.n_peaks.or(file.n_peaks).unwrap_or(config.analysis.n_peaks);
            let result = analyze_cross(&request)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if args.play.is_some() || args.wav.is_some() {
                warn!("cross-spectral comparison is not sonified, skipping --play/--wav");
            }
            return Ok(());
        }

        let series = file
            .series
            .ok_or("input must contain `series` or both `series1` and `series2`")?;
        let mut request = AnalysisRequest::new(
            series,
            args.sample_rate.or(file.sample_rate).unwrap_or(1.0),
        );
        request.n_peaks = args.n_peaks.or(file.n_peaks).unwrap_or(config.analysis.n_peaks);
        let result = analyze(&request)?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        sonify(&args, &config, &result)?;
        return Ok(());
    }

    let mut request = demo_request();
    if let Some(fs) = args.sample_rate {
        request.sample_rate = fs;
    }
    request.n_peaks = args.n_peaks.unwrap_or(config.analysis.n_peaks);
    let result = analyze(&request)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    sonify(&args, &config, &result)?;
    Ok(())
}

fn session_params(config: &AppConfig, duration_sec: f32) -> SessionParams {
    SessionParams {
        base_frequency: config.synth.base_frequency,
        duration_sec,
        attack_sec: config.synth.attack_sec,
        release_tail_sec: config.synth.release_tail_sec,
        master_gain: config.synth.master_gain,
    }
}

fn sonify(
    args: &Args,
    config: &AppConfig,
    result: &SpectralAnalysisResult,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &args.wav {
        render_wav(config, result, args.play.unwrap_or(DEFAULT_SESSION_SEC), path)?;
    }

    if let Some(duration_sec) = args.play {
        let settings = PlayerSettings {
            latency_ms: config.audio.latency_ms,
            stop_release_sec: config.synth.stop_release_sec,
            session: session_params(config, duration_sec),
        };
        let mut player = Player::new(settings);
        player.play(result, duration_sec)?;

        let interrupted = Arc::new(AtomicBool::new(false));
        {
            let interrupted = Arc::clone(&interrupted);
            ctrlc::set_handler(move || interrupted.store(true, Ordering::Release))?;
        }

        while player.is_playing() && !interrupted.load(Ordering::Acquire) {
            std::thread::sleep(std::time::Duration::from_millis(50));
        }
        player.stop();
    }
    Ok(())
}

/// Offline render: same renderer as live playback, paced only by the
/// writer thread draining the channel.
fn render_wav(
    config: &AppConfig,
    result: &SpectralAnalysisResult,
    duration_sec: f32,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let sample_rate = config.audio.sample_rate;
    let time = Timebase {
        fs: sample_rate as f32,
        hop: RENDER_HOP,
    };
    let mut renderer =
        SessionRenderer::new(result, time, session_params(config, duration_sec));

    let (tx, rx) = crossbeam_channel::bounded::<Vec<f32>>(16);
    let handle = WavOutput::run(rx, path.to_string(), sample_rate);

    while !renderer.all_done() {
        tx.send(renderer.render_hop())?;
    }
    drop(tx);
    if handle.join().is_err() {
        warn!("wav writer thread panicked");
    }
    info!(path, duration_sec, "wav render complete");
    Ok(())
}
