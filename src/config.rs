use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::sonify::mapping::DEFAULT_BASE_FREQUENCY_HZ;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "AudioConfig::default_latency_ms")]
    pub latency_ms: f32,
    #[serde(default = "AudioConfig::default_sample_rate")]
    pub sample_rate: u32,
}

impl AudioConfig {
    fn default_latency_ms() -> f32 {
        150.0
    }
    fn default_sample_rate() -> u32 {
        48_000
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            latency_ms: Self::default_latency_ms(),
            sample_rate: Self::default_sample_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthConfig {
    #[serde(default = "SynthConfig::default_base_frequency")]
    pub base_frequency: f32,
    #[serde(default = "SynthConfig::default_attack_sec")]
    pub attack_sec: f32,
    /// Natural decay after a session's hold phase ends.
    #[serde(default = "SynthConfig::default_release_tail_sec")]
    pub release_tail_sec: f32,
    /// Shorter tail used when playback is cut off by stop.
    #[serde(default = "SynthConfig::default_stop_release_sec")]
    pub stop_release_sec: f32,
    #[serde(default = "SynthConfig::default_master_gain")]
    pub master_gain: f32,
}

impl SynthConfig {
    fn default_base_frequency() -> f32 {
        DEFAULT_BASE_FREQUENCY_HZ
    }
    fn default_attack_sec() -> f32 {
        0.05
    }
    fn default_release_tail_sec() -> f32 {
        2.0
    }
    fn default_stop_release_sec() -> f32 {
        0.1
    }
    fn default_master_gain() -> f32 {
        0.8
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            base_frequency: Self::default_base_frequency(),
            attack_sec: Self::default_attack_sec(),
            release_tail_sec: Self::default_release_tail_sec(),
            stop_release_sec: Self::default_stop_release_sec(),
            master_gain: Self::default_master_gain(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "AnalysisConfig::default_n_peaks")]
    pub n_peaks: usize,
}

impl AnalysisConfig {
    fn default_n_peaks() -> usize {
        crate::core::spectrum::DEFAULT_N_PEAKS
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            n_peaks: Self::default_n_peaks(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub synth: SynthConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    /// Load a TOML config; a missing, unreadable, or unparsable file falls
    /// back to the built-in defaults.
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if !path_obj.exists() {
            return Self::default();
        }
        match fs::read_to_string(path_obj) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("failed to parse config {path}: {err}, using defaults");
                    Self::default()
                }
            },
            Err(err) => {
                warn!("failed to read config {path}: {err}, using defaults");
                Self::default()
            }
        }
    }
}
