use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::traits::*;
use ringbuf::{HeapCons, HeapProd, HeapRb};
use tracing::{error, info};

use crate::error::PlaybackError;

/// Connects to the default output device. The playback worker pushes
/// interleaved stereo frames into the returned producer; the CPAL callback
/// drains them, remapping to the device channel count.
pub struct AudioOutput {
    stream: Option<cpal::Stream>,
    pub config: cpal::StreamConfig,
}

impl AudioOutput {
    pub fn new(latency_ms: f32) -> Result<(Self, HeapProd<f32>), PlaybackError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| PlaybackError::AudioUnavailable("no output device".into()))?;

        let supported_config = device
            .default_output_config()
            .map_err(|e| PlaybackError::AudioUnavailable(e.to_string()))?;
        let sample_rate = supported_config.sample_rate().0;
        let channels = supported_config.channels();

        let config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let latency_frames = (sample_rate as f32 * latency_ms / 1000.0) as usize;
        let rb = HeapRb::<f32>::new(latency_frames.max(256) * 2 * 10);
        let (prod, mut cons): (HeapProd<f32>, HeapCons<f32>) = rb.split();

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let n_frames = data.len() / channels as usize;
                    for frame in 0..n_frames {
                        let l = cons.try_pop().unwrap_or(0.0);
                        let r = cons.try_pop().unwrap_or(0.0);
                        let base = frame * channels as usize;
                        match channels {
                            1 => data[base] = (l + r) * std::f32::consts::FRAC_1_SQRT_2,
                            _ => {
                                data[base] = l;
                                data[base + 1] = r;
                                for ch in 2..channels as usize {
                                    data[base + ch] = 0.0;
                                }
                            }
                        }
                    }
                },
                |err| error!("stream error: {err:?}"),
                None,
            )
            .map_err(|e| PlaybackError::AudioUnavailable(e.to_string()))?;
        stream
            .play()
            .map_err(|e| PlaybackError::AudioUnavailable(e.to_string()))?;

        info!(sample_rate, channels, "audio output started");

        Ok((
            Self {
                stream: Some(stream),
                config,
            },
            prod,
        ))
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Blocking push from the worker loop; spins briefly when the ring
    /// buffer is full so the callback can catch up.
    pub fn push_samples(prod: &mut HeapProd<f32>, samples: &[f32]) {
        let mut offset = 0;
        while offset < samples.len() {
            let written = prod.push_slice(&samples[offset..]);
            offset += written;
            if offset < samples.len() {
                std::thread::sleep(std::time::Duration::from_micros(200));
            }
        }
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.stream.take();
    }
}
