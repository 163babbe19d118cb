use crossbeam_channel::Receiver;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::error;

/// Stereo 16-bit WAV sink fed hop-sized chunks over a channel; the writer
/// thread exits when the sender side is dropped.
pub struct WavOutput;

impl WavOutput {
    pub fn run(
        rx: Receiver<Vec<f32>>,
        path: String,
        sample_rate: u32,
    ) -> std::thread::JoinHandle<()> {
        std::thread::spawn(move || {
            let spec = WavSpec {
                channels: 2,
                sample_rate,
                bits_per_sample: 16,
                sample_format: SampleFormat::Int,
            };
            let mut writer = match WavWriter::create(&path, spec) {
                Ok(w) => w,
                Err(e) => {
                    error!("create {path}: {e}");
                    return;
                }
            };

            while let Ok(samples) = rx.recv() {
                for &s in samples.iter() {
                    let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                    if let Err(e) = writer.write_sample(v) {
                        error!("write {path}: {e}");
                        return;
                    }
                }
            }

            if let Err(e) = writer.finalize() {
                error!("finalize {path}: {e}");
            }
        })
    }
}
