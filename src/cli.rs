use clap::Parser;

/// Analyze a numeric series for periodicities and optionally sonify the
/// result. Input is a JSON object with `series` (or `series1`/`series2`
/// for cross-spectral analysis), read from a file or stdin.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Input JSON path, or "-" for stdin
    pub input: Option<String>,

    /// Analyze a built-in demo signal instead of reading input
    #[arg(long, default_value_t = false)]
    pub demo: bool,

    /// Play the sonification for this many seconds
    #[arg(long, value_name = "SECS")]
    pub play: Option<f32>,

    /// Render the sonification to a stereo WAV file
    #[arg(long, value_name = "PATH")]
    pub wav: Option<String>,

    /// Config file path
    #[arg(long, default_value = "spectone.toml")]
    pub config: String,

    /// Override the number of peaks to extract
    #[arg(long)]
    pub n_peaks: Option<usize>,

    /// Override the input sample rate in Hz
    #[arg(long)]
    pub sample_rate: Option<f64>,
}
