use thiserror::Error;

/// Errors raised while validating or analyzing a time series.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("insufficient data: {provided} samples provided, {minimum} required")]
    InsufficientData { provided: usize, minimum: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Errors raised when starting playback. Analysis stays usable even when
/// no audio device is available.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("audio output unavailable: {0}")]
    AudioUnavailable(String),
}
