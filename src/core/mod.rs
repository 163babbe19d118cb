pub mod cross;
pub mod demo;
pub mod detrend;
pub mod fft;
pub mod peaks;
pub mod spectrum;
pub mod stats;
pub mod timebase;
pub mod window;
