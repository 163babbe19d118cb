//! Spectral analysis and sonification of arbitrary numeric series.
//!
//! The `core` modules turn a raw series into ranked spectral components
//! plus summary statistics; the `sonify` modules map those components into
//! audible voices and play or render them; `audio` holds the device and
//! file backends.

pub mod audio;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod sonify;
