//! Noise generators built by spectral synthesis.
//!
//! [`SpectralNoise`] synthesizes each block in the frequency domain with a
//! pluggable spectrum shaper; [`ColoredNoise`] is its `1/f^exponent`
//! specialization.

mod colored;
mod spectral;

pub use colored::ColoredNoise;
pub use spectral::{SpectralNoise, SpectrumShaper};
