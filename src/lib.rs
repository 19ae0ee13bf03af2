//! Murmur - streaming signal generators for continuous playback
//!
//! This library synthesizes single-channel audio in fixed-size `f32` blocks:
//! colored noise shaped in the frequency domain, pulse trains with jittered
//! spacing, phase-continuous sine tones, and gated combinations of the
//! three. An external playback sink drives a generator by calling
//! [`SampleGenerator::next_buffer`] once per block period.
//!
//! # Examples
//!
//! ```
//! use murmur::{ColoredNoise, Product, PulseTrain, SampleGenerator};
//!
//! // Red noise gated by a jittered pulse envelope.
//! let noise = ColoredNoise::new(1024, 44100, 2.0, 128).unwrap();
//! let gate = PulseTrain::new(1024, 44100, 50.0, 20.0).unwrap();
//! let mut surf = Product::new(noise, gate).unwrap();
//!
//! let block = surf.next_buffer();
//! assert_eq!(block.len(), 1024);
//! ```

pub mod combinators;
pub mod error;
pub mod generator;
pub mod noise;
pub mod oscillators;
pub mod presets;
pub mod pulse;

// Re-export commonly used types at the crate root
pub use combinators::Product;
pub use error::ConfigError;
pub use generator::{SampleGenerator, normalize};
pub use noise::{ColoredNoise, SpectralNoise, SpectrumShaper};
pub use oscillators::SineOscillator;
pub use presets::{GeneratorKind, GeneratorParams};
pub use pulse::{PulseTrain, gaussian_pulse};
