//! Pre-wired generator compositions and name-based selection.
//!
//! The factories here wire a carrier (colored noise or sine tone) to a
//! pulse-train gate, returning a ready-to-stream [`Product`]. The
//! [`GeneratorKind`] selection layer maps the stable generator names used
//! by external front ends onto those factories.

use std::str::FromStr;

use crate::{
    ColoredNoise, ConfigError, Product, PulseTrain, SampleGenerator, SineOscillator,
};

/// Construction parameters shared by the named generators.
///
/// The defaults mirror the crate's canonical demo settings: red-ish noise
/// (exponent 2), a 128-bin high-pass, 50 ms pulse spacing with 20 ms
/// jitter, an A4 sine, 1024-sample blocks at 44.1 kHz.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorParams {
    /// Samples per block; must be even and positive.
    pub buffer_size: usize,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Peak amplitude of normalized blocks.
    pub amplitude: f32,
    /// Spectral exponent for noise carriers.
    pub exponent: f32,
    /// High-pass bin count for noise carriers.
    pub high_pass: usize,
    /// Average pulse spacing in milliseconds.
    pub distance_ms: f32,
    /// Pulse spacing standard deviation in milliseconds.
    pub randomness_ms: f32,
    /// Frequency in Hz for tone carriers.
    pub frequency: f64,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            buffer_size: 1024,
            sample_rate: 44100,
            amplitude: 1.0,
            exponent: 2.0,
            high_pass: 128,
            distance_ms: 50.0,
            randomness_ms: 20.0,
            frequency: 440.0,
        }
    }
}

/// Gates colored noise with a pulsed Gaussian envelope.
///
/// # Errors
///
/// Returns [`ConfigError::BufferSize`] if `buffer_size` is odd or zero.
///
/// # Examples
///
/// ```
/// use murmur::{SampleGenerator, presets};
///
/// let mut surf = presets::colored_gated_noise(1024, 44100, 2.0, 128, 50.0, 20.0).unwrap();
/// assert_eq!(surf.next_buffer().len(), 1024);
/// ```
pub fn colored_gated_noise(
    buffer_size: usize,
    sample_rate: u32,
    exponent: f32,
    high_pass: usize,
    gate_distance_ms: f32,
    gate_randomness_ms: f32,
) -> Result<Product<ColoredNoise, PulseTrain>, ConfigError> {
    let carrier = ColoredNoise::new(buffer_size, sample_rate, exponent, high_pass)?;
    let gate = PulseTrain::new(buffer_size, sample_rate, gate_distance_ms, gate_randomness_ms)?;
    Product::new(carrier, gate)
}

/// Gates a sine tone with a pulsed Gaussian envelope.
///
/// # Errors
///
/// Returns [`ConfigError::BufferSize`] if `buffer_size` is odd or zero.
///
/// # Examples
///
/// ```
/// use murmur::{SampleGenerator, presets};
///
/// let mut beeps = presets::gated_sine(1024, 44100, 440.0, 50.0, 0.0).unwrap();
/// assert_eq!(beeps.next_buffer().len(), 1024);
/// ```
pub fn gated_sine(
    buffer_size: usize,
    sample_rate: u32,
    frequency: f64,
    gate_distance_ms: f32,
    gate_randomness_ms: f32,
) -> Result<Product<SineOscillator, PulseTrain>, ConfigError> {
    let carrier = SineOscillator::new(buffer_size, sample_rate, frequency)?;
    let gate = PulseTrain::new(buffer_size, sample_rate, gate_distance_ms, gate_randomness_ms)?;
    Product::new(carrier, gate)
}

/// The named generator kinds external front ends can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    /// Colored noise, `1/f^exponent` spectrum.
    ColoredNoise,
    /// The bare pulse train.
    PulseNoise,
    /// Colored noise gated by a pulse train.
    GatedNoise,
    /// A plain sine tone.
    Sine,
    /// A sine tone gated by a pulse train.
    GatedSine,
}

impl GeneratorKind {
    /// The stable name of this kind, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            GeneratorKind::ColoredNoise => "colored_noise",
            GeneratorKind::PulseNoise => "pulse_noise",
            GeneratorKind::GatedNoise => "gated_noise",
            GeneratorKind::Sine => "sine",
            GeneratorKind::GatedSine => "gated_sine",
        }
    }

    /// All selectable kinds, for help/usage listings.
    pub fn all() -> [GeneratorKind; 5] {
        [
            GeneratorKind::ColoredNoise,
            GeneratorKind::PulseNoise,
            GeneratorKind::GatedNoise,
            GeneratorKind::Sine,
            GeneratorKind::GatedSine,
        ]
    }

    /// Constructs a boxed generator of this kind from the given parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BufferSize`] if the configured buffer size is
    /// odd or zero.
    pub fn build(
        self,
        params: &GeneratorParams,
    ) -> Result<Box<dyn SampleGenerator>, ConfigError> {
        let generator: Box<dyn SampleGenerator> = match self {
            GeneratorKind::ColoredNoise => {
                let mut noise = ColoredNoise::new(
                    params.buffer_size,
                    params.sample_rate,
                    params.exponent,
                    params.high_pass,
                )?;
                noise.set_amplitude(params.amplitude);
                Box::new(noise)
            }
            GeneratorKind::PulseNoise => {
                let mut train = PulseTrain::new(
                    params.buffer_size,
                    params.sample_rate,
                    params.distance_ms,
                    params.randomness_ms,
                )?;
                train.set_amplitude(params.amplitude);
                Box::new(train)
            }
            GeneratorKind::GatedNoise => Box::new(colored_gated_noise(
                params.buffer_size,
                params.sample_rate,
                params.exponent,
                params.high_pass,
                params.distance_ms,
                params.randomness_ms,
            )?),
            GeneratorKind::Sine => {
                let mut osc = SineOscillator::new(
                    params.buffer_size,
                    params.sample_rate,
                    params.frequency,
                )?;
                osc.set_amplitude(params.amplitude);
                Box::new(osc)
            }
            GeneratorKind::GatedSine => Box::new(gated_sine(
                params.buffer_size,
                params.sample_rate,
                params.frequency,
                params.distance_ms,
                params.randomness_ms,
            )?),
        };
        Ok(generator)
    }
}

impl FromStr for GeneratorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeneratorKind::all()
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::UnknownGenerator(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_parse() {
        for kind in GeneratorKind::all() {
            assert_eq!(kind.name().parse::<GeneratorKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = "brown_noise".parse::<GeneratorKind>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownGenerator("brown_noise".to_string()));
    }

    #[test]
    fn test_every_kind_builds_and_streams() {
        let params = GeneratorParams::default();
        for kind in GeneratorKind::all() {
            let mut generator = kind.build(&params).unwrap();
            assert_eq!(generator.buffer_size(), params.buffer_size);
            assert_eq!(generator.sample_rate(), params.sample_rate);
            let block = generator.next_buffer();
            assert_eq!(block.len(), params.buffer_size);
            assert!(block.iter().all(|s| s.is_finite()));
        }
    }

    #[test]
    fn test_invalid_buffer_size_propagates() {
        let params = GeneratorParams {
            buffer_size: 1023,
            ..GeneratorParams::default()
        };
        for kind in GeneratorKind::all() {
            let err = kind.build(&params).unwrap_err();
            assert_eq!(err, ConfigError::BufferSize(1023));
        }
    }

    #[test]
    fn test_gated_sine_stays_within_amplitude() {
        let mut beeps = gated_sine(1024, 44100, 440.0, 10.0, 0.0).unwrap();
        for _ in 0..4 {
            let block = beeps.next_buffer();
            // Sine carrier in [-1, 1], normalized gate in [0, 1]: the
            // ungated product can never exceed the carrier bounds.
            assert!(block.iter().all(|s| s.abs() <= 1.0 + 1e-6));
        }
    }
}
