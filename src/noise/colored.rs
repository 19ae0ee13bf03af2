//! Colored noise: a `1/f^exponent` specialization of spectral noise.

use rand::Rng;

use super::spectral::{SpectralNoise, SpectrumShaper};
use crate::{ConfigError, SampleGenerator};

/// Builds the `x / f^exponent` shaper for a given exponent.
fn power_law_shaper(exponent: f32) -> SpectrumShaper {
    Box::new(move |bins, frequencies| {
        for (bin, &frequency) in bins.iter_mut().zip(frequencies.iter()) {
            *bin /= frequency.powf(exponent);
        }
    })
}

/// Colored noise with a `1/f^exponent` power spectrum.
///
/// An exponent of 0 is white noise, 1 is pink, 2 is red/Brownian; higher
/// exponents push the energy further down the spectrum and sound
/// progressively darker. The exponent is tunable between calls; changing it
/// swaps the underlying spectrum shaper and affects the next block only.
///
/// Extreme exponents are tolerated but degenerate: the surviving low bins
/// dominate so strongly that blocks come out near-silent or clipped after
/// normalization. That is accepted behavior, not an error.
///
/// # Examples
///
/// ```
/// use murmur::{ColoredNoise, SampleGenerator};
///
/// let mut noise = ColoredNoise::new(1024, 44100, 2.0, 128).unwrap();
/// let block = noise.next_buffer();
/// assert_eq!(block.len(), 1024);
/// assert!(block.iter().any(|s| *s != 0.0));
/// ```
pub struct ColoredNoise<R: Rng = rand::rngs::ThreadRng> {
    inner: SpectralNoise<R>,
    exponent: f32,
}

impl ColoredNoise<rand::rngs::ThreadRng> {
    /// Creates a colored noise generator with the default thread RNG.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - Samples per block; must be even and positive
    /// * `sample_rate` - Sample rate in Hz
    /// * `exponent` - Spectral exponent of the `1/f^e` shape
    /// * `high_pass` - Number of lowest bins zeroed each call
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BufferSize`] if `buffer_size` is odd or zero.
    pub fn new(
        buffer_size: usize,
        sample_rate: u32,
        exponent: f32,
        high_pass: usize,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(buffer_size, sample_rate, exponent, high_pass, rand::thread_rng())
    }
}

impl<R: Rng> ColoredNoise<R> {
    /// Creates a colored noise generator with a caller-supplied RNG.
    ///
    /// # Examples
    ///
    /// ```
    /// use murmur::{ColoredNoise, SampleGenerator};
    /// use rand::SeedableRng;
    ///
    /// let rng = rand::rngs::StdRng::seed_from_u64(11);
    /// let mut noise = ColoredNoise::with_rng(512, 44100, 1.0, 64, rng).unwrap();
    /// assert_eq!(noise.next_buffer().len(), 512);
    /// ```
    pub fn with_rng(
        buffer_size: usize,
        sample_rate: u32,
        exponent: f32,
        high_pass: usize,
        rng: R,
    ) -> Result<Self, ConfigError> {
        let inner = SpectralNoise::with_rng(
            buffer_size,
            sample_rate,
            power_law_shaper(exponent),
            high_pass,
            rng,
        )?;
        Ok(Self { inner, exponent })
    }

    /// Current spectral exponent.
    pub fn exponent(&self) -> f32 {
        self.exponent
    }

    /// Sets the spectral exponent, rebinding the spectrum shaper. Takes
    /// effect from the next block; past output is unaffected.
    pub fn set_exponent(&mut self, exponent: f32) {
        self.exponent = exponent;
        self.inner.set_shaper(power_law_shaper(exponent));
    }

    /// Number of lowest-frequency bins zeroed each call.
    pub fn high_pass(&self) -> usize {
        self.inner.high_pass()
    }

    /// Target peak amplitude of each normalized block.
    pub fn amplitude(&self) -> f32 {
        self.inner.amplitude()
    }

    /// Sets the target peak amplitude.
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.inner.set_amplitude(amplitude);
    }
}

impl<R: Rng> SampleGenerator for ColoredNoise<R> {
    fn next_buffer(&mut self) -> &[f32] {
        self.inner.next_buffer()
    }

    fn buffer_size(&self) -> usize {
        self.inner.buffer_size()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_reference_scenario() {
        // exponent 2.0, high-pass 128, 1024 samples at 44.1 kHz.
        let rng = StdRng::seed_from_u64(42);
        let mut noise = ColoredNoise::with_rng(1024, 44100, 2.0, 128, rng).unwrap();
        let block = noise.next_buffer();
        assert_eq!(block.len(), 1024);
        assert!(block.iter().all(|s| s.is_finite()));
        assert!(block.iter().any(|s| *s != 0.0));
        let peak = block.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!((peak - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_exponent_accessor_rebinds_shaper() {
        let rng = StdRng::seed_from_u64(13);
        let mut noise = ColoredNoise::with_rng(256, 44100, 0.0, 4, rng).unwrap();
        assert_eq!(noise.exponent(), 0.0);
        noise.set_exponent(3.0);
        assert_eq!(noise.exponent(), 3.0);
        // Still streams fine with the new shaper.
        let block = noise.next_buffer();
        assert!(block.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_extreme_exponent_is_degenerate_not_fatal() {
        let rng = StdRng::seed_from_u64(14);
        let mut noise = ColoredNoise::with_rng(256, 44100, 200.0, 0, rng).unwrap();
        for _ in 0..4 {
            assert!(noise.next_buffer().iter().all(|s| s.is_finite()));
        }
    }

    #[test]
    fn test_high_pass_getter() {
        let noise = ColoredNoise::new(512, 48000, 1.0, 32).unwrap();
        assert_eq!(noise.high_pass(), 32);
        assert_eq!(noise.sample_rate(), 48000);
        assert_eq!(noise.buffer_size(), 512);
    }
}
