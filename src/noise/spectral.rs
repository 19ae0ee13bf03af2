//! Spectral-synthesis noise generator.

use std::sync::Arc;

use rand::Rng;
use rand_distr::StandardNormal;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::generator::{checked_buffer_size, normalize};
use crate::{ConfigError, SampleGenerator};

/// Frequency stand-in for the DC bin, so shapers that divide by frequency
/// never divide by zero.
const DC_EPSILON: f32 = 0.01;

/// A spectrum-shaping strategy applied to the random bins before the
/// inverse transform.
///
/// The first argument is the positive-frequency half-spectrum
/// (`size / 2 + 1` bins), the second the matching frequency index array
/// (`0.0, 1.0, 2.0, ...` with the DC entry replaced by a small epsilon).
/// Shapers mutate the bins in place; a `1/f^e` shaper turns white noise
/// into colored noise, for example.
pub type SpectrumShaper = Box<dyn FnMut(&mut [Complex<f32>], &[f32]) + Send>;

/// A noise generator synthesizing each block in the frequency domain.
///
/// Every call to `next_buffer` draws a fresh half-spectrum of complex
/// Gaussian bins, zeroes the lowest `high_pass` bins (a crude high-pass
/// filter that keeps near-DC spectral shapes from diverging), applies the
/// configured [`SpectrumShaper`], and inverse-transforms back to the time
/// domain. Calls are statistically independent; only configuration persists
/// between them.
///
/// Degenerate shapers (extreme exponents, NaN-producing math) cannot crash
/// the transform: non-finite bins are scrubbed to zero before the inverse
/// FFT, and the shared normalization policy turns an unusable block into
/// silence. The audible result of such settings may be near-silent or
/// clipped noise, which is accepted behavior rather than an error.
///
/// # Examples
///
/// ```
/// use murmur::{SampleGenerator, SpectralNoise};
///
/// // White noise: leave the spectrum untouched.
/// let mut noise = SpectralNoise::new(1024, 44100, Box::new(|_bins, _freqs| {}), 0).unwrap();
/// assert_eq!(noise.next_buffer().len(), 1024);
/// ```
pub struct SpectralNoise<R: Rng = rand::rngs::ThreadRng> {
    /// Output block handed out by `next_buffer`.
    buffer: Vec<f32>,
    sample_rate: u32,
    amplitude: f32,
    /// Number of lowest-frequency bins forced to zero each call.
    high_pass: usize,
    shaper: SpectrumShaper,
    /// Frequency indices `0..=size/2`, DC replaced by `DC_EPSILON`.
    frequencies: Vec<f32>,
    /// Half-spectrum scratch, `size / 2 + 1` bins.
    bins: Vec<Complex<f32>>,
    /// Full-length scratch for the complex inverse transform.
    spectrum: Vec<Complex<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    rng: R,
}

impl<R: Rng> std::fmt::Debug for SpectralNoise<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectralNoise")
            .field("buffer_size", &self.buffer.len())
            .field("sample_rate", &self.sample_rate)
            .field("amplitude", &self.amplitude)
            .field("high_pass", &self.high_pass)
            .finish_non_exhaustive()
    }
}

impl SpectralNoise<rand::rngs::ThreadRng> {
    /// Creates a spectral noise generator with the default thread RNG.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - Samples per block; must be even and positive
    /// * `sample_rate` - Sample rate in Hz
    /// * `shaper` - Spectrum-shaping function applied each call
    /// * `high_pass` - Number of lowest bins zeroed each call
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BufferSize`] if `buffer_size` is odd or zero.
    pub fn new(
        buffer_size: usize,
        sample_rate: u32,
        shaper: SpectrumShaper,
        high_pass: usize,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(buffer_size, sample_rate, shaper, high_pass, rand::thread_rng())
    }
}

impl<R: Rng> SpectralNoise<R> {
    /// Creates a spectral noise generator with a caller-supplied RNG.
    ///
    /// Seeding a `StdRng` here makes the output reproducible, which the
    /// tests rely on; production code normally sticks with [`new`].
    ///
    /// [`new`]: SpectralNoise::new
    ///
    /// # Examples
    ///
    /// ```
    /// use murmur::{SampleGenerator, SpectralNoise};
    /// use rand::SeedableRng;
    ///
    /// let rng = rand::rngs::StdRng::seed_from_u64(7);
    /// let mut noise =
    ///     SpectralNoise::with_rng(512, 44100, Box::new(|_, _| {}), 16, rng).unwrap();
    /// let block = noise.next_buffer();
    /// assert!(block.iter().all(|s| s.is_finite()));
    /// ```
    pub fn with_rng(
        buffer_size: usize,
        sample_rate: u32,
        shaper: SpectrumShaper,
        high_pass: usize,
        rng: R,
    ) -> Result<Self, ConfigError> {
        let size = checked_buffer_size(buffer_size)?;
        let half = size / 2 + 1;

        let mut frequencies: Vec<f32> = (0..half).map(|i| i as f32).collect();
        frequencies[0] = DC_EPSILON;

        let inverse = FftPlanner::new().plan_fft_inverse(size);

        Ok(Self {
            buffer: vec![0.0; size],
            sample_rate,
            amplitude: 1.0,
            high_pass,
            shaper,
            frequencies,
            bins: vec![Complex::new(0.0, 0.0); half],
            spectrum: vec![Complex::new(0.0, 0.0); size],
            inverse,
            rng,
        })
    }

    /// Replaces the spectrum-shaping function.
    pub fn set_shaper(&mut self, shaper: SpectrumShaper) {
        self.shaper = shaper;
    }

    /// Number of lowest-frequency bins zeroed each call.
    pub fn high_pass(&self) -> usize {
        self.high_pass
    }

    /// Sets the high-pass bin count. Values beyond the bin count silence
    /// the whole spectrum.
    pub fn set_high_pass(&mut self, high_pass: usize) {
        self.high_pass = high_pass;
    }

    /// Target peak amplitude of each normalized block.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Sets the target peak amplitude.
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    /// Synthesizes one block: random half-spectrum, high-pass mask, shaper,
    /// Hermitian extension, inverse FFT, normalization.
    fn synthesize(&mut self) {
        let size = self.buffer.len();

        for bin in self.bins.iter_mut() {
            let re: f32 = self.rng.sample(StandardNormal);
            let im: f32 = self.rng.sample(StandardNormal);
            *bin = Complex::new(re, im);
        }

        let masked = self.high_pass.min(self.bins.len());
        for bin in self.bins[..masked].iter_mut() {
            *bin = Complex::new(0.0, 0.0);
        }

        (self.shaper)(&mut self.bins, &self.frequencies);

        // A hostile shaper (huge exponents, zero frequencies) can emit
        // NaN/inf bins; scrub them so the transform stays well defined.
        for bin in self.bins.iter_mut() {
            if !bin.re.is_finite() || !bin.im.is_finite() {
                *bin = Complex::new(0.0, 0.0);
            }
        }

        // Mirror the half-spectrum into a conjugate-symmetric full spectrum
        // so the inverse transform of the real signal comes out real.
        self.spectrum[0] = self.bins[0];
        for k in 1..self.bins.len() {
            self.spectrum[k] = self.bins[k];
            if k < size - k {
                self.spectrum[size - k] = self.bins[k].conj();
            }
        }

        self.inverse.process(&mut self.spectrum);

        let scale = 1.0 / size as f32;
        for (sample, value) in self.buffer.iter_mut().zip(self.spectrum.iter()) {
            *sample = value.re * scale;
        }

        normalize(&mut self.buffer, self.amplitude);
    }
}

impl<R: Rng> SampleGenerator for SpectralNoise<R> {
    fn next_buffer(&mut self) -> &[f32] {
        self.synthesize();
        &self.buffer
    }

    fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
