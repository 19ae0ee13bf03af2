//! Phase-continuous sine wave generator.

use std::f64::consts::TAU;

use crate::generator::checked_buffer_size;
use crate::{ConfigError, SampleGenerator};

/// A sine wave generator producing fixed-size blocks.
///
/// The oscillator advances a phase accumulator by `frequency / sample_rate`
/// per sample and wraps it to `[0, 1)`, so consecutive blocks are
/// phase-continuous: for a fixed frequency, sample `i` of block `k` equals
/// `sin(2π · f/sr · (k · buffer_size + i))`. The accumulator is kept in
/// `f64` to avoid drift over long runs.
///
/// Output is already bounded by the amplitude, so no normalization pass is
/// applied. Changing the frequency takes effect at the next sample: the
/// waveform stays continuous in value but changes slope at the boundary,
/// which is expected behavior.
///
/// # Examples
///
/// ```
/// use murmur::{SampleGenerator, SineOscillator};
///
/// let mut osc = SineOscillator::new(1024, 44100, 440.0).unwrap();
/// let block = osc.next_buffer();
/// assert_eq!(block.len(), 1024);
/// assert!(block.iter().all(|s| s.abs() <= 1.0));
/// ```
#[derive(Debug)]
pub struct SineOscillator {
    /// Output block handed out by `next_buffer`.
    buffer: Vec<f32>,
    sample_rate: u32,
    amplitude: f32,
    /// Current phase in cycles, wrapped to [0.0, 1.0).
    phase: f64,
    /// Phase increment per sample (frequency / sample_rate).
    phase_increment: f64,
}

impl SineOscillator {
    /// Creates a new sine oscillator.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - Samples per block; must be even and positive
    /// * `sample_rate` - Sample rate in Hz
    /// * `frequency` - Frequency of the sine wave in Hz
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BufferSize`] if `buffer_size` is odd or zero.
    pub fn new(buffer_size: usize, sample_rate: u32, frequency: f64) -> Result<Self, ConfigError> {
        let size = checked_buffer_size(buffer_size)?;
        Ok(Self {
            buffer: vec![0.0; size],
            sample_rate,
            amplitude: 1.0,
            phase: 0.0,
            phase_increment: frequency / sample_rate as f64,
        })
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f64 {
        self.phase_increment * self.sample_rate as f64
    }

    /// Sets the frequency, effective from the next sample.
    pub fn set_frequency(&mut self, frequency: f64) {
        self.phase_increment = frequency / self.sample_rate as f64;
    }

    /// Peak amplitude of the generated wave.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Sets the peak amplitude.
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    /// Resets the phase to zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

impl SampleGenerator for SineOscillator {
    fn next_buffer(&mut self) -> &[f32] {
        for sample in self.buffer.iter_mut() {
            *sample = self.amplitude * (self.phase * TAU).sin() as f32;

            // Increment phase and wrap to [0.0, 1.0)
            self.phase += self.phase_increment;
            if self.phase >= 1.0 {
                self.phase -= 1.0;
            }
        }
        &self.buffer
    }

    fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
