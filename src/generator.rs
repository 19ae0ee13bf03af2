//! The shared buffer-producing contract and normalization.
//!
//! Every sound source in this crate implements [`SampleGenerator`]: a
//! stateful object that fills a fixed-size internal block of `f32` samples
//! on demand. An external playback sink drives the stream by calling
//! [`next_buffer`](SampleGenerator::next_buffer) once per block period
//! (`buffer_size / sample_rate` seconds).

use crate::ConfigError;

/// Common interface for anything that produces fixed-size sample blocks.
///
/// Implementors own a single internal buffer whose length is fixed at
/// construction; `next_buffer` overwrites it in place and hands out a
/// borrow, so streaming allocates nothing after construction.
///
/// A generator instance is single-producer: Rust's `&mut self` receiver
/// already prevents concurrent calls on one instance. Independent instances
/// share no state and may live on different threads.
///
/// # Examples
///
/// ```
/// use murmur::{SampleGenerator, SineOscillator};
///
/// let mut osc = SineOscillator::new(1024, 44100, 440.0).unwrap();
/// let block = osc.next_buffer();
/// assert_eq!(block.len(), 1024);
/// ```
pub trait SampleGenerator {
    /// Fills the internal buffer with the next block and returns it.
    ///
    /// The returned slice always has exactly
    /// [`buffer_size`](SampleGenerator::buffer_size) samples. This call
    /// never fails and never reallocates.
    fn next_buffer(&mut self) -> &[f32];

    /// Number of samples produced per call, fixed at construction.
    fn buffer_size(&self) -> usize;

    /// Sample rate in Hz, fixed at construction.
    fn sample_rate(&self) -> u32;
}

impl std::fmt::Debug for dyn SampleGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleGenerator")
            .field("buffer_size", &self.buffer_size())
            .field("sample_rate", &self.sample_rate())
            .finish_non_exhaustive()
    }
}

/// Allow boxed generators to be used as generators (for dynamic dispatch).
/// Covers `Box<dyn SampleGenerator>` and `Box<dyn SampleGenerator + Send>`.
impl<G: SampleGenerator + ?Sized> SampleGenerator for Box<G> {
    fn next_buffer(&mut self) -> &[f32] {
        (**self).next_buffer()
    }

    fn buffer_size(&self) -> usize {
        (**self).buffer_size()
    }

    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }
}

/// Validates a block length at construction time.
///
/// Spectral synthesis splits the block into `size / 2 + 1` frequency bins,
/// so the length must be even; zero-length blocks cannot stream at all.
pub(crate) fn checked_buffer_size(size: usize) -> Result<usize, ConfigError> {
    if size == 0 || size % 2 != 0 {
        return Err(ConfigError::BufferSize(size));
    }
    Ok(size)
}

/// Rescales a block in place to the configured amplitude.
///
/// The minimum sample is shifted to zero, then the block is divided by its
/// peak magnitude and multiplied by `amplitude`, leaving values in
/// `[0, amplitude]`.
///
/// A block with zero spread (all samples identical) has no peak to divide
/// by. Policy: such blocks are cleared to silence rather than producing
/// NaN/inf. The same policy applies if the input contains non-finite
/// samples, so a degenerate upstream stage cannot poison the stream.
///
/// # Examples
///
/// ```
/// use murmur::normalize;
///
/// let mut block = vec![-1.0, 0.0, 3.0];
/// normalize(&mut block, 0.5);
/// assert_eq!(block, vec![0.0, 0.125, 0.5]);
/// ```
pub fn normalize(buffer: &mut [f32], amplitude: f32) {
    let mut min = f32::INFINITY;
    for &sample in buffer.iter() {
        if !sample.is_finite() {
            buffer.fill(0.0);
            return;
        }
        if sample < min {
            min = sample;
        }
    }

    let mut peak = 0.0f32;
    for &sample in buffer.iter() {
        let shifted = (sample - min).abs();
        if shifted > peak {
            peak = shifted;
        }
    }

    if peak == 0.0 || !peak.is_finite() {
        buffer.fill(0.0);
        return;
    }

    let scale = amplitude / peak;
    for sample in buffer.iter_mut() {
        *sample = (*sample - min) * scale;
    }
}
