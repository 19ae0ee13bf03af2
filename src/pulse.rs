//! Pulse-train generator with jittered spacing.
//!
//! Produces a fixed pulse waveform repeated at a randomly perturbed average
//! interval, seamlessly across block boundaries. The stream is synthesized
//! ahead into an internal pending buffer and drained block by block, so
//! pulses that straddle a boundary carry over intact.

use std::collections::VecDeque;

use rand::Rng;

use crate::generator::{checked_buffer_size, normalize};
use crate::{ConfigError, SampleGenerator};

/// Width multiplier turning a target standard deviation into the width of a
/// uniform distribution: `Uniform[0, w)` has standard deviation `w / √12`.
const UNIFORM_STD_FACTOR: f32 = 3.464_101_6; // sqrt(12)

/// Length of the default Gaussian gate pulse in samples.
const DEFAULT_PULSE_LEN: usize = 3610;

/// Standard deviation of the default Gaussian gate pulse in samples.
const DEFAULT_PULSE_STD: f32 = 180.0;

/// Builds a Gaussian window usable as a pulse waveform.
///
/// The window peaks at 1.0 in the middle and decays symmetrically with the
/// given standard deviation (in samples). Each call allocates a fresh
/// vector, so no two generators ever share a mutable waveform.
///
/// # Examples
///
/// ```
/// use murmur::gaussian_pulse;
///
/// let pulse = gaussian_pulse(101, 20.0);
/// assert_eq!(pulse.len(), 101);
/// assert!((pulse[50] - 1.0).abs() < 1e-6);
/// assert!(pulse[0] < pulse[50]);
/// ```
pub fn gaussian_pulse(len: usize, std_dev: f32) -> Vec<f32> {
    let center = (len as f32 - 1.0) / 2.0;
    (0..len)
        .map(|i| {
            let x = (i as f32 - center) / std_dev;
            (-0.5 * x * x).exp()
        })
        .collect()
}

/// The default gate pulse: a wide Gaussian window.
pub(crate) fn default_gate_pulse() -> Vec<f32> {
    gaussian_pulse(DEFAULT_PULSE_LEN, DEFAULT_PULSE_STD)
}

/// A generator repeating a pulse waveform at a jittered average interval.
///
/// The average pulse spacing is `distance_ms` milliseconds; each individual
/// gap is lengthened by a uniform random jitter whose width is derived from
/// `randomness_ms`, interpreted as the target standard deviation of the
/// spacing. Both tunables have setters that atomically recompute the
/// derived sample counts.
///
/// Normalization policy: an extracted block is normalized only when it
/// contains at least one non-zero sample; an all-silent block (possible
/// when the spacing exceeds the block length) passes through untouched.
///
/// # Examples
///
/// ```
/// use murmur::{PulseTrain, SampleGenerator};
///
/// let mut train = PulseTrain::new(1024, 44100, 50.0, 20.0).unwrap();
/// let block = train.next_buffer();
/// assert_eq!(block.len(), 1024);
/// ```
#[derive(Debug)]
pub struct PulseTrain<R: Rng = rand::rngs::ThreadRng> {
    /// Output block handed out by `next_buffer`.
    buffer: Vec<f32>,
    sample_rate: u32,
    amplitude: f32,
    /// Average pulse spacing in milliseconds.
    distance_ms: f32,
    /// Spacing standard deviation in milliseconds.
    randomness_ms: f32,
    /// Derived: average gap length in samples.
    interval_samples: usize,
    /// Derived: width of the uniform jitter range in samples.
    jitter_samples: usize,
    /// The repeated pulse waveform.
    pulse: Vec<f32>,
    /// Synthesized-but-unemitted samples carried across calls.
    pending: VecDeque<f32>,
    rng: R,
}

impl PulseTrain<rand::rngs::ThreadRng> {
    /// Creates a pulse train with the default Gaussian gate pulse and the
    /// default thread RNG.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - Samples per block; must be even and positive
    /// * `sample_rate` - Sample rate in Hz
    /// * `distance_ms` - Average spacing between pulses in milliseconds
    /// * `randomness_ms` - Spacing standard deviation in milliseconds
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BufferSize`] if `buffer_size` is odd or zero.
    pub fn new(
        buffer_size: usize,
        sample_rate: u32,
        distance_ms: f32,
        randomness_ms: f32,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(
            buffer_size,
            sample_rate,
            distance_ms,
            randomness_ms,
            default_gate_pulse(),
            rand::thread_rng(),
        )
    }
}

impl<R: Rng> PulseTrain<R> {
    /// Creates a pulse train with a caller-supplied pulse waveform and RNG.
    ///
    /// Seeding a `StdRng` here makes the pulse schedule reproducible.
    ///
    /// # Examples
    ///
    /// ```
    /// use murmur::{PulseTrain, SampleGenerator, gaussian_pulse};
    /// use rand::SeedableRng;
    ///
    /// let rng = rand::rngs::StdRng::seed_from_u64(3);
    /// let pulse = gaussian_pulse(64, 8.0);
    /// let mut train = PulseTrain::with_rng(256, 44100, 10.0, 5.0, pulse, rng).unwrap();
    /// assert_eq!(train.next_buffer().len(), 256);
    /// ```
    pub fn with_rng(
        buffer_size: usize,
        sample_rate: u32,
        distance_ms: f32,
        randomness_ms: f32,
        pulse: Vec<f32>,
        rng: R,
    ) -> Result<Self, ConfigError> {
        let size = checked_buffer_size(buffer_size)?;
        let mut train = Self {
            buffer: vec![0.0; size],
            sample_rate,
            amplitude: 1.0,
            distance_ms,
            randomness_ms,
            interval_samples: 0,
            jitter_samples: 0,
            pulse,
            pending: VecDeque::new(),
            rng,
        };
        train.recompute_spacing();
        Ok(train)
    }

    /// Average pulse spacing in milliseconds.
    pub fn distance_ms(&self) -> f32 {
        self.distance_ms
    }

    /// Sets the average pulse spacing, recomputing the derived gap length.
    pub fn set_distance_ms(&mut self, distance_ms: f32) {
        self.distance_ms = distance_ms;
        self.recompute_spacing();
    }

    /// Spacing standard deviation in milliseconds.
    pub fn randomness_ms(&self) -> f32 {
        self.randomness_ms
    }

    /// Sets the spacing standard deviation, recomputing the jitter range.
    pub fn set_randomness_ms(&mut self, randomness_ms: f32) {
        self.randomness_ms = randomness_ms;
        self.recompute_spacing();
    }

    /// Derived average gap length in samples.
    pub fn interval_samples(&self) -> usize {
        self.interval_samples
    }

    /// Derived width of the uniform jitter range in samples.
    pub fn jitter_samples(&self) -> usize {
        self.jitter_samples
    }

    /// Target peak amplitude of each normalized block.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Sets the target peak amplitude.
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    /// Recomputes both derived sample counts from the millisecond tunables.
    /// Negative or non-finite inputs clamp to zero rather than wrapping.
    fn recompute_spacing(&mut self) {
        let per_ms = self.sample_rate as f32 / 1000.0;
        self.interval_samples = to_samples(self.distance_ms * per_ms);
        self.jitter_samples = to_samples(self.randomness_ms * UNIFORM_STD_FACTOR * per_ms);
    }

    /// Draws the jitter for one gap: uniform in `[0, jitter_samples)`, or
    /// zero when the range is empty.
    fn draw_jitter(&mut self) -> usize {
        if self.jitter_samples == 0 {
            0
        } else {
            self.rng.gen_range(0..self.jitter_samples)
        }
    }

    /// Appends `[pulse][gap]` pairs until the pending buffer can cover one
    /// block, then drains exactly one block into the output buffer.
    ///
    /// This is the raw extraction path: the concatenation of successive
    /// blocks is exactly the stream an unbounded single pass would produce.
    fn extract(&mut self) {
        while self.pending.len() < self.buffer.len() {
            self.pending.extend(self.pulse.iter().copied());
            let gap = self.interval_samples + self.draw_jitter();
            self.pending.extend(std::iter::repeat(0.0).take(gap));
            if self.pulse.is_empty() && gap == 0 {
                // An empty pulse with zero spacing synthesizes nothing;
                // emit silence instead of spinning.
                self.pending.resize(self.buffer.len(), 0.0);
            }
        }
        for sample in self.buffer.iter_mut() {
            // The loop above guarantees enough pending samples.
            *sample = self.pending.pop_front().unwrap_or(0.0);
        }
    }
}

/// Rounds a sample count, clamping negatives and non-finite values to zero.
fn to_samples(value: f32) -> usize {
    if value.is_finite() && value > 0.0 {
        value.round() as usize
    } else {
        0
    }
}

impl<R: Rng> SampleGenerator for PulseTrain<R> {
    fn next_buffer(&mut self) -> &[f32] {
        self.extract();
        if self.buffer.iter().any(|s| *s != 0.0) {
            normalize(&mut self.buffer, self.amplitude);
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

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const SEED: u64 = 0xDECAF;

    fn short_pulse() -> Vec<f32> {
        gaussian_pulse(32, 6.0)
    }

    #[test]
    fn test_block_length_is_fixed() {
        let rng = StdRng::seed_from_u64(SEED);
        let mut train =
            PulseTrain::with_rng(512, 44100, 10.0, 5.0, short_pulse(), rng).unwrap();
        for _ in 0..8 {
            assert_eq!(train.next_buffer().len(), 512);
        }
    }

    #[test]
    fn test_odd_buffer_size_rejected() {
        let err = PulseTrain::new(333, 44100, 50.0, 20.0).unwrap_err();
        assert_eq!(err, ConfigError::BufferSize(333));
    }

    #[test]
    fn test_chunked_stream_matches_single_pass() {
        // The key continuity property: N chunked extractions must equal the
        // first N*size samples of one big extraction with the same seed,
        // because the pulse/gap append sequence depends only on the RNG.
        let chunks = 13;
        let size = 256;

        let rng = StdRng::seed_from_u64(SEED);
        let mut chunked =
            PulseTrain::with_rng(size, 44100, 7.0, 3.0, short_pulse(), rng).unwrap();
        let mut stream = Vec::with_capacity(chunks * size);
        for _ in 0..chunks {
            chunked.extract();
            stream.extend_from_slice(&chunked.buffer);
        }

        let rng = StdRng::seed_from_u64(SEED);
        let mut single =
            PulseTrain::with_rng(chunks * size, 44100, 7.0, 3.0, short_pulse(), rng)
                .unwrap();
        single.extract();

        assert_eq!(stream, single.buffer);
    }

    #[test]
    fn test_zero_randomness_gives_constant_gaps() {
        let rng = StdRng::seed_from_u64(SEED);
        let pulse = vec![1.0; 4];
        let mut train = PulseTrain::with_rng(64, 1000, 16.0, 0.0, pulse, rng).unwrap();
        assert_eq!(train.interval_samples(), 16);
        assert_eq!(train.jitter_samples(), 0);

        // Period is pulse (4) + gap (16) = 20 samples; collect a few blocks
        // raw and check the pulse onsets are exactly 20 apart.
        let mut stream = Vec::new();
        for _ in 0..5 {
            train.extract();
            stream.extend_from_slice(&train.buffer);
        }
        let onsets: Vec<usize> = stream
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[0] == 0.0 && w[1] != 0.0)
            .map(|(i, _)| i + 1)
            .collect();
        for pair in onsets.windows(2) {
            assert_eq!(pair[1] - pair[0], 20);
        }
    }

    #[test]
    fn test_gap_jitter_within_range() {
        let rng = StdRng::seed_from_u64(SEED);
        // 1 kHz rate keeps the sample math readable: 10 ms -> 10 samples.
        let mut train =
            PulseTrain::with_rng(64, 1000, 10.0, 2.0, vec![1.0; 2], rng).unwrap();
        assert_eq!(train.interval_samples(), 10);
        let jitter = train.jitter_samples();
        assert_eq!(jitter, (2.0f32 * UNIFORM_STD_FACTOR).round() as usize);

        // Every gap between pulse offsets must lie in [10, 10 + jitter).
        let mut stream = Vec::new();
        for _ in 0..32 {
            train.extract();
            stream.extend_from_slice(&train.buffer);
        }
        let mut gap = None;
        for &sample in &stream {
            match (sample != 0.0, gap) {
                (true, Some(run)) => {
                    assert!((10..10 + jitter).contains(&run), "gap {run} out of range");
                    gap = None;
                }
                (true, None) => {}
                (false, Some(run)) => gap = Some(run + 1),
                (false, None) => gap = Some(1),
            }
        }
    }

    #[test]
    fn test_silent_block_is_left_unnormalized() {
        let rng = StdRng::seed_from_u64(SEED);
        // Pulse of 8 samples, then a 1000-sample gap: the second block is
        // pure silence and must come back all-zero, untouched.
        let mut train =
            PulseTrain::with_rng(64, 1000, 1000.0, 0.0, vec![0.5; 8], rng).unwrap();
        let first = train.next_buffer().to_vec();
        assert!(first.iter().any(|s| *s != 0.0));
        let second = train.next_buffer().to_vec();
        assert_eq!(second, vec![0.0; 64]);
    }

    #[test]
    fn test_nonsilent_block_peaks_at_amplitude() {
        let rng = StdRng::seed_from_u64(SEED);
        let mut train =
            PulseTrain::with_rng(256, 44100, 1.0, 0.0, short_pulse(), rng).unwrap();
        train.set_amplitude(0.5);
        let block = train.next_buffer();
        let peak = block.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!((peak - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_setters_recompute_derived_state() {
        let mut train = PulseTrain::new(1024, 44100, 50.0, 20.0).unwrap();
        assert_eq!(train.interval_samples(), 2205);
        train.set_distance_ms(100.0);
        assert_eq!(train.distance_ms(), 100.0);
        assert_eq!(train.interval_samples(), 4410);

        train.set_randomness_ms(0.0);
        assert_eq!(train.jitter_samples(), 0);
        train.set_randomness_ms(10.0);
        let expected = (10.0 * UNIFORM_STD_FACTOR * 44.1f32).round() as usize;
        assert_eq!(train.jitter_samples(), expected);
    }

    #[test]
    fn test_empty_pulse_with_zero_spacing_yields_silence() {
        let rng = StdRng::seed_from_u64(SEED);
        let mut train = PulseTrain::with_rng(64, 44100, 0.0, 0.0, Vec::new(), rng).unwrap();
        assert_eq!(train.next_buffer(), vec![0.0; 64].as_slice());
    }

    #[test]
    fn test_negative_tunables_clamp_to_zero() {
        let mut train = PulseTrain::new(64, 44100, -5.0, -1.0).unwrap();
        assert_eq!(train.interval_samples(), 0);
        assert_eq!(train.jitter_samples(), 0);
        // Still streams: back-to-back pulses with no gap.
        assert_eq!(train.next_buffer().len(), 64);
        train.set_distance_ms(f32::NAN);
        assert_eq!(train.interval_samples(), 0);
        assert_eq!(train.next_buffer().len(), 64);
    }

    #[test]
    fn test_pending_buffer_carries_partial_pulse() {
        let rng = StdRng::seed_from_u64(SEED);
        // Pulse (6) + gap (4) = 10-sample period against 8-sample blocks:
        // every boundary splits a pulse or a gap.
        let pulse: Vec<f32> = (1..=6).map(|i| i as f32 / 6.0).collect();
        let mut train =
            PulseTrain::with_rng(8, 1000, 4.0, 0.0, pulse.clone(), rng).unwrap();
        let mut stream = Vec::new();
        for _ in 0..10 {
            train.extract();
            stream.extend_from_slice(&train.buffer);
        }
        // The raw stream must tile as pulse, gap, pulse, gap, ...
        for (i, &sample) in stream.iter().enumerate() {
            let phase = i % 10;
            let expected = if phase < 6 { pulse[phase] } else { 0.0 };
            assert_eq!(sample, expected, "sample {i}");
        }
    }
}
