//! Combinators for composing generators.
//!
//! Composite generators own their children and pull one block from each per
//! production call, so a whole composition streams through a single
//! `next_buffer` at the root.

use crate::{ConfigError, SampleGenerator};

/// Element-wise product of two generators' blocks.
///
/// Multiplying a carrier (noise, tone) by an envelope (pulse train) is how
/// gated and amplitude-modulated signals are built. Each call pulls one
/// block from the first child, then one from the second, and writes the
/// sample-wise product into its own buffer.
///
/// The product is deliberately *not* normalized: renormalizing every block
/// would erase the gating dynamics the envelope imposes on the carrier.
/// Scale either child instead if the result is too quiet or too loud.
///
/// Both children must agree on buffer size; the reported sample rate is the
/// first child's.
///
/// # Examples
///
/// ```
/// use murmur::{ColoredNoise, Product, PulseTrain, SampleGenerator};
///
/// let noise = ColoredNoise::new(1024, 44100, 2.0, 128).unwrap();
/// let gate = PulseTrain::new(1024, 44100, 50.0, 20.0).unwrap();
/// let mut gated = Product::new(noise, gate).unwrap();
/// assert_eq!(gated.next_buffer().len(), 1024);
/// ```
#[derive(Debug)]
pub struct Product<A: SampleGenerator, B: SampleGenerator> {
    first: A,
    second: B,
    buffer: Vec<f32>,
}

impl<A: SampleGenerator, B: SampleGenerator> Product<A, B> {
    /// Creates a product of two generators.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BufferSizeMismatch`] if the children disagree
    /// on buffer size.
    pub fn new(first: A, second: B) -> Result<Self, ConfigError> {
        if first.buffer_size() != second.buffer_size() {
            return Err(ConfigError::BufferSizeMismatch {
                first: first.buffer_size(),
                second: second.buffer_size(),
            });
        }
        let size = first.buffer_size();
        Ok(Self {
            first,
            second,
            buffer: vec![0.0; size],
        })
    }

    /// The first (carrier) child.
    pub fn first(&self) -> &A {
        &self.first
    }

    /// Mutable access to the first child, e.g. to retune the carrier.
    pub fn first_mut(&mut self) -> &mut A {
        &mut self.first
    }

    /// The second (envelope) child.
    pub fn second(&self) -> &B {
        &self.second
    }

    /// Mutable access to the second child, e.g. to adjust the gate.
    pub fn second_mut(&mut self) -> &mut B {
        &mut self.second
    }
}

impl<A: SampleGenerator, B: SampleGenerator> SampleGenerator for Product<A, B> {
    fn next_buffer(&mut self) -> &[f32] {
        let first = self.first.next_buffer();
        let second = self.second.next_buffer();
        for ((sample, &a), &b) in self.buffer.iter_mut().zip(first).zip(second) {
            *sample = a * b;
        }
        &self.buffer
    }

    fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    fn sample_rate(&self) -> u32 {
        self.first.sample_rate()
    }
}
