//! Error types for generator construction.

use thiserror::Error;

/// Errors raised while constructing a generator.
///
/// Construction is the only fallible moment in this crate: once a generator
/// exists, its streaming path (`next_buffer`) is infallible. Degenerate
/// signal conditions encountered mid-stream (e.g. an all-silent block) are
/// handled by documented local policies instead of surfacing as errors, so
/// the real-time production path never throws.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The requested buffer size is odd or zero. Spectral synthesis needs an
    /// even number of samples, and a zero-length block cannot stream.
    #[error("buffer size must be even and positive, got {0}")]
    BufferSize(usize),

    /// The two children of a [`Product`](crate::Product) disagree on buffer
    /// size, so their blocks cannot be multiplied element-wise.
    #[error("product children disagree on buffer size: {first} vs {second}")]
    BufferSizeMismatch {
        /// Buffer size reported by the first child.
        first: usize,
        /// Buffer size reported by the second child.
        second: usize,
    },

    /// A generator name passed to the selection layer matched no known kind.
    #[error("unknown generator kind: {0:?}")]
    UnknownGenerator(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = ConfigError::BufferSize(1023);
        assert!(err.to_string().contains("1023"));

        let err = ConfigError::BufferSizeMismatch {
            first: 512,
            second: 1024,
        };
        assert!(err.to_string().contains("512"));
        assert!(err.to_string().contains("1024"));

        let err = ConfigError::UnknownGenerator("brown_noise".to_string());
        assert!(err.to_string().contains("brown_noise"));
    }
}
