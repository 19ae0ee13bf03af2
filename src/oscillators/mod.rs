//! Periodic tone generators.
//!
//! Currently a single oscillator lives here: the phase-continuous
//! [`SineOscillator`]. It doubles as the carrier for gated-tone presets.

mod sine;

pub use sine::SineOscillator;
