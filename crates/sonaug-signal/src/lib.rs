//! sonaug signal layer
//!
//! The collaborator every transform works against:
//!
//! - [`AudioSignal`] - deinterleaved f32 audio buffer with WAV load/store,
//!   RMS loudness, and a canonical BLAKE3 content hash
//! - [`rng`] - deterministic PCG32 construction and BLAKE3 seed derivation
//!
//! # Determinism
//!
//! Nothing in this crate consults process-global random state, wall-clock
//! time, or filesystem iteration order. Loading the same bytes yields the
//! same signal; hashing the same signal yields the same string, across
//! processes and machines.

pub mod error;
pub mod rng;
pub mod signal;

pub use error::{SignalError, SignalResult};
pub use signal::AudioSignal;
